//! Actions — the declarative steps a room runs on start-up and shut-down.
//!
//! Each [`ActionEntry`] is a typed [`ActionParams`] value: the variant is the
//! [`ActionKind`] and its payload holds exactly the fields declared by
//! [`fields_for`]. Changing an entry's kind rebuilds the payload from the
//! current values so that fields shared by both schemas survive.
//!
//! Entries are grouped into an ordered [`ActionList`] per phase.

mod entry;
mod kind;
mod list;
mod schema;
mod value;

pub use entry::{
    ActionEntry, ActionParams, Autoshutdown, DeviceTarget, FieldSource, PageTarget, VideoRoute,
};
pub use kind::ActionKind;
pub use list::ActionList;
pub use schema::{FieldKey, FieldKind, FieldSpec, OptionSource, SelectOption, fields_for, spec_for};
pub use value::FieldValue;
