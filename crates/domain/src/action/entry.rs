//! Action entry — one editable action and the type-switch rebuild.

use std::collections::BTreeMap;

use super::kind::ActionKind;
use super::schema::{FieldKey, fields_for};
use super::value::FieldValue;
use crate::error::ActionError;

/// Fields of `TurnOn` / `TurnOff`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceTarget {
    pub device: FieldValue,
}

/// Fields of `RouteVideo`.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoRoute {
    pub device: FieldValue,
    pub input: FieldValue,
    pub output: FieldValue,
}

/// Fields of `TogglePage` / `ShowPage` / `HidePage`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageTarget {
    pub page: FieldValue,
    pub layer: FieldValue,
    pub transition: FieldValue,
}

/// Fields of `StartAutoshutdown`.
#[derive(Debug, Clone, PartialEq)]
pub struct Autoshutdown {
    pub seconds: FieldValue,
}

/// The kind of an action together with its field record.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionParams {
    TurnOn(DeviceTarget),
    TurnOff(DeviceTarget),
    RouteVideo(VideoRoute),
    TogglePage(PageTarget),
    ShowPage(PageTarget),
    HidePage(PageTarget),
    StartAutoshutdown(Autoshutdown),
}

/// Anything that can supply seed values when building an entry.
pub trait FieldSource {
    /// Value for `key`, if the source has one.
    fn value_of(&self, key: FieldKey) -> Option<FieldValue>;
}

impl FieldSource for BTreeMap<FieldKey, FieldValue> {
    fn value_of(&self, key: FieldKey) -> Option<FieldValue> {
        self.get(&key).cloned()
    }
}

impl FieldSource for ActionEntry {
    fn value_of(&self, key: FieldKey) -> Option<FieldValue> {
        self.field(key).cloned()
    }
}

/// One editable action: a kind plus its current field values.
///
/// The held fields are always exactly those of [`fields_for`]`(kind)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
    params: ActionParams,
}

impl ActionEntry {
    /// A fresh entry of `kind` with every field at its default.
    #[must_use]
    pub fn new(kind: ActionKind) -> Self {
        Self::create(kind, &BTreeMap::new())
    }

    /// Build an entry of `kind`, taking values from `seed` for keys in the
    /// kind's schema. Absent or `null` seeds fall back to the field default;
    /// keys outside the schema are ignored.
    #[must_use]
    pub fn create(kind: ActionKind, seed: &impl FieldSource) -> Self {
        let mut values: BTreeMap<FieldKey, FieldValue> = fields_for(kind)
            .iter()
            .map(|spec| {
                let value = seed
                    .value_of(spec.key)
                    .filter(|value| !value.is_null())
                    .unwrap_or_else(|| spec.default_value());
                (spec.key, value)
            })
            .collect();
        let mut take = |key: FieldKey| values.remove(&key).unwrap_or_default();

        let params = match kind {
            ActionKind::TurnOn => ActionParams::TurnOn(DeviceTarget {
                device: take(FieldKey::Device),
            }),
            ActionKind::TurnOff => ActionParams::TurnOff(DeviceTarget {
                device: take(FieldKey::Device),
            }),
            ActionKind::RouteVideo => ActionParams::RouteVideo(VideoRoute {
                device: take(FieldKey::Device),
                input: take(FieldKey::Input),
                output: take(FieldKey::Output),
            }),
            ActionKind::TogglePage => ActionParams::TogglePage(PageTarget {
                page: take(FieldKey::Page),
                layer: take(FieldKey::Layer),
                transition: take(FieldKey::Transition),
            }),
            ActionKind::ShowPage => ActionParams::ShowPage(PageTarget {
                page: take(FieldKey::Page),
                layer: take(FieldKey::Layer),
                transition: take(FieldKey::Transition),
            }),
            ActionKind::HidePage => ActionParams::HidePage(PageTarget {
                page: take(FieldKey::Page),
                layer: take(FieldKey::Layer),
                transition: take(FieldKey::Transition),
            }),
            ActionKind::StartAutoshutdown => ActionParams::StartAutoshutdown(Autoshutdown {
                seconds: take(FieldKey::Seconds),
            }),
        };
        Self { params }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match &self.params {
            ActionParams::TurnOn(_) => ActionKind::TurnOn,
            ActionParams::TurnOff(_) => ActionKind::TurnOff,
            ActionParams::RouteVideo(_) => ActionKind::RouteVideo,
            ActionParams::TogglePage(_) => ActionKind::TogglePage,
            ActionParams::ShowPage(_) => ActionKind::ShowPage,
            ActionParams::HidePage(_) => ActionKind::HidePage,
            ActionParams::StartAutoshutdown(_) => ActionKind::StartAutoshutdown,
        }
    }

    /// Rebuild this entry as `kind`, keeping values of fields both schemas
    /// share. Switching to the current kind returns an identical entry.
    #[must_use]
    pub fn change_kind(&self, kind: ActionKind) -> Self {
        if kind == self.kind() {
            return self.clone();
        }
        Self::create(kind, self)
    }

    /// Value of `key`, or `None` when the key is not in this kind's schema.
    #[must_use]
    pub fn field(&self, key: FieldKey) -> Option<&FieldValue> {
        match (&self.params, key) {
            (
                ActionParams::TurnOn(target) | ActionParams::TurnOff(target),
                FieldKey::Device,
            ) => Some(&target.device),
            (ActionParams::RouteVideo(route), FieldKey::Device) => Some(&route.device),
            (ActionParams::RouteVideo(route), FieldKey::Input) => Some(&route.input),
            (ActionParams::RouteVideo(route), FieldKey::Output) => Some(&route.output),
            (
                ActionParams::TogglePage(target)
                | ActionParams::ShowPage(target)
                | ActionParams::HidePage(target),
                key,
            ) => match key {
                FieldKey::Page => Some(&target.page),
                FieldKey::Layer => Some(&target.layer),
                FieldKey::Transition => Some(&target.transition),
                _ => None,
            },
            (ActionParams::StartAutoshutdown(timer), FieldKey::Seconds) => Some(&timer.seconds),
            _ => None,
        }
    }

    fn field_mut(&mut self, key: FieldKey) -> Option<&mut FieldValue> {
        match (&mut self.params, key) {
            (
                ActionParams::TurnOn(target) | ActionParams::TurnOff(target),
                FieldKey::Device,
            ) => Some(&mut target.device),
            (ActionParams::RouteVideo(route), FieldKey::Device) => Some(&mut route.device),
            (ActionParams::RouteVideo(route), FieldKey::Input) => Some(&mut route.input),
            (ActionParams::RouteVideo(route), FieldKey::Output) => Some(&mut route.output),
            (
                ActionParams::TogglePage(target)
                | ActionParams::ShowPage(target)
                | ActionParams::HidePage(target),
                key,
            ) => match key {
                FieldKey::Page => Some(&mut target.page),
                FieldKey::Layer => Some(&mut target.layer),
                FieldKey::Transition => Some(&mut target.transition),
                _ => None,
            },
            (ActionParams::StartAutoshutdown(timer), FieldKey::Seconds) => {
                Some(&mut timer.seconds)
            }
            _ => None,
        }
    }

    /// All held fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> {
        fields_for(self.kind())
            .iter()
            .filter_map(|spec| self.field(spec.key).map(|value| (spec.key, value)))
    }

    /// Set a field, rejecting keys outside this kind's schema.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError::FieldNotInSchema`] when `key` is not a field of
    /// the entry's kind.
    pub fn try_set_field(
        &mut self,
        key: FieldKey,
        value: impl Into<FieldValue>,
    ) -> Result<(), ActionError> {
        let kind = self.kind();
        let slot = self
            .field_mut(key)
            .ok_or(ActionError::FieldNotInSchema { kind, key })?;
        *slot = value.into();
        Ok(())
    }

    /// Set a field that is known to belong to this kind's schema.
    ///
    /// # Panics
    ///
    /// Panics when `key` is not a field of the entry's kind; that is a bug
    /// in the caller, not bad input.
    pub fn set_field(&mut self, key: FieldKey, value: impl Into<FieldValue>) {
        if let Err(err) = self.try_set_field(key, value) {
            panic!("{err}");
        }
    }
}

impl Default for ActionEntry {
    fn default() -> Self {
        Self::new(ActionKind::default())
    }
}
