//! # roomcfg-domain
//!
//! Pure domain model for editing a room's automation configuration.
//!
//! ## Responsibilities
//! - Foundational types: room identifiers, error conventions, timestamps
//! - Define **Action kinds** and their per-kind **field schemas**
//! - Define **Action entries** (a kind plus its field values) and the
//!   type-switch rebuild that keeps compatible values
//! - Define **Action lists** (ordered start-up / shut-down phases)
//! - Define the **Editor context** (option values for select fields)
//! - Define the **Room configuration** document and its validation
//! - Convert between the structured model and the flat wire records
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod action;
pub mod context;
pub mod room;
pub mod validation;
pub mod wire;
