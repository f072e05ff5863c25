//! # roomcfg-app
//!
//! Application layer — use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `RoomStore` — fetch and save room configuration documents
//!   - `CredentialProvider` — bearer credential for the transport layer
//!   - `Navigator` — leave the editing context after save or cancel
//! - Define the **driving/inbound** use-case:
//!   - `EditorSession` — load, edit, validate and save one room
//! - Provide the read model a renderer consumes (`EditorView`)
//!
//! ## Dependency rule
//! Depends on `roomcfg-domain` only.
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod ports;
pub mod services;
pub mod view;
