//! Room store port — the persistence service holding room documents.

use std::future::Future;

use roomcfg_domain::error::RoomCfgError;
use roomcfg_domain::id::RoomId;
use roomcfg_domain::wire::RoomDocument;

/// Fetches and saves room configuration documents.
///
/// Implementations own transport concerns (HTTP, credentials, timeouts).
/// Both calls are single requests; retrying is the caller's decision.
pub trait RoomStore {
    /// Fetch the document of `room_id`.
    ///
    /// Returns [`RoomCfgError::NotFound`] when the room does not exist.
    fn fetch(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<RoomDocument, RoomCfgError>> + Send;

    /// Replace the configuration of `room_id` with `config`.
    fn save(
        &self,
        room_id: &RoomId,
        config: serde_json::Value,
    ) -> impl Future<Output = Result<(), RoomCfgError>> + Send;
}

impl<T: RoomStore + Send + Sync> RoomStore for std::sync::Arc<T> {
    fn fetch(
        &self,
        room_id: &RoomId,
    ) -> impl Future<Output = Result<RoomDocument, RoomCfgError>> + Send {
        (**self).fetch(room_id)
    }

    fn save(
        &self,
        room_id: &RoomId,
        config: serde_json::Value,
    ) -> impl Future<Output = Result<(), RoomCfgError>> + Send {
        (**self).save(room_id, config)
    }
}
