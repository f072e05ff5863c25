//! HTTP adapter error types.

use roomcfg_domain::error::{NotFoundError, RoomCfgError};
use serde::Deserialize;

/// Errors specific to the HTTP room store.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The configured base URL cannot carry a `/rooms/{id}` path.
    #[error("invalid base url `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// No bearer token is available.
    #[error("not signed in")]
    MissingCredentials,

    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered 404 for the room.
    #[error("room not found: {0}")]
    NotFound(String),

    /// The service answered with another non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The response body is not a room document.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Error payload returned by the service, `{"error": "..."}`.
#[derive(Debug, Deserialize)]
struct ErrorPayload {
    error: Option<String>,
}

impl HttpError {
    /// Build a [`HttpError::Status`] from a non-success reply, preferring the
    /// service's own message over a generic one.
    #[must_use]
    pub fn from_reply(status: u16, body: &[u8]) -> Self {
        let message = serde_json::from_slice::<ErrorPayload>(body)
            .ok()
            .and_then(|payload| payload.error)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| format!("request failed with status {status}"));
        Self::Status { status, message }
    }
}

impl From<HttpError> for RoomCfgError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::MissingCredentials => Self::Unauthenticated,
            HttpError::NotFound(id) => Self::NotFound(NotFoundError { entity: "Room", id }),
            other => Self::Storage(Box::new(other)),
        }
    }
}
