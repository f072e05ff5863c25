//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`RoomCfgError`] via `#[from]` when crossing a port boundary.

use crate::action::{ActionKind, FieldKey};

/// Top-level error shared by the domain, the application layer and adapters.
#[derive(Debug, thiserror::Error)]
pub enum RoomCfgError {
    /// The configuration document could not be mapped onto the model.
    #[error("malformed room configuration")]
    Parse(#[from] ParseError),

    /// The requested room document does not exist.
    #[error("not found")]
    NotFound(#[from] NotFoundError),

    /// No credential is available to talk to the persistence service.
    #[error("not signed in")]
    Unauthenticated,

    /// The persistence layer failed.
    #[error("storage error")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl RoomCfgError {
    /// Human-readable message including the innermost cause.
    ///
    /// Used when an error has to be shown to the operator as a single line.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Parse(err) => format!("{self}: {err}"),
            Self::NotFound(err) => err.to_string(),
            Self::Unauthenticated => self.to_string(),
            Self::Storage(err) => err.to_string(),
        }
    }
}

/// A lookup did not find the requested document.
#[derive(Debug, thiserror::Error)]
#[error("{entity} not found: {id}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub id: String,
}

/// Reasons a wire document is rejected while being parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The room identifier is empty.
    #[error("missing room id")]
    MissingRoomId,

    /// A value was present but had the wrong JSON type.
    #[error("`{field}` must be {expected}")]
    InvalidType {
        field: String,
        expected: &'static str,
    },

    /// An action record carried a tag that names no known action kind.
    #[error("unknown action kind `{0}`")]
    UnknownActionKind(String),

    /// The `roomType` value is not one of the known room types.
    #[error("unknown room type `{0}`")]
    UnknownRoomType(String),

    /// A phase name other than start-up or shut-down.
    #[error("unknown phase `{0}`")]
    UnknownPhase(String),

    /// An action record was not a JSON object.
    #[error("{list}[{index}] is not an object")]
    ActionNotAnObject { list: &'static str, index: usize },

    /// A schema field held a value that is neither text, number nor null.
    #[error("{list}[{index}].{key} holds an unsupported value")]
    UnsupportedFieldValue {
        list: &'static str,
        index: usize,
        key: FieldKey,
    },
}

/// Programmer errors raised by the action editing model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    /// The field key is not part of the schema of the entry's kind.
    #[error("`{key}` is not a field of `{kind}`")]
    FieldNotInSchema { kind: ActionKind, key: FieldKey },

    /// The string does not name a field key.
    #[error("unknown field `{0}`")]
    UnknownField(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_not_found_error_with_entity_and_id() {
        let err = NotFoundError {
            entity: "Room",
            id: "r-101".to_string(),
        };
        assert_eq!(err.to_string(), "Room not found: r-101");
    }

    #[test]
    fn should_include_parse_cause_in_message() {
        let err: RoomCfgError = ParseError::UnknownActionKind("Dance".to_string()).into();
        assert_eq!(
            err.message(),
            "malformed room configuration: unknown action kind `Dance`"
        );
    }

    #[test]
    fn should_surface_storage_cause_as_message() {
        let io = std::io::Error::other("connection refused");
        let err = RoomCfgError::Storage(Box::new(io));
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn should_display_field_not_in_schema() {
        let err = ActionError::FieldNotInSchema {
            kind: ActionKind::TurnOn,
            key: FieldKey::Seconds,
        };
        assert_eq!(err.to_string(), "`seconds` is not a field of `TurnOn`");
    }
}
