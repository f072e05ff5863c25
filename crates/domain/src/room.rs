//! Room configuration — the document an operator edits for one room.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::ActionList;
use crate::context::EditorContext;
use crate::error::ParseError;
use crate::time::Timestamp;

/// Classification of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RoomType {
    Classroom,
    #[serde(rename = "Conference Room")]
    ConferenceRoom,
    #[serde(rename = "Lecture Hall")]
    LectureHall,
    #[default]
    Other,
}

impl RoomType {
    pub const ALL: [Self; 4] = [
        Self::Classroom,
        Self::ConferenceRoom,
        Self::LectureHall,
        Self::Other,
    ];

    /// Label as stored in the document.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Classroom => "Classroom",
            Self::ConferenceRoom => "Conference Room",
            Self::LectureHall => "Lecture Hall",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomType {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|room_type| room_type.as_str() == s)
            .ok_or_else(|| ParseError::UnknownRoomType(s.to_string()))
    }
}

/// Which of the two action lists is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Actions run when the room system starts.
    Startup,
    /// Actions run when the room system shuts down.
    Shutdown,
}

impl Phase {
    pub const ALL: [Self; 2] = [Self::Startup, Self::Shutdown];

    /// Key of the list in the stored document.
    #[must_use]
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Startup => "SystemOnActions",
            Self::Shutdown => "SystemOffActions",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Startup => f.write_str("startup"),
            Self::Shutdown => f.write_str("shutdown"),
        }
    }
}

impl FromStr for Phase {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "startup" | "on" => Ok(Self::Startup),
            "shutdown" | "off" => Ok(Self::Shutdown),
            _ => Err(ParseError::UnknownPhase(s.to_string())),
        }
    }
}

/// Identity fields that must be filled before a configuration can be saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityField {
    Campus,
    Building,
    Room,
    Ip,
}

impl IdentityField {
    pub const ALL: [Self; 4] = [Self::Campus, Self::Building, Self::Room, Self::Ip];
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Campus => "campus",
            Self::Building => "building",
            Self::Room => "room",
            Self::Ip => "ip",
        })
    }
}

/// The full editable configuration of one room.
///
/// Built fresh from the stored document on every load; see
/// [`from_wire`](Self::from_wire) and [`to_wire`](Self::to_wire).
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    pub campus: String,
    pub building: String,
    pub room: String,
    pub ip: String,
    pub room_type: RoomType,
    pub version: i64,
    pub updated_by: String,
    pub updated_at: Option<Timestamp>,
    pub sla: String,
    pub sla_expire_at: Option<Timestamp>,
    pub on_startup: ActionList,
    pub on_shutdown: ActionList,
    /// Document keys the editor does not model (`Devices`, `Pages`, …),
    /// written back untouched.
    pub extra: Map<String, Value>,
}

impl RoomConfig {
    #[must_use]
    pub fn actions(&self, phase: Phase) -> &ActionList {
        match phase {
            Phase::Startup => &self.on_startup,
            Phase::Shutdown => &self.on_shutdown,
        }
    }

    pub fn actions_mut(&mut self, phase: Phase) -> &mut ActionList {
        match phase {
            Phase::Startup => &mut self.on_startup,
            Phase::Shutdown => &mut self.on_shutdown,
        }
    }

    #[must_use]
    pub fn identity(&self, field: IdentityField) -> &str {
        match field {
            IdentityField::Campus => &self.campus,
            IdentityField::Building => &self.building,
            IdentityField::Room => &self.room,
            IdentityField::Ip => &self.ip,
        }
    }

    /// Option values derived from the device and page catalogues carried in
    /// [`extra`](Self::extra).
    #[must_use]
    pub fn editor_context(&self) -> EditorContext {
        EditorContext::derive(&self.extra)
    }
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            campus: String::new(),
            building: String::new(),
            room: String::new(),
            ip: String::new(),
            room_type: RoomType::default(),
            version: 1,
            updated_by: String::new(),
            updated_at: None,
            sla: String::new(),
            sla_expire_at: None,
            on_startup: ActionList::new(),
            on_shutdown: ActionList::new(),
            extra: Map::new(),
        }
    }
}
