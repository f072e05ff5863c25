//! Action kind — the closed set of things an action can do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// What an action does when the device-control system runs it.
///
/// The wire tag of each kind is its variant name (`"TurnOn"`, …).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ActionKind {
    /// Power a device on.
    #[default]
    TurnOn,
    /// Power a device off.
    TurnOff,
    /// Route a video input to an output on a switcher.
    RouteVideo,
    /// Toggle a touch-panel page.
    TogglePage,
    /// Show a touch-panel page.
    ShowPage,
    /// Hide a touch-panel page.
    HidePage,
    /// Arm the automatic shutdown timer.
    StartAutoshutdown,
}

impl ActionKind {
    /// Every kind, in the order editors list them.
    pub const ALL: [Self; 7] = [
        Self::TurnOn,
        Self::TurnOff,
        Self::RouteVideo,
        Self::TogglePage,
        Self::ShowPage,
        Self::HidePage,
        Self::StartAutoshutdown,
    ];

    /// The wire tag stored in the `action` field of a flat record.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::TurnOn => "TurnOn",
            Self::TurnOff => "TurnOff",
            Self::RouteVideo => "RouteVideo",
            Self::TogglePage => "TogglePage",
            Self::ShowPage => "ShowPage",
            Self::HidePage => "HidePage",
            Self::StartAutoshutdown => "StartAutoshutdown",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ActionKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.tag() == s)
            .ok_or_else(|| ParseError::UnknownActionKind(s.to_string()))
    }
}
