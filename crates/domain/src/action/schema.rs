//! Field schemas — which fields each action kind carries.
//!
//! The registry is a set of static tables selected by an exhaustive match on
//! [`ActionKind`], so every kind always has a schema and nothing can be
//! registered at runtime.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::kind::ActionKind;
use super::value::FieldValue;
use crate::context::EditorContext;
use crate::error::ActionError;

/// Every field key used by any action schema.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum FieldKey {
    Device,
    Input,
    Output,
    Page,
    Layer,
    Transition,
    Seconds,
}

impl FieldKey {
    pub const ALL: [Self; 7] = [
        Self::Device,
        Self::Input,
        Self::Output,
        Self::Page,
        Self::Layer,
        Self::Transition,
        Self::Seconds,
    ];

    /// Key as written in flat records.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Device => "device",
            Self::Input => "input",
            Self::Output => "output",
            Self::Page => "page",
            Self::Layer => "layer",
            Self::Transition => "transition",
            Self::Seconds => "seconds",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKey {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| ActionError::UnknownField(s.to_string()))
    }
}

/// How a field is edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Select,
}

impl FieldKind {
    /// The value a field of this kind holds before anything is entered.
    #[must_use]
    pub fn default_value(self) -> FieldValue {
        match self {
            Self::Text | Self::Select => FieldValue::empty_text(),
            Self::Number => FieldValue::Null,
        }
    }

    /// Interpret operator input for a field of this kind.
    ///
    /// Number fields parse JSON numbers; input that does not parse is kept
    /// as text so validation can report it. Blank number input clears the
    /// field.
    #[must_use]
    pub fn parse_input(self, raw: &str) -> FieldValue {
        match self {
            Self::Text | Self::Select => FieldValue::Text(raw.to_string()),
            Self::Number => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return FieldValue::Null;
                }
                trimmed
                    .parse::<serde_json::Number>()
                    .map_or_else(|_| FieldValue::Text(raw.to_string()), FieldValue::Number)
            }
        }
    }
}

/// Where a select field takes its choices from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionSource {
    /// Free-form field, no choices.
    None,
    Devices,
    Pages,
    Transitions,
}

impl OptionSource {
    /// Resolve the ordered choices against the loaded context.
    #[must_use]
    pub fn options(self, ctx: &EditorContext) -> Vec<SelectOption> {
        match self {
            Self::None => Vec::new(),
            Self::Devices => ctx.device_ids().map(SelectOption::plain).collect(),
            Self::Pages => ctx.page_ids().map(SelectOption::plain).collect(),
            Self::Transitions => ctx.transitions().map(SelectOption::plain).collect(),
        }
    }
}

/// One choice offered by a select field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

impl SelectOption {
    /// An option whose label is its value.
    #[must_use]
    pub fn plain(value: &str) -> Self {
        Self {
            value: value.to_string(),
            label: value.to_string(),
        }
    }
}

/// Declarative description of one configurable attribute of an action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub key: FieldKey,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub options: OptionSource,
    #[serde(skip)]
    default_text: Option<&'static str>,
}

impl FieldSpec {
    const fn new(key: FieldKey, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: false,
            options: OptionSource::None,
            default_text: None,
        }
    }

    const fn select(key: FieldKey, label: &'static str, options: OptionSource) -> Self {
        Self {
            options,
            ..Self::new(key, label, FieldKind::Select)
        }
    }

    const fn required(self) -> Self {
        Self {
            required: true,
            ..self
        }
    }

    const fn defaulting_to(self, text: &'static str) -> Self {
        Self {
            default_text: Some(text),
            ..self
        }
    }

    /// Value a freshly built entry holds for this field.
    #[must_use]
    pub fn default_value(&self) -> FieldValue {
        self.default_text
            .map_or_else(|| self.kind.default_value(), FieldValue::from)
    }

    /// Choices for this field under `ctx` (empty for non-select fields).
    #[must_use]
    pub fn options_in(&self, ctx: &EditorContext) -> Vec<SelectOption> {
        self.options.options(ctx)
    }
}

const DEVICE: FieldSpec =
    FieldSpec::select(FieldKey::Device, "Device", OptionSource::Devices).required();
const INPUT: FieldSpec = FieldSpec::new(FieldKey::Input, "Input", FieldKind::Text).required();
const OUTPUT: FieldSpec = FieldSpec::new(FieldKey::Output, "Output", FieldKind::Text).required();
const PAGE: FieldSpec = FieldSpec::select(FieldKey::Page, "Page", OptionSource::Pages).required();
const LAYER: FieldSpec = FieldSpec::new(FieldKey::Layer, "Layer", FieldKind::Text);
const TRANSITION: FieldSpec =
    FieldSpec::select(FieldKey::Transition, "Transition", OptionSource::Transitions)
        .defaulting_to(EditorContext::NO_TRANSITION);
const SECONDS: FieldSpec =
    FieldSpec::new(FieldKey::Seconds, "Seconds", FieldKind::Number).required();

static DEVICE_FIELDS: [FieldSpec; 1] = [DEVICE];
static ROUTE_FIELDS: [FieldSpec; 3] = [DEVICE, INPUT, OUTPUT];
static PAGE_FIELDS: [FieldSpec; 3] = [PAGE, LAYER, TRANSITION];
static AUTOSHUTDOWN_FIELDS: [FieldSpec; 1] = [SECONDS];

/// Ordered field specifications of `kind`.
#[must_use]
pub fn fields_for(kind: ActionKind) -> &'static [FieldSpec] {
    match kind {
        ActionKind::TurnOn | ActionKind::TurnOff => &DEVICE_FIELDS,
        ActionKind::RouteVideo => &ROUTE_FIELDS,
        ActionKind::TogglePage | ActionKind::ShowPage | ActionKind::HidePage => &PAGE_FIELDS,
        ActionKind::StartAutoshutdown => &AUTOSHUTDOWN_FIELDS,
    }
}

/// The spec of `key` within the schema of `kind`, if it belongs there.
#[must_use]
pub fn spec_for(kind: ActionKind, key: FieldKey) -> Option<&'static FieldSpec> {
    fields_for(kind).iter().find(|spec| spec.key == key)
}
