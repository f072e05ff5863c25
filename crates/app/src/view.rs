//! Read model handed to a renderer.
//!
//! Everything a form needs to draw the editor in one serializable value:
//! catalogues, identity fields and, per action, the field specs with their
//! resolved options and validity.

use serde::Serialize;

use roomcfg_domain::action::{
    ActionEntry, ActionKind, FieldSpec, FieldValue, SelectOption, fields_for,
};
use roomcfg_domain::context::EditorContext;
use roomcfg_domain::id::RoomId;
use roomcfg_domain::room::{Phase, RoomConfig, RoomType};
use roomcfg_domain::time::to_iso;
use roomcfg_domain::validation::{ValidationReport, check, validate};

use crate::services::editor_session::EditorModel;

/// One field of one action as the form shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldView {
    pub spec: FieldSpec,
    pub value: FieldValue,
    pub options: Vec<SelectOption>,
    pub valid: bool,
}

/// One action row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionView {
    pub index: usize,
    pub kind: ActionKind,
    pub valid: bool,
    pub fields: Vec<FieldView>,
}

impl ActionView {
    fn new(index: usize, entry: &ActionEntry, context: &EditorContext) -> Self {
        let fields: Vec<FieldView> = fields_for(entry.kind())
            .iter()
            .map(|spec| {
                let value = entry.field(spec.key).cloned().unwrap_or_default();
                FieldView {
                    spec: *spec,
                    valid: check(spec, &value).is_ok(),
                    options: spec.options_in(context),
                    value,
                }
            })
            .collect();
        Self {
            index,
            kind: entry.kind(),
            valid: fields.iter().all(|field| field.valid),
            fields,
        }
    }
}

/// One action list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseView {
    pub phase: Phase,
    pub actions: Vec<ActionView>,
}

/// Scalar fields of the configuration, with dates rendered as ISO strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailsView {
    pub campus: String,
    pub building: String,
    pub room: String,
    pub ip: String,
    pub room_type: RoomType,
    pub version: i64,
    pub updated_by: String,
    pub updated_at: Option<String>,
    pub sla: String,
    pub sla_expire_at: Option<String>,
}

impl From<&RoomConfig> for DetailsView {
    fn from(config: &RoomConfig) -> Self {
        Self {
            campus: config.campus.clone(),
            building: config.building.clone(),
            room: config.room.clone(),
            ip: config.ip.clone(),
            room_type: config.room_type,
            version: config.version,
            updated_by: config.updated_by.clone(),
            updated_at: to_iso(config.updated_at.as_ref()),
            sla: config.sla.clone(),
            sla_expire_at: to_iso(config.sla_expire_at.as_ref()),
        }
    }
}

/// The whole editor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorView {
    pub room_id: String,
    pub room_types: Vec<RoomType>,
    pub action_kinds: Vec<ActionKind>,
    pub details: DetailsView,
    pub phases: Vec<PhaseView>,
    pub report: ValidationReport,
}

impl EditorView {
    #[must_use]
    pub fn new(room_id: &RoomId, model: &EditorModel) -> Self {
        let phases = Phase::ALL
            .into_iter()
            .map(|phase| PhaseView {
                phase,
                actions: model
                    .config
                    .actions(phase)
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| ActionView::new(index, entry, &model.context))
                    .collect(),
            })
            .collect();
        Self {
            room_id: room_id.to_string(),
            room_types: RoomType::ALL.to_vec(),
            action_kinds: ActionKind::ALL.to_vec(),
            details: DetailsView::from(&model.config),
            phases,
            report: validate(&model.config),
        }
    }

    #[must_use]
    pub fn phase(&self, phase: Phase) -> Option<&PhaseView> {
        self.phases.iter().find(|view| view.phase == phase)
    }

    /// Whether the save control should be enabled.
    #[must_use]
    pub fn can_save(&self) -> bool {
        self.report.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcfg_domain::action::FieldKey;

    fn model() -> EditorModel {
        let config = RoomConfig::from_wire(&serde_json::json!({
            "campus": "North",
            "building": "Science",
            "room": "101",
            "ip": "10.0.0.12",
            "updatedAt": "2024-03-01T10:00:00Z",
            "SystemOnActions": [
                {"action": "TurnOn", "device": "proj1"},
                {"action": "ShowPage", "page": ""}
            ],
            "Devices": {"proj1": {}, "amp": {}},
            "Pages": [{"Id": "home"}, {"Id": "video"}]
        }))
        .unwrap();
        EditorModel::new(config)
    }

    #[test]
    fn should_resolve_options_from_context() {
        let view = EditorView::new(&RoomId::new("r1").unwrap(), &model());
        let startup = view.phase(Phase::Startup).unwrap();

        let device = &startup.actions[0].fields[0];
        assert_eq!(device.spec.key, FieldKey::Device);
        let values: Vec<&str> = device.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, ["amp", "proj1"]);

        let transition = &startup.actions[1].fields[2];
        assert_eq!(transition.value, FieldValue::from("None"));
        assert_eq!(transition.options.len(), 3);
    }

    #[test]
    fn should_flag_invalid_rows_and_disable_save() {
        let view = EditorView::new(&RoomId::new("r1").unwrap(), &model());
        let startup = view.phase(Phase::Startup).unwrap();

        assert!(startup.actions[0].valid);
        assert!(!startup.actions[1].valid);
        assert!(!startup.actions[1].fields[0].valid);
        assert!(startup.actions[1].fields[1].valid);
        assert!(!view.can_save());
    }

    #[test]
    fn should_render_dates_as_iso_strings() {
        let view = EditorView::new(&RoomId::new("r1").unwrap(), &model());
        assert_eq!(
            view.details.updated_at.as_deref(),
            Some("2024-03-01T10:00:00.000Z")
        );
        assert_eq!(view.details.sla_expire_at, None);
        assert_eq!(view.details.room_type, RoomType::Other);
    }

    #[test]
    fn should_serialize_catalogues() {
        let view = EditorView::new(&RoomId::new("r1").unwrap(), &model());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["room_types"][1], "Conference Room");
        assert_eq!(json["action_kinds"].as_array().unwrap().len(), 7);
        assert_eq!(json["details"]["roomType"], "Other");
        assert_eq!(json["phases"][1]["actions"][0]["kind"], "TurnOn");
    }
}
