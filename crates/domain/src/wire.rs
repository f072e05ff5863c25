//! Wire format — flat action records and the stored room document.
//!
//! The persistence service stores each action as one flat JSON object,
//! `{"action": "RouteVideo", "device": "p1", "input": "hdmi1", …}`. Loading
//! maps those records onto typed [`ActionEntry`] values (dropping keys the
//! kind's schema does not know, filling defaults for the ones it lacks);
//! saving writes every held field back next to the `action` tag.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::action::{ActionEntry, ActionKind, ActionList, FieldValue, fields_for};
use crate::error::ParseError;
use crate::id::RoomId;
use crate::room::{Phase, RoomConfig, RoomType};
use crate::time::{parse_date, to_iso};

/// One persisted action: the kind tag merged with its fields.
pub type FlatRecord = Map<String, Value>;

/// Key of the kind tag inside a [`FlatRecord`].
pub const ACTION_TAG: &str = "action";

const ROOM_ID: &str = "roomId";
const CAMPUS: &str = "campus";
const BUILDING: &str = "building";
const ROOM: &str = "room";
const IP: &str = "ip";
const ROOM_TYPE: &str = "roomType";
const VERSION: &str = "version";
const UPDATED_BY: &str = "updatedBy";
const UPDATED_AT: &str = "updatedAt";
const SLA: &str = "sla";
const SLA_EXPIRE_AT: &str = "slaExpireAt";

/// Document keys mapped onto [`RoomConfig`] fields. Everything else lands
/// in [`RoomConfig::extra`].
const MODELLED_KEYS: [&str; 13] = [
    ROOM_ID,
    CAMPUS,
    BUILDING,
    ROOM,
    IP,
    ROOM_TYPE,
    VERSION,
    UPDATED_BY,
    UPDATED_AT,
    SLA,
    SLA_EXPIRE_AT,
    "SystemOnActions",
    "SystemOffActions",
];

/// A room document as returned by the persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Store-native identifier, sent by some services next to or instead of `id`.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<String>,
    #[serde(default)]
    pub config: Value,
}

impl RoomDocument {
    /// A document carrying `config` for `id`.
    #[must_use]
    pub fn new(id: impl Into<String>, config: Value) -> Self {
        Self {
            id: Some(id.into()),
            store_id: None,
            config,
        }
    }

    /// The identifier the service reported, `id` first, then `_id`.
    #[must_use]
    pub fn reported_id(&self) -> Option<&str> {
        self.id.as_deref().or(self.store_id.as_deref())
    }

    /// Parse the embedded configuration.
    ///
    /// # Errors
    ///
    /// See [`RoomConfig::from_wire`].
    pub fn parse(&self) -> Result<RoomConfig, ParseError> {
        RoomConfig::from_wire(&self.config)
    }
}

/// Body submitted to the persistence service when saving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    pub config: Value,
}

fn parse_record(
    list: &'static str,
    index: usize,
    record: &FlatRecord,
) -> Result<ActionEntry, ParseError> {
    let kind = match record.get(ACTION_TAG) {
        None | Some(Value::Null) => ActionKind::default(),
        Some(Value::String(tag)) if tag.is_empty() => ActionKind::default(),
        Some(Value::String(tag)) => tag.parse()?,
        Some(_) => {
            return Err(ParseError::InvalidType {
                field: format!("{list}[{index}].{ACTION_TAG}"),
                expected: "a string",
            });
        }
    };

    let mut seed = BTreeMap::new();
    for spec in fields_for(kind) {
        if let Some(raw) = record.get(spec.key.as_str()) {
            let value = FieldValue::from_json(raw).ok_or(ParseError::UnsupportedFieldValue {
                list,
                index,
                key: spec.key,
            })?;
            seed.insert(spec.key, value);
        }
    }
    Ok(ActionEntry::create(kind, &seed))
}

fn parse_list(list: &'static str, records: &[Value]) -> Result<ActionList, ParseError> {
    let mut actions = records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            record
                .as_object()
                .ok_or(ParseError::ActionNotAnObject { list, index })
                .and_then(|record| parse_record(list, index, record))
        })
        .collect::<Result<ActionList, _>>()?;
    if actions.is_empty() {
        actions.add();
    }
    Ok(actions)
}

/// Build an action list from flat records.
///
/// An empty input yields a single default entry so an editor never starts
/// from an empty list.
///
/// # Errors
///
/// Returns [`ParseError::UnknownActionKind`] for unknown tags and
/// [`ParseError::UnsupportedFieldValue`] when a schema field holds a
/// boolean, array or object.
pub fn deserialize_actions(records: &[FlatRecord]) -> Result<ActionList, ParseError> {
    let records: Vec<Value> = records.iter().cloned().map(Value::Object).collect();
    parse_list("actions", &records)
}

impl ActionEntry {
    /// The entry as one flat record, `{action, ...fields}`.
    #[must_use]
    pub fn to_flat(&self) -> FlatRecord {
        let mut record = FlatRecord::new();
        record.insert(
            ACTION_TAG.to_string(),
            Value::String(self.kind().tag().to_string()),
        );
        for (key, value) in self.fields() {
            record.insert(key.as_str().to_string(), value.to_json());
        }
        record
    }
}

/// Flatten one entry into `{action, ...fields}`.
#[must_use]
pub fn serialize_entry(entry: &ActionEntry) -> FlatRecord {
    entry.to_flat()
}

/// Flatten a list in order.
#[must_use]
pub fn serialize_actions(list: &ActionList) -> Vec<FlatRecord> {
    list.iter().map(serialize_entry).collect()
}

fn invalid(field: &str, expected: &'static str) -> ParseError {
    ParseError::InvalidType {
        field: field.to_string(),
        expected,
    }
}

fn text(document: &Map<String, Value>, key: &str) -> Result<String, ParseError> {
    match document.get(key) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(invalid(key, "a string")),
    }
}

fn room_type(document: &Map<String, Value>) -> Result<RoomType, ParseError> {
    match document.get(ROOM_TYPE) {
        None | Some(Value::Null) => Ok(RoomType::default()),
        Some(Value::String(value)) if value.is_empty() => Ok(RoomType::default()),
        Some(Value::String(value)) => value.parse(),
        Some(_) => Err(invalid(ROOM_TYPE, "a string")),
    }
}

fn version(document: &Map<String, Value>) -> Result<i64, ParseError> {
    match document.get(VERSION) {
        None | Some(Value::Null) => Ok(1),
        Some(value) => value
            .as_i64()
            .or_else(|| value.as_f64().and_then(whole_number))
            .ok_or_else(|| invalid(VERSION, "an integer")),
    }
}

/// `2.0` as `2`; fractional or out-of-range numbers are `None`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn whole_number(value: f64) -> Option<i64> {
    let in_range = value >= i64::MIN as f64 && value < i64::MAX as f64;
    (value.fract() == 0.0 && in_range).then(|| value as i64)
}

fn actions(document: &Map<String, Value>, phase: Phase) -> Result<ActionList, ParseError> {
    let key = phase.wire_key();
    match document.get(key) {
        None | Some(Value::Null) => parse_list(key, &[]),
        Some(Value::Array(records)) => parse_list(key, records),
        Some(_) => Err(invalid(key, "an array")),
    }
}

impl RoomConfig {
    /// Map a stored configuration object onto the model.
    ///
    /// Missing or `null` scalars take their defaults and malformed dates
    /// read as absent; anything else of the wrong shape rejects the whole
    /// document. A `null` configuration reads as an empty one.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] describing the first offending value.
    pub fn from_wire(config: &Value) -> Result<Self, ParseError> {
        let empty = Map::new();
        let document = match config {
            Value::Null => &empty,
            Value::Object(document) => document,
            _ => return Err(invalid("config", "an object")),
        };

        Ok(Self {
            campus: text(document, CAMPUS)?,
            building: text(document, BUILDING)?,
            room: text(document, ROOM)?,
            ip: text(document, IP)?,
            room_type: room_type(document)?,
            version: version(document)?,
            updated_by: text(document, UPDATED_BY)?,
            updated_at: document.get(UPDATED_AT).and_then(parse_date),
            sla: text(document, SLA)?,
            sla_expire_at: document.get(SLA_EXPIRE_AT).and_then(parse_date),
            on_startup: actions(document, Phase::Startup)?,
            on_shutdown: actions(document, Phase::Shutdown)?,
            extra: document
                .iter()
                .filter(|(key, _)| !MODELLED_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect(),
        })
    }

    /// Produce the configuration object submitted on save.
    #[must_use]
    pub fn to_wire(&self, room_id: &RoomId) -> Value {
        let mut document = self.extra.clone();
        let mut put = |key: &str, value: Value| {
            document.insert(key.to_string(), value);
        };
        put(ROOM_ID, Value::from(room_id.as_str()));
        put(CAMPUS, Value::from(self.campus.as_str()));
        put(BUILDING, Value::from(self.building.as_str()));
        put(ROOM, Value::from(self.room.as_str()));
        put(IP, Value::from(self.ip.as_str()));
        put(ROOM_TYPE, Value::from(self.room_type.as_str()));
        put(VERSION, Value::from(self.version));
        put(UPDATED_BY, Value::from(self.updated_by.as_str()));
        put(UPDATED_AT, Value::from(to_iso(self.updated_at.as_ref())));
        put(SLA, Value::from(self.sla.as_str()));
        put(SLA_EXPIRE_AT, Value::from(to_iso(self.sla_expire_at.as_ref())));
        for phase in Phase::ALL {
            let records = serialize_actions(self.actions(phase))
                .into_iter()
                .map(Value::Object)
                .collect();
            put(phase.wire_key(), Value::Array(records));
        }
        Value::Object(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::FieldKey;
    use chrono::TimeZone;
    use serde_json::json;

    fn records(value: Value) -> Vec<FlatRecord> {
        serde_json::from_value(value).unwrap()
    }

    fn room_id() -> RoomId {
        RoomId::new("room-101").unwrap()
    }

    #[test]
    fn should_roundtrip_schema_exact_records() {
        let input = records(json!([
            {"action": "TurnOn", "device": "proj1"},
            {"action": "RouteVideo", "device": "sw1", "input": "hdmi1", "output": "hdmi2"},
            {"action": "ShowPage", "page": "home", "layer": "", "transition": "Fade"},
            {"action": "StartAutoshutdown", "seconds": 900},
            {"action": "TurnOff", "device": "proj1"}
        ]));
        let list = deserialize_actions(&input).unwrap();
        assert_eq!(serialize_actions(&list), input);
    }

    #[test]
    fn should_load_single_turn_on_record() {
        let input = records(json!([{"action": "TurnOn", "device": "proj1"}]));
        let list = deserialize_actions(&input).unwrap();
        assert_eq!(list.len(), 1);
        let entry = list.get(0).unwrap();
        assert_eq!(entry.kind(), ActionKind::TurnOn);
        assert_eq!(
            entry.fields().collect::<Vec<_>>(),
            [(FieldKey::Device, &FieldValue::from("proj1"))]
        );
        assert_eq!(serialize_actions(&list), input);
    }

    #[test]
    fn should_seed_one_default_entry_for_empty_list() {
        let list = deserialize_actions(&[]).unwrap();
        assert_eq!(list.len(), 1);
        let entry = list.get(0).unwrap();
        assert_eq!(entry.kind(), ActionKind::TurnOn);
        assert_eq!(entry.field(FieldKey::Device), Some(&FieldValue::from("")));
    }

    #[test]
    fn should_default_missing_tag_to_turn_on_and_fill_missing_fields() {
        let input = records(json!([{"device": "proj1"}, {"action": "HidePage"}]));
        let list = deserialize_actions(&input).unwrap();
        assert_eq!(list.get(0).unwrap().kind(), ActionKind::TurnOn);
        assert_eq!(
            serialize_actions(&list)[1],
            records(json!([{"action": "HidePage", "page": "", "layer": "", "transition": "None"}]))[0]
        );
    }

    #[test]
    fn should_drop_keys_outside_schema() {
        let input = records(json!([{"action": "TurnOff", "device": "proj1", "delay": 5, "input": "x"}]));
        let list = deserialize_actions(&input).unwrap();
        assert_eq!(
            serialize_actions(&list),
            records(json!([{"action": "TurnOff", "device": "proj1"}]))
        );
    }

    #[test]
    fn should_reject_unknown_action_kind() {
        let input = records(json!([{"action": "Dance"}]));
        assert_eq!(
            deserialize_actions(&input),
            Err(ParseError::UnknownActionKind("Dance".to_string()))
        );
    }

    #[test]
    fn should_reject_unsupported_field_value() {
        let input = records(json!([{"action": "StartAutoshutdown", "seconds": [30]}]));
        assert_eq!(
            deserialize_actions(&input),
            Err(ParseError::UnsupportedFieldValue {
                list: "actions",
                index: 0,
                key: FieldKey::Seconds,
            })
        );
    }

    #[test]
    fn should_parse_full_document() {
        let config = RoomConfig::from_wire(&json!({
            "campus": "North",
            "building": "Science",
            "room": "101",
            "ip": "10.0.0.12",
            "roomType": "Lecture Hall",
            "version": 4,
            "updatedBy": "ops",
            "updatedAt": "2024-01-01T00:00:00.000Z",
            "sla": "gold",
            "slaExpireAt": "garbage",
            "SystemOnActions": [{"action": "TurnOn", "device": "proj1"}],
            "SystemOffActions": [],
            "Devices": {"proj1": {}},
            "Pages": [{"Id": "home"}]
        }))
        .unwrap();

        assert_eq!(config.campus, "North");
        assert_eq!(config.room_type, RoomType::LectureHall);
        assert_eq!(config.version, 4);
        assert_eq!(
            config.updated_at,
            Some(chrono::Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(config.sla_expire_at, None);
        assert_eq!(config.on_startup.len(), 1);
        assert_eq!(config.on_shutdown.len(), 1);
        assert_eq!(
            config.extra.keys().collect::<Vec<_>>(),
            ["Devices", "Pages"]
        );
        let ctx = config.editor_context();
        assert!(ctx.has_device("proj1"));
        assert!(ctx.has_page("home"));
    }

    #[test]
    fn should_default_missing_and_null_scalars() {
        let config = RoomConfig::from_wire(&json!({"campus": null, "roomType": null})).unwrap();
        assert_eq!(config.campus, "");
        assert_eq!(config.room_type, RoomType::Other);
        assert_eq!(config.version, 1);
        assert_eq!(config.on_startup.len(), 1);

        let config = RoomConfig::from_wire(&Value::Null).unwrap();
        assert_eq!(config.building, "");
    }

    #[test]
    fn should_accept_whole_float_version() {
        let config = RoomConfig::from_wire(&json!({"version": 2.0})).unwrap();
        assert_eq!(config.version, 2);
        assert!(RoomConfig::from_wire(&json!({"version": 1e300})).is_err());
    }

    #[test]
    fn should_reject_wrongly_typed_values() {
        assert_eq!(
            RoomConfig::from_wire(&json!({"campus": 12})),
            Err(ParseError::InvalidType {
                field: "campus".to_string(),
                expected: "a string",
            })
        );
        assert!(RoomConfig::from_wire(&json!({"version": "two"})).is_err());
        assert!(RoomConfig::from_wire(&json!({"version": 2.5})).is_err());
        assert!(RoomConfig::from_wire(&json!({"roomType": "Gym"})).is_err());
        assert!(RoomConfig::from_wire(&json!({"SystemOnActions": "TurnOn"})).is_err());
        assert_eq!(
            RoomConfig::from_wire(&json!({"SystemOffActions": [1]})),
            Err(ParseError::ActionNotAnObject {
                list: "SystemOffActions",
                index: 0,
            })
        );
        assert!(RoomConfig::from_wire(&json!([])).is_err());
    }

    #[test]
    fn should_write_save_shape_with_room_id_dates_and_extra_keys() {
        let mut config = RoomConfig::from_wire(&json!({
            "campus": "North",
            "updatedAt": "2024-01-01T00:00:00Z",
            "SystemOnActions": [{"action": "StartAutoshutdown", "seconds": 30, "legacy": true}],
            "Devices": {"proj1": {"Driver": "pjlink"}},
            "roomId": "stale"
        }))
        .unwrap();
        config.on_shutdown.get_mut(0).unwrap().set_field(FieldKey::Device, "proj1");

        let saved = config.to_wire(&room_id());
        assert_eq!(
            saved,
            json!({
                "roomId": "room-101",
                "campus": "North",
                "building": "",
                "room": "",
                "ip": "",
                "roomType": "Other",
                "version": 1,
                "updatedBy": "",
                "updatedAt": "2024-01-01T00:00:00.000Z",
                "sla": "",
                "slaExpireAt": null,
                "SystemOnActions": [{"action": "StartAutoshutdown", "seconds": 30}],
                "SystemOffActions": [{"action": "TurnOn", "device": "proj1"}],
                "Devices": {"proj1": {"Driver": "pjlink"}}
            })
        );
    }

    #[test]
    fn should_reload_what_was_saved() {
        let original = RoomConfig::from_wire(&json!({
            "campus": "North",
            "building": "Science",
            "room": "101",
            "ip": "10.0.0.12",
            "roomType": "Classroom",
            "slaExpireAt": "2025-06-30T12:00:00.000Z",
            "SystemOnActions": [{"action": "RouteVideo", "device": "sw", "input": "1", "output": "2"}],
            "Pages": [{"Id": "home"}]
        }))
        .unwrap();
        let reloaded = RoomConfig::from_wire(&original.to_wire(&room_id())).unwrap();
        assert_eq!(reloaded, original);
    }

    #[test]
    fn should_accept_underscore_id_in_document() {
        let doc: RoomDocument =
            serde_json::from_value(json!({"_id": "abc", "config": {"campus": "North"}})).unwrap();
        assert_eq!(doc.reported_id(), Some("abc"));
        assert_eq!(doc.parse().unwrap().campus, "North");
    }

    #[test]
    fn should_accept_document_with_both_id_keys() {
        let doc: RoomDocument =
            serde_json::from_value(json!({"_id": "oid-1", "id": "abc", "config": {}})).unwrap();
        assert_eq!(doc.reported_id(), Some("abc"));
        assert_eq!(doc.store_id.as_deref(), Some("oid-1"));
        assert!(doc.parse().is_ok());
    }

    #[test]
    fn should_accept_document_without_id() {
        let doc: RoomDocument =
            serde_json::from_value(json!({"config": {"campus": "North"}})).unwrap();
        assert_eq!(doc.reported_id(), None);
        assert_eq!(doc.parse().unwrap().campus, "North");

        let empty: RoomDocument = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.parse().unwrap(), RoomConfig::from_wire(&Value::Null).unwrap());
    }
}
