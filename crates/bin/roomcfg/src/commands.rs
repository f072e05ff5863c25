//! Subcommand execution over an editor session.

use std::io::Write;

use anyhow::{Context, bail};
use roomcfg_app::ports::{Navigator, RoomStore};
use roomcfg_app::services::editor_session::EditorSession;
use roomcfg_domain::action::{ActionEntry, spec_for};
use roomcfg_domain::id::RoomId;
use roomcfg_domain::room::Phase;

use crate::cli::{ActionEdit, Command};
use crate::render::Summary;

/// Logs when the session hands control back.
struct CliNavigator {
    room_id: RoomId,
}

impl Navigator for CliNavigator {
    fn leave(&self) {
        tracing::info!(room_id = %self.room_id, "leaving editor");
    }
}

fn position(index: usize) -> anyhow::Result<usize> {
    index
        .checked_sub(1)
        .context("action positions start at 1")
}

async fn open<S: RoomStore>(
    store: S,
    room: RoomId,
) -> anyhow::Result<EditorSession<S, CliNavigator>> {
    let navigator = CliNavigator {
        room_id: room.clone(),
    };
    let session = EditorSession::new(room, store, navigator);
    session.load().await?;
    Ok(session)
}

fn apply<S: RoomStore, N: Navigator>(
    session: &EditorSession<S, N>,
    phase: Phase,
    index: usize,
    edit: ActionEdit,
) -> anyhow::Result<()> {
    if let Some(kind) = edit.kind {
        session.change_kind(phase, index, kind)?;
    }
    let kind = session
        .read(|model| model.config.actions(phase).get(index).map(ActionEntry::kind))?
        .with_context(|| format!("{phase} action #{} does not exist", index + 1))?;
    for (key, raw) in edit.assignments {
        let value = spec_for(kind, key)
            .with_context(|| format!("`{key}` is not a field of `{kind}`"))?
            .kind
            .parse_input(&raw);
        session.set_field(phase, index, key, value)?;
    }
    Ok(())
}

async fn save<S: RoomStore, N: Navigator>(
    session: &EditorSession<S, N>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    session.save().await?;
    writeln!(out, "saved {}", session.room_id())?;
    Ok(())
}

/// Run `command` against `store`, writing operator output to `out`.
///
/// # Errors
///
/// Returns an error when loading, editing, validating or saving fails.
pub async fn execute<S: RoomStore>(
    command: Command,
    store: S,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Show { room, json } => {
            let session = open(store, room).await?;
            let view = session.view()?;
            if json {
                serde_json::to_writer_pretty(&mut *out, &view)?;
                writeln!(out)?;
            } else {
                write!(out, "{}", Summary(&view))?;
            }
        }
        Command::Check { room } => {
            let session = open(store, room).await?;
            let report = session.validate()?;
            if !report.is_ok() {
                for issue in &report.issues {
                    writeln!(out, "{issue}")?;
                }
                bail!("{} has {} problem(s)", session.room_id(), report.issues.len());
            }
            writeln!(out, "{} is valid", session.room_id())?;
        }
        Command::Add { room, phase, edit } => {
            let session = open(store, room).await?;
            let index = session.add_action(phase)?;
            apply(&session, phase, index, edit)?;
            save(&session, out).await?;
        }
        Command::Edit {
            room,
            phase,
            index,
            edit,
        } => {
            let index = position(index)?;
            let session = open(store, room).await?;
            apply(&session, phase, index, edit)?;
            save(&session, out).await?;
        }
        Command::Remove { room, phase, index } => {
            let index = position(index)?;
            let session = open(store, room).await?;
            session.remove_action(phase, index)?;
            save(&session, out).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomcfg_domain::action::{ActionKind, FieldKey};
    use roomcfg_domain::error::{NotFoundError, RoomCfgError};
    use roomcfg_domain::wire::RoomDocument;
    use serde_json::{Value, json};
    use std::future::Future;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct InMemoryRoomStore {
        documents: Arc<Mutex<std::collections::HashMap<String, Value>>>,
    }

    impl InMemoryRoomStore {
        fn with_room(id: &str, config: Value) -> Self {
            let store = Self::default();
            store
                .documents
                .lock()
                .unwrap()
                .insert(id.to_string(), config);
            store
        }

        fn config(&self, id: &str) -> Value {
            self.documents.lock().unwrap()[id].clone()
        }
    }

    impl RoomStore for InMemoryRoomStore {
        fn fetch(
            &self,
            room_id: &RoomId,
        ) -> impl Future<Output = Result<RoomDocument, RoomCfgError>> + Send {
            let result: Result<RoomDocument, RoomCfgError> = self
                .documents
                .lock()
                .unwrap()
                .get(room_id.as_str())
                .map(|config| RoomDocument::new(room_id.as_str(), config.clone()))
                .ok_or_else(|| {
                    NotFoundError {
                        entity: "Room",
                        id: room_id.to_string(),
                    }
                    .into()
                });
            async { result }
        }

        fn save(
            &self,
            room_id: &RoomId,
            config: Value,
        ) -> impl Future<Output = Result<(), RoomCfgError>> + Send {
            self.documents
                .lock()
                .unwrap()
                .insert(room_id.to_string(), config);
            async { Ok::<(), RoomCfgError>(()) }
        }
    }

    fn room() -> RoomId {
        RoomId::new("room-101").unwrap()
    }

    fn stored() -> InMemoryRoomStore {
        InMemoryRoomStore::with_room(
            "room-101",
            json!({
                "campus": "North",
                "building": "Science",
                "room": "101",
                "ip": "10.0.0.12",
                "SystemOnActions": [{"action": "TurnOn", "device": "proj1"}],
                "SystemOffActions": [{"action": "TurnOff", "device": "proj1"}],
                "Devices": {"proj1": {}}
            }),
        )
    }

    async fn run(command: Command, store: &InMemoryRoomStore) -> anyhow::Result<String> {
        let mut out = Vec::new();
        execute(command, store.clone(), &mut out).await?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn should_show_room_as_json() {
        let store = stored();
        let out = run(
            Command::Show {
                room: room(),
                json: true,
            },
            &store,
        )
        .await
        .unwrap();
        let view: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(view["room_id"], "room-101");
        assert_eq!(view["phases"][0]["actions"][0]["kind"], "TurnOn");
    }

    #[tokio::test]
    async fn should_check_valid_room() {
        let store = stored();
        let out = run(Command::Check { room: room() }, &store).await.unwrap();
        assert_eq!(out, "room-101 is valid\n");
    }

    #[tokio::test]
    async fn should_fail_check_for_missing_room() {
        let store = InMemoryRoomStore::default();
        let err = run(Command::Check { room: room() }, &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "failed to load room config");
    }

    #[tokio::test]
    async fn should_add_typed_action_and_save() {
        let store = stored();
        let edit = ActionEdit {
            kind: Some(ActionKind::StartAutoshutdown),
            assignments: vec![(FieldKey::Seconds, "600".to_string())],
        };

        let out = run(
            Command::Add {
                room: room(),
                phase: Phase::Shutdown,
                edit,
            },
            &store,
        )
        .await
        .unwrap();

        assert_eq!(out, "saved room-101\n");
        assert_eq!(
            store.config("room-101")["SystemOffActions"][1],
            json!({"action": "StartAutoshutdown", "seconds": 600})
        );
    }

    #[tokio::test]
    async fn should_refuse_to_save_incomplete_action() {
        let store = stored();
        let before = store.config("room-101");

        let err = run(
            Command::Add {
                room: room(),
                phase: Phase::Startup,
                edit: ActionEdit::default(),
            },
            &store,
        )
        .await
        .unwrap_err();

        assert_eq!(
            err.to_string(),
            "configuration is invalid: startup action #2: `device` is required"
        );
        assert_eq!(store.config("room-101"), before);
    }

    #[tokio::test]
    async fn should_edit_action_by_position() {
        let store = stored();
        let edit = ActionEdit {
            kind: Some(ActionKind::RouteVideo),
            assignments: vec![
                (FieldKey::Input, "hdmi1".to_string()),
                (FieldKey::Output, "hdmi2".to_string()),
            ],
        };

        run(
            Command::Edit {
                room: room(),
                phase: Phase::Startup,
                index: 1,
                edit,
            },
            &store,
        )
        .await
        .unwrap();

        assert_eq!(
            store.config("room-101")["SystemOnActions"],
            json!([{"action": "RouteVideo", "device": "proj1", "input": "hdmi1", "output": "hdmi2"}])
        );
    }

    #[tokio::test]
    async fn should_reject_field_outside_schema() {
        let store = stored();
        let edit = ActionEdit {
            kind: None,
            assignments: vec![(FieldKey::Seconds, "5".to_string())],
        };
        let err = run(
            Command::Edit {
                room: room(),
                phase: Phase::Startup,
                index: 1,
                edit,
            },
            &store,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "`seconds` is not a field of `TurnOn`");
    }

    #[tokio::test]
    async fn should_remove_action_and_save() {
        let store = stored();

        run(
            Command::Remove {
                room: room(),
                phase: Phase::Shutdown,
                index: 1,
            },
            &store,
        )
        .await
        .unwrap();

        assert_eq!(store.config("room-101")["SystemOffActions"], json!([]));
    }

    #[tokio::test]
    async fn should_reject_position_zero() {
        let store = stored();
        let err = run(
            Command::Remove {
                room: room(),
                phase: Phase::Shutdown,
                index: 0,
            },
            &store,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "action positions start at 1");
    }
}
