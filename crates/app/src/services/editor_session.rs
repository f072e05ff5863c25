//! Editor session — load, edit, validate and save one room configuration.
//!
//! A session runs on a single thread. Model mutations are synchronous and
//! complete before the next event is handled; only [`EditorSession::load`]
//! and [`EditorSession::save`] await the store. Methods take `&self` so
//! that a renderer can keep issuing events while a request is outstanding;
//! a second save issued in that window is refused.

use std::cell::{Cell, Ref, RefCell};

use roomcfg_domain::action::{ActionEntry, ActionKind, FieldKey, FieldValue};
use roomcfg_domain::context::EditorContext;
use roomcfg_domain::error::{ActionError, RoomCfgError};
use roomcfg_domain::id::RoomId;
use roomcfg_domain::room::{Phase, RoomConfig};
use roomcfg_domain::validation::{ValidationReport, validate};

use crate::ports::{Navigator, RoomStore};
use crate::view::EditorView;

/// A loaded configuration together with the context derived from it.
#[derive(Debug, Clone)]
pub struct EditorModel {
    pub config: RoomConfig,
    pub context: EditorContext,
}

impl EditorModel {
    /// Build the model for a freshly parsed configuration.
    #[must_use]
    pub fn new(config: RoomConfig) -> Self {
        let context = config.editor_context();
        Self { config, context }
    }
}

/// Where the session stands with respect to its document.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// No document yet, or a load is in flight.
    Loading,
    /// The last load failed; nothing is editable.
    Failed(String),
    /// A document is loaded and editable.
    Ready(Box<EditorModel>),
}

/// Errors returned by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation needs a loaded document.
    #[error("configuration is not loaded")]
    NotLoaded,

    /// A load request is already outstanding.
    #[error("a load is already in progress")]
    LoadInProgress,

    /// A save request is already outstanding.
    #[error("a save is already in progress")]
    SaveInProgress,

    /// Save was refused because the configuration has problems.
    #[error("configuration is invalid: {0}")]
    Invalid(ValidationReport),

    /// The addressed action does not exist.
    #[error("{phase} action #{} does not exist", .index + 1)]
    NoSuchAction { phase: Phase, index: usize },

    /// An edit addressed a field outside the action's schema.
    #[error(transparent)]
    Edit(#[from] ActionError),

    /// Fetching or parsing the document failed.
    #[error("failed to load room config")]
    Load(#[source] RoomCfgError),

    /// Submitting the document failed.
    #[error("save failed")]
    Save(#[source] RoomCfgError),
}

impl SessionError {
    /// The single line shown to the operator.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Load(err) | Self::Save(err) => err.message(),
            other => other.to_string(),
        }
    }
}

/// Resets a busy flag when the request completes or its future is dropped.
struct BusyGuard<'a>(&'a Cell<bool>);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.replace(true) {
            return None;
        }
        Some(Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Editing session for one room.
pub struct EditorSession<S, N> {
    room_id: RoomId,
    store: S,
    navigator: N,
    state: RefCell<SessionState>,
    loading: Cell<bool>,
    saving: Cell<bool>,
    save_error: RefCell<Option<String>>,
}

impl<S: RoomStore, N: Navigator> EditorSession<S, N> {
    /// Create a session in the [`SessionState::Loading`] state.
    pub fn new(room_id: RoomId, store: S, navigator: N) -> Self {
        Self {
            room_id,
            store,
            navigator,
            state: RefCell::new(SessionState::Loading),
            loading: Cell::new(false),
            saving: Cell::new(false),
            save_error: RefCell::new(None),
        }
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> Ref<'_, SessionState> {
        self.state.borrow()
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(*self.state.borrow(), SessionState::Ready(_))
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.get()
    }

    /// Message of the last failed load, if the session is in that state.
    #[must_use]
    pub fn load_error(&self) -> Option<String> {
        match &*self.state.borrow() {
            SessionState::Failed(message) => Some(message.clone()),
            SessionState::Loading | SessionState::Ready(_) => None,
        }
    }

    /// Message of the last failed save, cleared when a new save starts.
    #[must_use]
    pub fn save_error(&self) -> Option<String> {
        self.save_error.borrow().clone()
    }

    /// Fetch and parse the document, replacing any in-memory model.
    ///
    /// Unsaved edits are discarded. A save already in flight is not
    /// cancelled.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LoadInProgress`] when a load is outstanding,
    /// or [`SessionError::Load`] when fetching or parsing fails; the session
    /// is then in [`SessionState::Failed`].
    #[tracing::instrument(skip(self), fields(room_id = %self.room_id))]
    pub async fn load(&self) -> Result<(), SessionError> {
        let Some(_busy) = BusyGuard::acquire(&self.loading) else {
            tracing::warn!("load refused: already loading");
            return Err(SessionError::LoadInProgress);
        };
        self.state.replace(SessionState::Loading);

        let fetched = self.store.fetch(&self.room_id).await;
        let parsed = fetched.and_then(|document| document.parse().map_err(RoomCfgError::from));
        match parsed {
            Ok(config) => {
                let model = EditorModel::new(config);
                tracing::debug!(
                    startup = model.config.on_startup.len(),
                    shutdown = model.config.on_shutdown.len(),
                    "room config loaded"
                );
                self.state.replace(SessionState::Ready(Box::new(model)));
                Ok(())
            }
            Err(err) => {
                let message = err.message();
                tracing::warn!(error = %message, "failed to load room config");
                self.state.replace(SessionState::Failed(message));
                Err(SessionError::Load(err))
            }
        }
    }

    /// Read the loaded model.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] unless the session is ready.
    pub fn read<R>(&self, f: impl FnOnce(&EditorModel) -> R) -> Result<R, SessionError> {
        match &*self.state.borrow() {
            SessionState::Ready(model) => Ok(f(model)),
            SessionState::Loading | SessionState::Failed(_) => Err(SessionError::NotLoaded),
        }
    }

    /// Mutate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] unless the session is ready.
    pub fn update<R>(&self, f: impl FnOnce(&mut RoomConfig) -> R) -> Result<R, SessionError> {
        match &mut *self.state.borrow_mut() {
            SessionState::Ready(model) => Ok(f(&mut model.config)),
            SessionState::Loading | SessionState::Failed(_) => Err(SessionError::NotLoaded),
        }
    }

    fn update_entry<R>(
        &self,
        phase: Phase,
        index: usize,
        f: impl FnOnce(&mut ActionEntry) -> Result<R, SessionError>,
    ) -> Result<R, SessionError> {
        self.update(|config| {
            config
                .actions_mut(phase)
                .get_mut(index)
                .ok_or(SessionError::NoSuchAction { phase, index })
                .and_then(f)
        })?
    }

    /// Append a default action to `phase` and return its index.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] unless the session is ready.
    pub fn add_action(&self, phase: Phase) -> Result<usize, SessionError> {
        self.update(|config| config.actions_mut(phase).add())
    }

    /// Remove the action at `index` of `phase`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchAction`] when `index` is out of range.
    pub fn remove_action(&self, phase: Phase, index: usize) -> Result<ActionEntry, SessionError> {
        self.update(|config| {
            config
                .actions_mut(phase)
                .remove_at(index)
                .ok_or(SessionError::NoSuchAction { phase, index })
        })?
    }

    /// Switch the kind of an action, keeping the values of shared fields.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchAction`] when `index` is out of range.
    pub fn change_kind(
        &self,
        phase: Phase,
        index: usize,
        kind: ActionKind,
    ) -> Result<(), SessionError> {
        self.update_entry(phase, index, |entry| {
            let previous = entry.kind();
            *entry = entry.change_kind(kind);
            tracing::debug!(%phase, index, from = %previous, to = %kind, "action kind changed");
            Ok(())
        })
    }

    /// Set one field of an action.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSuchAction`] when `index` is out of range and
    /// [`SessionError::Edit`] when `key` is not a field of the action's kind.
    pub fn set_field(
        &self,
        phase: Phase,
        index: usize,
        key: FieldKey,
        value: impl Into<FieldValue>,
    ) -> Result<(), SessionError> {
        self.update_entry(phase, index, |entry| {
            entry.try_set_field(key, value).map_err(SessionError::from)
        })
    }

    /// Validate the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] unless the session is ready.
    pub fn validate(&self) -> Result<ValidationReport, SessionError> {
        self.read(|model| validate(&model.config))
    }

    /// Read model for rendering.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotLoaded`] unless the session is ready.
    pub fn view(&self) -> Result<EditorView, SessionError> {
        self.read(|model| EditorView::new(&self.room_id, model))
    }

    /// Validate, flatten and submit the configuration.
    ///
    /// On success the navigator is asked to leave the editor. On failure the
    /// model stays loaded and editable, and [`save_error`](Self::save_error)
    /// holds the message.
    ///
    /// # Errors
    ///
    /// - [`SessionError::SaveInProgress`] while another save is outstanding
    /// - [`SessionError::NotLoaded`] unless the session is ready
    /// - [`SessionError::Invalid`] when validation finds problems
    /// - [`SessionError::Save`] when the store rejects the document
    #[tracing::instrument(skip(self), fields(room_id = %self.room_id))]
    pub async fn save(&self) -> Result<(), SessionError> {
        let Some(_busy) = BusyGuard::acquire(&self.saving) else {
            tracing::warn!("save refused: already saving");
            return Err(SessionError::SaveInProgress);
        };
        self.save_error.replace(None);

        let body = self.read(|model| {
            let report = validate(&model.config);
            if report.is_ok() {
                Ok(model.config.to_wire(&self.room_id))
            } else {
                Err(SessionError::Invalid(report))
            }
        })??;

        match self.store.save(&self.room_id, body).await {
            Ok(()) => {
                tracing::info!("room config saved");
                self.navigator.leave();
                Ok(())
            }
            Err(err) => {
                let message = err.message();
                tracing::warn!(error = %message, "failed to save room config");
                self.save_error.replace(Some(message));
                Err(SessionError::Save(err))
            }
        }
    }

    /// Leave the editor without saving.
    pub fn cancel(&self) {
        tracing::debug!(room_id = %self.room_id, "edit cancelled");
        self.navigator.leave();
    }
}
