//! Collection view-model
//!
//! Holds the client's copy of the todo list and mediates every change through
//! the [`ApiClient`]. Local state only moves after the service confirms:
//! nothing is inserted, flipped or removed optimistically.
//!
//! ## State
//!
//! ```text
//! Idle ──load()──▶ Loading ──ok──▶ Ready
//!                     │
//!                     ├──Unauthorized──▶ session ended (never Ready)
//!                     └──other error───▶ Error
//! ```
//!
//! At most one item is being edited at a time (the [`EditCursor`]). Only the
//! most recent failure message is kept.
//!
//! Presentation layers read [`TodoList::state`] or [`TodoList::subscribe`] to
//! a watch channel that is updated after every change.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::error::{ApiError, SessionError};
use crate::models::{Todo, TodoId, TodoPatch};

/// Where the initial load stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Waiting for the collection
    Loading,
    /// Collection loaded
    Ready,
    /// Loading failed; see `TodoListState::error`
    Error,
}

/// The single in-progress edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditCursor {
    pub id: TodoId,
    /// Uncommitted text, separate from the item's confirmed text
    pub draft: String,
}

/// Snapshot of everything a presentation layer needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoListState {
    pub phase: Phase,
    pub items: Vec<Todo>,
    pub edit: Option<EditCursor>,
    /// Draft for the next `add()`
    pub input: String,
    /// Most recent failure message
    pub error: Option<String>,
    /// False once the session has ended; the caller should go back to login
    pub authenticated: bool,
}

impl TodoListState {
    pub fn get(&self, id: &TodoId) -> Option<&Todo> {
        self.items.iter().find(|t| &t.id == id)
    }

    pub fn is_editing(&self, id: &TodoId) -> bool {
        self.edit.as_ref().is_some_and(|c| &c.id == id)
    }
}

/// Result of a view-model operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service confirmed and local state was updated
    Applied,
    /// Rejected before any request was made (blank text, unknown item)
    Skipped,
    /// The service call failed; the message is also in `TodoListState::error`
    Failed(String),
    /// The credential was rejected and has been cleared
    SessionEnded,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

/// The todo list for one logged-in session
pub struct TodoList {
    api: ApiClient,
    state: TodoListState,
    tx: watch::Sender<TodoListState>,
}

impl TodoList {
    pub fn new(api: ApiClient) -> Self {
        let state = TodoListState {
            authenticated: api.session().is_authenticated(),
            ..TodoListState::default()
        };
        let (tx, _rx) = watch::channel(state.clone());
        Self { api, state, tx }
    }

    /// Current state
    pub fn state(&self) -> &TodoListState {
        &self.state
    }

    /// Receive a new snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<TodoListState> {
        self.tx.subscribe()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Fetch the collection
    ///
    /// Meant to run once per session; overlapping loads are not guarded.
    pub async fn load(&mut self) -> Outcome {
        self.state.phase = Phase::Loading;
        self.state.error = None;
        self.publish();

        match self.api.list().await {
            Ok(items) => {
                self.state.items = dedup_by_id(items);
                self.state.edit = None;
                self.state.phase = Phase::Ready;
                info!("Loaded {} todo(s)", self.state.items.len());
                self.publish();
                Outcome::Applied
            }
            Err(ApiError::Unauthorized) => {
                self.state.phase = Phase::Idle;
                self.end_session()
            }
            Err(e) => {
                self.state.phase = Phase::Error;
                self.fail(e)
            }
        }
    }

    /// Replace the add-form draft
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input = text.into();
        self.publish();
    }

    /// Create a todo from the current input
    ///
    /// The item shows up only once the service returns it.
    pub async fn add(&mut self) -> Outcome {
        if self.state.input.trim().is_empty() {
            return Outcome::Skipped;
        }
        self.clear_error();

        let text = self.state.input.clone();
        match self.api.create(&text).await {
            Ok(todo) => {
                debug!("Created todo {}", todo.id);
                self.upsert(todo);
                self.state.input.clear();
                self.publish();
                Outcome::Applied
            }
            Err(e) => self.fail(e),
        }
    }

    /// Flip `completed`, keeping whatever record the service sends back
    pub async fn toggle(&mut self, id: &TodoId) -> Outcome {
        let Some(current) = self.state.get(id).map(|t| t.completed) else {
            return Outcome::Skipped;
        };
        self.clear_error();

        match self.api.update(id, &TodoPatch::completed(!current)).await {
            Ok(todo) => {
                self.replace(id, todo);
                self.publish();
                Outcome::Applied
            }
            Err(e) => self.fail(e),
        }
    }

    /// Begin editing `id`, dropping any other uncommitted draft
    pub fn start_edit(&mut self, id: &TodoId) -> Outcome {
        let Some(draft) = self.state.get(id).map(|t| t.text.clone()) else {
            return Outcome::Skipped;
        };

        if let Some(ref prev) = self.state.edit {
            if &prev.id != id {
                debug!("Abandoning draft for {}", prev.id);
            }
        }

        self.state.edit = Some(EditCursor {
            id: id.clone(),
            draft,
        });
        self.publish();
        Outcome::Applied
    }

    /// Replace the draft text of the active edit, if any
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(ref mut cursor) = self.state.edit {
            cursor.draft = text.into();
            self.publish();
        }
    }

    pub fn cancel_edit(&mut self) {
        if self.state.edit.take().is_some() {
            self.publish();
        }
    }

    /// Send the active draft
    ///
    /// On failure the edit stays open so it can be retried or cancelled.
    pub async fn save_edit(&mut self) -> Outcome {
        let Some(cursor) = self.state.edit.clone() else {
            return Outcome::Skipped;
        };
        if cursor.draft.trim().is_empty() {
            return Outcome::Skipped;
        }
        self.clear_error();

        match self.api.update(&cursor.id, &TodoPatch::text(cursor.draft)).await {
            Ok(todo) => {
                self.replace(&cursor.id, todo);
                self.state.edit = None;
                self.publish();
                Outcome::Applied
            }
            Err(e) => self.fail(e),
        }
    }

    /// Delete `id`, closing its edit if one is open
    pub async fn delete(&mut self, id: &TodoId) -> Outcome {
        self.clear_error();

        match self.api.delete(id).await {
            Ok(()) => {
                self.state.items.retain(|t| &t.id != id);
                if self.state.is_editing(id) {
                    self.state.edit = None;
                }
                self.publish();
                Outcome::Applied
            }
            Err(e) => self.fail(e),
        }
    }

    /// End the session on request
    ///
    /// Local state is reset even if the persisted token could not be removed.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        let result = self.api.logout();
        self.state = TodoListState::default();
        self.publish();
        result
    }

    fn clear_error(&mut self) {
        if self.state.error.take().is_some() {
            self.publish();
        }
    }

    fn fail(&mut self, err: ApiError) -> Outcome {
        if err.is_unauthorized() {
            return self.end_session();
        }

        let message = err.to_string();
        warn!("{}", message);
        self.state.error = Some(message.clone());
        self.publish();
        Outcome::Failed(message)
    }

    /// The client already cleared the credential; just reflect it
    fn end_session(&mut self) -> Outcome {
        info!("Session ended by the service");
        self.state.authenticated = false;
        self.publish();
        Outcome::SessionEnded
    }

    fn replace(&mut self, id: &TodoId, todo: Todo) {
        if let Some(slot) = self.state.items.iter_mut().find(|t| &t.id == id) {
            *slot = todo;
        }
    }

    /// Append, unless the service handed back an id we already hold
    fn upsert(&mut self, todo: Todo) {
        match self.state.items.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => *slot = todo,
            None => self.state.items.push(todo),
        }
    }

    fn publish(&self) {
        self.tx.send_replace(self.state.clone());
    }
}

/// Keep the first occurrence of each id
fn dedup_by_id(items: Vec<Todo>) -> Vec<Todo> {
    let mut seen = std::collections::HashSet::new();
    let before = items.len();
    let items: Vec<Todo> = items
        .into_iter()
        .filter(|t| seen.insert(t.id.clone()))
        .collect();
    if items.len() != before {
        warn!("Dropped {} duplicate todo(s) from list", before - items.len());
    }
    items
}
