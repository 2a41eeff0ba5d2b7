//! tada Core Library
//!
//! Session-aware client for a remote todo service: a credential store, an
//! HTTP client that attaches that credential to every request, and a
//! view-model that only changes local state after the service confirms.
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn demo() -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use tada_core::{ApiClient, Config, Outcome, SessionStore, TodoList};
//!
//! let config = Config::load()?;
//! let session = Arc::new(SessionStore::open(config.session_path())?);
//! let api = ApiClient::from_config(&config, session);
//!
//! if !api.session().is_authenticated() {
//!     api.login("a@b.com", "secret").await?;
//! }
//!
//! let mut list = TodoList::new(api);
//! if list.load().await == Outcome::SessionEnded {
//!     // back to login
//! }
//! list.set_input("buy milk");
//! list.add().await;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - `config`: Application configuration
//! - `session`: Bearer token storage and persistence
//! - `api`: Remote collection client
//! - `view_model`: In-memory todo list driven by confirmed server state
//! - `models`: Wire types
//! - `error`: Error taxonomy

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod view_model;

pub use api::ApiClient;
pub use config::Config;
pub use error::{ApiError, SessionError};
pub use models::{LoginResponse, Todo, TodoId, TodoPatch};
pub use session::SessionStore;
pub use view_model::{EditCursor, Outcome, Phase, TodoList, TodoListState};
