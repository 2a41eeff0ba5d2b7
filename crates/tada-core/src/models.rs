//! Data models for tada
//!
//! `Todo` is the server-owned record; the client only ever holds a copy of
//! what the service last confirmed.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned todo identifier
///
/// Opaque to the client. The service may hand out integers or strings; the
/// original JSON shape is kept so it round-trips unchanged into request paths.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TodoId {
    Int(i64),
    Str(String),
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoId::Int(n) => write!(f, "{}", n),
            TodoId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for TodoId {
    fn from(value: i64) -> Self {
        TodoId::Int(value)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        TodoId::Str(value.to_string())
    }
}

/// A single todo item
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Todo {
    pub id: TodoId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Partial update sent with `PUT /todos/{id}`
///
/// Unset fields are left out of the request body entirely.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Patch that only changes the text
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    /// Patch that only changes the completion flag
    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }
}

/// Successful `POST /login` response
///
/// Anything besides the token is passed through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
