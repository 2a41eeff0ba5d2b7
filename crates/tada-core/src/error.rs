//! Error types
//!
//! `ApiError` is what every remote call can fail with. `SessionError` covers
//! reading and writing the persisted session token.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the remote collection client
#[derive(Error, Debug)]
pub enum ApiError {
    /// The service rejected the credential (401 or 422).
    ///
    /// The session store has already been cleared when this is returned.
    #[error("Unauthorized")]
    Unauthorized,

    /// Anything else: a non-success status, a transport failure, or a body
    /// that could not be decoded
    #[error("{message}")]
    RequestFailed {
        message: String,
        /// HTTP status, when a response was received
        status: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ApiError {
    /// Non-success response with an explicit status
    pub fn status(message: impl Into<String>, status: u16) -> Self {
        ApiError::RequestFailed {
            message: message.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Failure below HTTP, or while decoding a response
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ApiError::RequestFailed {
            message: message.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status of a failed request, if one was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized => None,
            ApiError::RequestFailed { status, .. } => *status,
        }
    }
}

/// Errors that can occur while persisting the session token
#[derive(Error, Debug)]
pub enum SessionError {
    /// Failed to read the token file
    #[error("Failed to read session file '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to write the token file
    #[error("Failed to write session file '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Failed to delete the token file
    #[error("Failed to remove session file '{path}': {source}")]
    Remove {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SessionError {
    /// Path of the file involved
    pub fn path(&self) -> &PathBuf {
        match self {
            SessionError::Read { path, .. }
            | SessionError::Write { path, .. }
            | SessionError::Remove { path, .. } => path,
        }
    }

    /// Get a recovery suggestion for this error
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        let kind = match self {
            SessionError::Read { source, .. }
            | SessionError::Write { source, .. }
            | SessionError::Remove { source, .. } => source.kind(),
        };
        match kind {
            io::ErrorKind::PermissionDenied => Some(
                "Check permissions on the data directory, or point TADA_DATA_DIR somewhere writable.",
            ),
            _ => None,
        }
    }
}

/// Result type for session persistence
pub type SessionResult<T> = Result<T, SessionError>;
