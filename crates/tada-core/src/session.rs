//! Session store
//!
//! Single source of truth for the bearer token. The token is held in memory
//! and mirrored to a single file so a later process can pick the session up
//! again. Contents are never inspected.
//!
//! Readers take a snapshot per request; login and logout take the write lock.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, info};

use crate::error::{SessionError, SessionResult};

/// Holds the current credential, if any
pub struct SessionStore {
    token: RwLock<Option<String>>,
    /// Where the token is persisted; `None` keeps it in memory only
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store backed by `path`, restoring any persisted token
    pub fn open(path: impl Into<PathBuf>) -> SessionResult<Self> {
        let path = path.into();
        let token = read_token(&path)?;

        if token.is_some() {
            debug!("Restored session from {:?}", path);
        }

        Ok(Self {
            token: RwLock::new(token),
            path: Some(path),
        })
    }

    /// A store that never touches the filesystem
    pub fn in_memory() -> Self {
        Self {
            token: RwLock::new(None),
            path: None,
        }
    }

    /// Current token
    pub fn credential(&self) -> Option<String> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }

    /// Persist a new token, then make it current
    ///
    /// If the file cannot be written the previous credential is kept.
    pub fn set_credential(&self, token: impl Into<String>) -> SessionResult<()> {
        let token = token.into();

        if let Some(ref path) = self.path {
            write_token(path, &token)?;
            info!("Session saved to {:?}", path);
        }

        self.replace(Some(token));
        Ok(())
    }

    /// Forget the current token and delete the persisted copy
    pub fn clear_credential(&self) -> SessionResult<()> {
        self.replace(None);

        if let Some(ref path) = self.path {
            match fs::remove_file(path) {
                Ok(()) => info!("Session cleared"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(source) => {
                    return Err(SessionError::Remove {
                        path: path.clone(),
                        source,
                    })
                }
            }
        }
        Ok(())
    }

    /// Path of the backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn replace(&self, token: Option<String>) {
        match self.token.write() {
            Ok(mut guard) => *guard = token,
            Err(poisoned) => *poisoned.into_inner() = token,
        }
    }
}

// Tokens never show up in debug output
impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .field("path", &self.path)
            .finish()
    }
}

/// Read a persisted token; a missing or blank file means no session
fn read_token(path: &Path) -> SessionResult<Option<String>> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SessionError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let token = content.trim();
    if token.is_empty() {
        Ok(None)
    } else {
        Ok(Some(token.to_string()))
    }
}

/// Write the token atomically (temp file + rename), owner-readable only
fn write_token(path: &Path, token: &str) -> SessionResult<()> {
    let write_err = |source| SessionError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let temp_path = path.with_extension("tmp");
    let mut file = create_private(&temp_path).map_err(write_err)?;
    file.write_all(token.as_bytes()).map_err(write_err)?;
    file.sync_all().map_err(write_err)?;

    fs::rename(&temp_path, path).map_err(write_err)?;
    Ok(())
}

#[cfg(unix)]
fn create_private(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn create_private(path: &Path) -> io::Result<File> {
    File::create(path)
}
