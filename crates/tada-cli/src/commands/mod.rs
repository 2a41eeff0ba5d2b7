//! Command handlers

pub mod auth;
pub mod config;
pub mod status;
pub mod todo;

use anyhow::{bail, Result};

use tada_core::Outcome;

/// Printed whenever the service ends the session
pub const LOGIN_HINT: &str = "Session expired or invalid. Log in again with `tada login <email>`.";

/// Turn a view-model outcome into a command result
///
/// `Skipped` is not an error; callers decide what to say about it.
pub fn check(outcome: Outcome) -> Result<Outcome> {
    match outcome {
        Outcome::Failed(message) => bail!(message),
        Outcome::SessionEnded => bail!(LOGIN_HINT),
        other => Ok(other),
    }
}
