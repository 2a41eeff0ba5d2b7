//! Login, logout

use anyhow::{Context, Result};

use tada_core::ApiClient;

use crate::output::Output;
use crate::prompt;

/// Log in and persist the session
pub async fn login(
    api: &ApiClient,
    email: String,
    password: Option<String>,
    output: &Output,
) -> Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt::ask_password()?.context("Login cancelled")?,
    };

    let response = api.login(&email, &password).await?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "status": "success",
                "email": email,
                "extra": response.extra,
            })
        );
    } else {
        output.success(&format!("Logged in as {}", email));
    }

    Ok(())
}

/// Forget the stored session
pub fn logout(api: &ApiClient, output: &Output) -> Result<()> {
    let was_logged_in = api.session().is_authenticated();
    api.logout().context("Failed to clear session")?;

    if was_logged_in {
        output.success("Logged out");
    } else {
        output.message("Not logged in.");
    }
    Ok(())
}
