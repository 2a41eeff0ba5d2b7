//! Status command handler

use anyhow::Result;

use tada_core::ApiClient;

use crate::output::{Output, OutputFormat};

/// Show where we talk to and whether a session is held
pub fn show(api: &ApiClient, output: &Output) -> Result<()> {
    let authenticated = api.session().is_authenticated();
    let session_path = api.session().path();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": api.base_url(),
                    "authenticated": authenticated,
                    "session_file": session_path,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", if authenticated { "authenticated" } else { "anonymous" });
        }
        OutputFormat::Human => {
            println!("tada Status");
            println!("===========");
            println!();
            println!("Service: {}", api.base_url());
            println!(
                "Session: {}",
                if authenticated {
                    "logged in"
                } else {
                    "not logged in"
                }
            );
            println!(
                "Stored:  {}",
                session_path
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(memory only)".to_string())
            );
        }
    }

    Ok(())
}
