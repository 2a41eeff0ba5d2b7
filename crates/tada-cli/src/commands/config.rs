//! Config command handlers

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use tada_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "api_url": config.api_url,
                    "data_dir": config.data_dir,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.api_url);
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  api_url:  {}", config.api_url);
            println!("  data_dir: {}", config.data_dir.display());
            println!(
                "  log_file: {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let mut config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    apply(&mut config, &key, &value)?;

    // Save to the CLI-specified path or default
    let save_path = config_path
        .cloned()
        .unwrap_or_else(Config::config_file_path);
    config
        .save_to_path(&save_path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}

fn apply(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "api_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                bail!("api_url must start with http:// or https://");
            }
            config.api_url = value.trim_end_matches('/').to_string();
        }
        "data_dir" => {
            config.data_dir = value.into();
        }
        "log_file" => {
            config.log_file = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.into())
            };
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: api_url, data_dir, log_file",
                key
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_apply_api_url() {
        let mut config = Config::default();
        apply(&mut config, "api_url", "https://todos.example.com/").unwrap();
        assert_eq!(config.api_url, "https://todos.example.com");

        assert!(apply(&mut config, "api_url", "todos.example.com").is_err());
    }

    #[test]
    fn test_apply_log_file_none_clears() {
        let mut config = Config::default();
        apply(&mut config, "log_file", "/tmp/tada.log").unwrap();
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/tada.log")));

        apply(&mut config, "log_file", "none").unwrap();
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_apply_unknown_key() {
        let mut config = Config::default();
        let err = apply(&mut config, "sync_url", "x").unwrap_err();
        assert!(err.to_string().contains("Unknown configuration key"));
    }

    #[test]
    fn test_set_writes_to_cli_config_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let data_dir = temp_dir.path().join("data");
        std::fs::write(&config_path, format!("data_dir = {:?}\n", data_dir)).unwrap();

        let output = Output::new(OutputFormat::Quiet);
        set(
            "api_url".to_string(),
            "https://todos.example.com".to_string(),
            Some(&config_path),
            &output,
        )
        .unwrap();

        let config = Config::load_from_path(&config_path).unwrap();
        assert_eq!(config.api_url, "https://todos.example.com");
        assert_eq!(config.data_dir, data_dir);
    }
}
