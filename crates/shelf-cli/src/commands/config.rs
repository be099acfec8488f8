//! Config command handlers
//!
//! `show` reports the effective settings, environment overrides included.
//! `set` edits the config file alone, so an override that happens to be
//! active never ends up saved.

use std::path::PathBuf;

use anyhow::{Context, Result};

use shelf_core::{Config, ConfigKey};

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(config_path: Option<&PathBuf>, output: &Output) -> Result<()> {
    let config =
        Config::load_with_cli_override(config_path).context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(&config)?);
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            for key in ConfigKey::ALL {
                let value = config.get(key).unwrap_or_else(|| "(not set)".to_string());
                println!("  {:<13} {}", format!("{}:", key), value);
            }
            println!();
            println!("Config file: {}", file_path(config_path).display());
        }
    }

    Ok(())
}

/// Set a configuration value in the config file
pub fn set(
    key: String,
    value: String,
    config_path: Option<&PathBuf>,
    output: &Output,
) -> Result<()> {
    let key: ConfigKey = key.parse()?;
    let path = file_path(config_path);

    let mut config = Config::load_file_only(&path).context("Failed to load configuration")?;
    config.set(key, &value)?;
    config
        .save_to_path(&path)
        .context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));
    Ok(())
}

/// The config file in use: the `--config` path, or the default location
fn file_path(config_path: Option<&PathBuf>) -> PathBuf {
    config_path.cloned().unwrap_or_else(Config::config_file_path)
}
