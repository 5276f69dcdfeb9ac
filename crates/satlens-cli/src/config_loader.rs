//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use satlens_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file picked up from the working directory
pub const CONFIG_FILE_NAME: &str = "satlens.toml";

/// Load layered configuration: defaults, file, environment, then CLI overrides
pub fn load_config(explicit: Option<&Path>, overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = config_file(explicit)? {
        tracing::debug!(path = %path.display(), "Loading config file");
        config = config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?;
    }

    let mut config = config.load_from_env();
    config.update_from_cli(overrides);
    Ok(config)
}

/// An explicit path must exist; the implicit one is optional
fn config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    match explicit {
        Some(path) => {
            if !path.is_file() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            Ok(Some(path.to_path_buf()))
        }
        None => {
            let implicit = std::env::current_dir()?.join(CONFIG_FILE_NAME);
            Ok(implicit.is_file().then_some(implicit))
        }
    }
}
