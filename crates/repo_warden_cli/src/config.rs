//! Configuration file loading.

use std::path::Path;

use config_manager::{validate_settings, GovernanceConfig};
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Loads and validates a governance configuration from a YAML file.
///
/// # Errors
///
/// Returns an [`Error`] when the file cannot be read, is not valid YAML for
/// the model, or fails validation.
pub fn load_config(path: &Path) -> Result<GovernanceConfig, Error> {
    let path_display = path.display().to_string();
    let raw = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path_display.clone(),
        source,
    })?;

    let config: GovernanceConfig =
        serde_yaml::from_str(&raw).map_err(|source| Error::ConfigParse {
            path: path_display.clone(),
            source,
        })?;

    validate_settings(&config)?;
    debug!(
        path = %path_display,
        repositories = config.repositories.len(),
        teams = config.team_permissions.len(),
        "configuration loaded"
    );
    Ok(config)
}
