use super::{ConfigError, OrdoConfig};
use crate::utils::atomic_write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

pub const CONFIG_FILE: &str = "config.toml";

#[must_use]
pub fn config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE)
}

/// Load settings from `<data_dir>/config.toml`.
///
/// Returns `Ok(OrdoConfig::default())` if the file does not exist.
pub async fn load_config(data_dir: &Path) -> Result<OrdoConfig, ConfigError> {
    let path = config_path(data_dir);
    if !path.exists() {
        debug!("Config not found at {}; using defaults", path.display());
        return Ok(OrdoConfig::default());
    }
    let content = fs::read_to_string(&path).await?;
    let config: OrdoConfig = toml::from_str(&content)?;
    // A bad TTL fails here, not at the next login
    config.auth.session_ttl()?;
    debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Write settings back to `<data_dir>/config.toml`.
pub async fn save_config(data_dir: &Path, config: &OrdoConfig) -> Result<(), ConfigError> {
    fs::create_dir_all(data_dir).await?;
    let content = toml::to_string_pretty(config)?;
    atomic_write(&config_path(data_dir), &content).await?;
    debug!("Saved config to {}", config_path(data_dir).display());
    Ok(())
}
