//! Settings persistence.
//!
//! TOML file in the platform config directory. A missing file loads
//! defaults; a present-but-invalid file is an error so a user's edits are
//! never silently discarded.

use std::path::{Path, PathBuf};

use crate::config::NumberingConfig;
use crate::error::SettingsError;

const CONFIG_DIR: &str = "polynum";
const CONFIG_FILE: &str = "settings.toml";

/// Loads and saves the plugin configuration
#[derive(Debug, Clone)]
pub struct SettingsPersistence {
    path: PathBuf,
}

impl SettingsPersistence {
    /// Persistence against the platform config location
    /// (e.g. `~/.config/polynum/settings.toml` on Linux).
    pub fn new() -> Result<Self, SettingsError> {
        let dir = dirs::config_dir().ok_or(SettingsError::NoConfigDir)?;
        Ok(Self {
            path: dir.join(CONFIG_DIR).join(CONFIG_FILE),
        })
    }

    /// Persistence against an explicit file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this persistence reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// A missing file yields defaults. A file that exists but does not
    /// parse is reported, not replaced.
    pub fn load(&self) -> Result<NumberingConfig, SettingsError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no settings file, using defaults");
            return Ok(NumberingConfig::default());
        }
        let raw = std::fs::read_to_string(&self.path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

    /// Saves the configuration, creating parent directories as needed.
    pub fn save(&self, config: &NumberingConfig) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(config)?;
        std::fs::write(&self.path, raw)?;
        tracing::debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}
