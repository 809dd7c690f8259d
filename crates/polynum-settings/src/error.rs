//! Settings error type.

use thiserror::Error;

/// Errors from loading or saving the configuration file
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Platform config directory could not be determined
    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    /// I/O failure reading or writing the file
    #[error("Settings I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but is not valid TOML for this config
    #[error("Invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}
