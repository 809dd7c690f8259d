//! Polynum Settings Crate
//!
//! Handles plugin configuration and settings persistence.

pub mod config;
pub mod error;
pub mod persistence;

pub use config::NumberingConfig;
pub use error::SettingsError;
pub use persistence::SettingsPersistence;
