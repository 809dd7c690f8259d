//! Plugin configuration.
//!
//! One small section: the attribute field the numbers live in and how long
//! transient notifications stay visible. Stored as TOML in the platform
//! config directory.

use serde::{Deserialize, Serialize};

/// Numbering plugin configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    /// Name of the integer attribute field holding assigned numbers
    pub field_name: String,
    /// Display duration for the activation notice, in seconds
    pub activation_message_secs: u64,
    /// Display duration for assignment/undo notifications, in seconds
    pub notification_secs: u64,
    /// Whether activating numbering also surfaces the control panel
    pub show_panel_on_start: bool,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            field_name: "number".to_string(),
            activation_message_secs: 5,
            notification_secs: 3,
            show_panel_on_start: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NumberingConfig::default();
        assert_eq!(config.field_name, "number");
        assert_eq!(config.activation_message_secs, 5);
        assert_eq!(config.notification_secs, 3);
        assert!(config.show_panel_on_start);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: NumberingConfig = toml::from_str("field_name = \"seq\"").expect("parse");
        assert_eq!(config.field_name, "seq");
        assert_eq!(config.notification_secs, 3);
    }
}
