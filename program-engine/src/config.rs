//! Engine configuration types
//!
//! The engine only needs a handful of knobs; everything presentation-related
//! belongs to the host application.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the control surface and its highlight projector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Interval between interpreter status polls while a script runs (default: 20ms = 50 Hz)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Message shown before deleting an event that still owns commands
    #[serde(default = "default_delete_confirmation")]
    pub delete_confirmation: String,

    /// Select the first event after loading save data
    #[serde(default = "default_true")]
    pub select_first_on_load: bool,
}

fn default_poll_interval() -> u64 {
    20
}

fn default_delete_confirmation() -> String {
    "Are you sure you want to delete this event and all its commands?".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            delete_confirmation: default_delete_confirmation(),
            select_first_on_load: default_true(),
        }
    }
}

impl EngineConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the poll interval in milliseconds
    pub fn with_poll_interval_ms(mut self, millis: u64) -> Self {
        self.poll_interval_ms = millis;
        self
    }

    /// Builder method: set the delete confirmation message
    pub fn with_delete_confirmation(mut self, message: impl Into<String>) -> Self {
        self.delete_confirmation = message.into();
        self
    }

    /// Builder method: select (or not) the first event after a load
    pub fn with_select_first_on_load(mut self, enabled: bool) -> Self {
        self.select_first_on_load = enabled;
        self
    }

    /// Poll interval as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_poll_at_50hz() {
        let config = EngineConfig::new();
        assert_eq!(config.poll_interval(), Duration::from_millis(20));
        assert!(config.select_first_on_load);
    }

    #[test]
    fn test_builder() {
        let config = EngineConfig::new()
            .with_poll_interval_ms(100)
            .with_delete_confirmation("Really?")
            .with_select_first_on_load(false);
        assert_eq!(config.poll_interval_ms, 100);
        assert_eq!(config.delete_confirmation, "Really?");
        assert!(!config.select_first_on_load);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"poll_interval_ms": 40}"#).unwrap();
        assert_eq!(config.poll_interval_ms, 40);
        assert_eq!(config.delete_confirmation, default_delete_confirmation());
        assert!(config.select_first_on_load);
    }
}
