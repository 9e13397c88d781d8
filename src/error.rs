//! Error types shared by the inventory, sizing engine and persistence layer.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Errors raised by inventory mutations and sizing calculations.
///
/// Every variant aborts the requested operation with the state unchanged.
#[derive(Debug, Clone, Error)]
pub enum SolarError {
    /// A device draft failed validation (missing field, NaN, negative value...).
    #[error("invalid device data: {0}")]
    Validation(String),

    /// A device index outside `[0, len)`.
    #[error("invalid device index {index} (inventory holds {len} devices)")]
    IndexOutOfRange { index: usize, len: usize },

    /// Sizing was requested with no devices in the inventory.
    #[error("no devices have been added")]
    EmptyInventory,

    /// The system configuration cannot be used for sizing.
    #[error("invalid system configuration: {}", join_config_errors(.0))]
    InvalidConfig(Vec<ConfigError>),
}

fn join_config_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Failure to load or save state through a [`crate::store::StateStore`].
///
/// Never fatal: the session keeps running on its in-memory state.
#[derive(Debug, Clone, Error)]
#[error("persistence failure at {}: {message}", location.display())]
pub struct PersistenceError {
    /// Storage location involved (a file path or a symbolic name).
    pub location: PathBuf,
    /// Human-readable cause.
    pub message: String,
}

impl PersistenceError {
    pub fn new(location: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_message_starts_with_invalid_device_data() {
        let err = SolarError::Validation("wattage must be >= 0".to_string());
        assert!(err.to_string().starts_with("invalid device data"));
    }

    #[test]
    fn invalid_config_lists_every_field() {
        let err = SolarError::InvalidConfig(vec![
            ConfigError {
                field: "system.sun_hours".into(),
                message: "must be > 0".into(),
            },
            ConfigError {
                field: "system.panel_wattage".into(),
                message: "must be > 0".into(),
            },
        ]);
        let msg = err.to_string();
        assert!(msg.contains("system.sun_hours"));
        assert!(msg.contains("system.panel_wattage"));
    }

    #[test]
    fn persistence_error_mentions_location() {
        let err = PersistenceError::new("/tmp/state.json", "disk full");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/state.json"));
        assert!(msg.contains("disk full"));
    }
}
