//! TOML-based application configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::devices::KeywordConfig;
use crate::system::{SystemConfig, SystemType};

/// Default location of the persisted session state.
pub const DEFAULT_STATE_PATH: &str = "./data/solar_state.json";

/// Top-level application configuration parsed from TOML.
///
/// All sections have defaults. Load from TOML with
/// [`AppConfig::from_toml_file`] or use [`AppConfig::from_preset`] for a
/// built-in system type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// System parameters used when no saved state exists.
    #[serde(default)]
    pub system: SystemConfig,
    /// Keyword lists for the device classifier.
    #[serde(default)]
    pub classifier: KeywordConfig,
    /// Where session state is persisted.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Session state storage settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the JSON state file.
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_STATE_PATH),
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"system.sun_hours"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

impl AppConfig {
    /// Returns the preset for a stand-alone installation (the default).
    pub fn offgrid() -> Self {
        Self::default()
    }

    /// Returns the preset for a grid-connected installation with backup storage.
    pub fn hybrid() -> Self {
        Self {
            system: SystemConfig {
                system_type: SystemType::Hybrid,
                ..SystemConfig::default()
            },
            ..Self::default()
        }
    }

    /// Returns the preset for a grid-tied installation without storage.
    pub fn ongrid() -> Self {
        Self {
            system: SystemConfig {
                system_type: SystemType::OnGrid,
                ..SystemConfig::default()
            },
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["offgrid", "hybrid", "ongrid"];

    /// Loads a configuration from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "offgrid" => Ok(Self::offgrid()),
            "hybrid" => Ok(Self::hybrid()),
            "ongrid" => Ok(Self::ongrid()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "config".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = self.system.validate_at("system");

        if self.storage.path.as_os_str().is_empty() {
            errors.push(ConfigError {
                field: "storage.path".into(),
                message: "must not be empty".into(),
            });
        }

        let lists = [
            ("classifier.cooling", &self.classifier.cooling),
            ("classifier.heating", &self.classifier.heating),
            ("classifier.fans", &self.classifier.fans),
            ("classifier.lighting", &self.classifier.lighting),
            ("classifier.electronics", &self.classifier.electronics),
            ("classifier.kitchen", &self.classifier.kitchen),
        ];
        for (field, words) in lists {
            if words.iter().any(|w| w.trim().is_empty()) {
                errors.push(ConfigError {
                    field: field.into(),
                    message: "keywords must not be blank".into(),
                });
            }
        }

        errors
    }
}
