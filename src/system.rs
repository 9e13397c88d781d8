//! Installation type and sizing parameters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::error::SolarError;

/// How the installation relates to the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SystemType {
    /// Stand-alone system; needs a battery bank.
    #[default]
    #[serde(rename = "offgrid")]
    OffGrid,
    /// Grid-connected with battery backup.
    #[serde(rename = "hybrid")]
    Hybrid,
    /// Grid-tied, no storage.
    #[serde(rename = "ongrid")]
    OnGrid,
}

impl SystemType {
    pub fn as_str(self) -> &'static str {
        match self {
            SystemType::OffGrid => "offgrid",
            SystemType::Hybrid => "hybrid",
            SystemType::OnGrid => "ongrid",
        }
    }

    /// Whether a battery bank is sized for this system type.
    pub fn needs_battery(self) -> bool {
        self != SystemType::OnGrid
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SystemType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "offgrid" => Ok(SystemType::OffGrid),
            "hybrid" => Ok(SystemType::Hybrid),
            "ongrid" => Ok(SystemType::OnGrid),
            other => Err(format!(
                "unknown system type \"{other}\", expected offgrid, hybrid or ongrid"
            )),
        }
    }
}

/// Sizing parameters for one installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Grid relationship.
    #[serde(rename = "type")]
    pub system_type: SystemType,
    /// Peak sun hours per day (must be > 0).
    #[serde(alias = "sunHours")]
    pub sun_hours: f64,
    /// Rated power of one panel (W, must be > 0).
    #[serde(alias = "panelWattage")]
    pub panel_wattage: f64,
    /// Rated capacity of one battery unit (Ah, must be > 0).
    #[serde(alias = "batteryType")]
    pub battery_ah: f64,
    /// Overhead added to raw consumption (percent, >= 0).
    #[serde(alias = "safetyMargin")]
    pub safety_margin: f64,
    /// Wiring, inverter and charge-controller losses (percent, >= 0).
    #[serde(alias = "systemLoss")]
    pub system_loss: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            system_type: SystemType::OffGrid,
            sun_hours: 5.0,
            panel_wattage: 400.0,
            battery_ah: 200.0,
            safety_margin: 20.0,
            system_loss: 15.0,
        }
    }
}

/// Flat, partial configuration update.
///
/// Only the [`SystemConfig`] keys are recognised; anything else is rejected
/// when parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfigPatch {
    #[serde(rename = "type")]
    pub system_type: Option<SystemType>,
    #[serde(alias = "sunHours")]
    pub sun_hours: Option<f64>,
    #[serde(alias = "panelWattage")]
    pub panel_wattage: Option<f64>,
    #[serde(alias = "batteryType")]
    pub battery_ah: Option<f64>,
    #[serde(alias = "safetyMargin")]
    pub safety_margin: Option<f64>,
    #[serde(alias = "systemLoss")]
    pub system_loss: Option<f64>,
}

impl SystemConfigPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn require_positive(errors: &mut Vec<ConfigError>, prefix: &str, name: &str, value: f64) {
    if !value.is_finite() || value <= 0.0 {
        errors.push(ConfigError {
            field: format!("{prefix}.{name}"),
            message: "must be a finite number > 0".into(),
        });
    }
}

fn require_non_negative(errors: &mut Vec<ConfigError>, prefix: &str, name: &str, value: f64) {
    if !value.is_finite() || value < 0.0 {
        errors.push(ConfigError {
            field: format!("{prefix}.{name}"),
            message: "must be a finite number >= 0".into(),
        });
    }
}

impl SystemConfig {
    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration can be used for sizing.
    pub fn validate(&self) -> Vec<ConfigError> {
        self.validate_at("system")
    }

    /// Same as [`SystemConfig::validate`] with a custom field-path prefix.
    pub fn validate_at(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        require_positive(&mut errors, prefix, "sun_hours", self.sun_hours);
        require_positive(&mut errors, prefix, "panel_wattage", self.panel_wattage);
        require_positive(&mut errors, prefix, "battery_ah", self.battery_ah);
        require_non_negative(&mut errors, prefix, "safety_margin", self.safety_margin);
        require_non_negative(&mut errors, prefix, "system_loss", self.system_loss);
        errors
    }

    /// Returns a copy with `patch` applied, or every violation found.
    ///
    /// # Errors
    ///
    /// Returns [`SolarError::InvalidConfig`] if the merged configuration is
    /// invalid; in that case nothing from the patch is applied.
    pub fn apply(&self, patch: &SystemConfigPatch) -> Result<SystemConfig, SolarError> {
        let merged = SystemConfig {
            system_type: patch.system_type.unwrap_or(self.system_type),
            sun_hours: patch.sun_hours.unwrap_or(self.sun_hours),
            panel_wattage: patch.panel_wattage.unwrap_or(self.panel_wattage),
            battery_ah: patch.battery_ah.unwrap_or(self.battery_ah),
            safety_margin: patch.safety_margin.unwrap_or(self.safety_margin),
            system_loss: patch.system_loss.unwrap_or(self.system_loss),
        };
        let errors = merged.validate();
        if !errors.is_empty() {
            return Err(SolarError::InvalidConfig(errors));
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let errors = SystemConfig::default().validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
    }

    #[test]
    fn zero_denominators_are_rejected() {
        let cfg = SystemConfig {
            sun_hours: 0.0,
            panel_wattage: -400.0,
            battery_ah: f64::NAN,
            ..SystemConfig::default()
        };
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "system.sun_hours"));
        assert!(errors.iter().any(|e| e.field == "system.panel_wattage"));
        assert!(errors.iter().any(|e| e.field == "system.battery_ah"));
    }

    #[test]
    fn zero_margin_and_loss_are_allowed() {
        let cfg = SystemConfig {
            safety_margin: 0.0,
            system_loss: 0.0,
            ..SystemConfig::default()
        };
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn apply_merges_present_fields() {
        let patch = SystemConfigPatch {
            system_type: Some(SystemType::OnGrid),
            sun_hours: Some(6.5),
            ..SystemConfigPatch::default()
        };
        let cfg = SystemConfig::default().apply(&patch).expect("valid patch");
        assert_eq!(cfg.system_type, SystemType::OnGrid);
        assert_eq!(cfg.sun_hours, 6.5);
        assert_eq!(cfg.panel_wattage, 400.0);
    }

    #[test]
    fn apply_rejects_whole_patch_on_error() {
        let patch = SystemConfigPatch {
            sun_hours: Some(6.0),
            system_loss: Some(-1.0),
            ..SystemConfigPatch::default()
        };
        let result = SystemConfig::default().apply(&patch);
        assert!(matches!(result, Err(SolarError::InvalidConfig(_))));
    }

    #[test]
    fn flat_object_accepts_camel_case_keys() {
        let json = r#"{"type":"hybrid","sunHours":6,"batteryType":150}"#;
        let patch: SystemConfigPatch = serde_json::from_str(json).expect("should parse");
        assert_eq!(patch.system_type, Some(SystemType::Hybrid));
        assert_eq!(patch.sun_hours, Some(6.0));
        assert_eq!(patch.battery_ah, Some(150.0));
    }

    #[test]
    fn flat_object_rejects_unknown_keys() {
        let json = r#"{"currency":"USD"}"#;
        assert!(serde_json::from_str::<SystemConfigPatch>(json).is_err());
    }

    #[test]
    fn system_type_parses_from_str() {
        assert_eq!("ongrid".parse::<SystemType>(), Ok(SystemType::OnGrid));
        assert!("grid".parse::<SystemType>().is_err());
        assert!(!SystemType::OnGrid.needs_battery());
        assert!(SystemType::Hybrid.needs_battery());
    }
}
