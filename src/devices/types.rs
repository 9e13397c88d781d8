//! Device records and the validation gate into the inventory.

use serde::{Deserialize, Serialize};

use crate::error::SolarError;

/// Raw candidate device as supplied by a user, a CSV row or an API request.
///
/// Every field is optional so that incomplete input can be represented and
/// rejected by [`validate`] instead of failing earlier with a parse error.
/// The same shape is used as a patch for [`crate::inventory::Inventory::update`]:
/// present fields overwrite, absent fields keep the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DeviceDraft {
    /// Free-text device name.
    pub name: Option<String>,
    /// Power draw per unit (W).
    pub wattage: Option<f64>,
    /// Daily usage (hours).
    pub hours: Option<f64>,
    /// Number of identical units.
    pub count: Option<f64>,
}

/// Partial update for an existing device.
pub type DevicePatch = DeviceDraft;

impl DeviceDraft {
    /// Creates a complete draft.
    pub fn new(name: impl Into<String>, wattage: f64, hours: f64, count: f64) -> Self {
        Self {
            name: Some(name.into()),
            wattage: Some(wattage),
            hours: Some(hours),
            count: Some(count),
        }
    }

    /// Overlays the present fields of `patch` onto this draft.
    pub fn merged(mut self, patch: &DevicePatch) -> Self {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if patch.wattage.is_some() {
            self.wattage = patch.wattage;
        }
        if patch.hours.is_some() {
            self.hours = patch.hours;
        }
        if patch.count.is_some() {
            self.count = patch.count;
        }
        self
    }
}

/// Returns `true` when the draft would be accepted into the inventory.
///
/// Accepts iff the name is present and non-blank, `wattage` and `hours` are
/// finite and `>= 0`, and `count` is a finite whole number `> 0`.
pub fn validate(draft: &DeviceDraft) -> bool {
    check(draft).is_ok()
}

fn non_negative(value: Option<f64>, field: &str) -> Result<f64, SolarError> {
    match value {
        None => Err(SolarError::Validation(format!("{field} is missing"))),
        Some(v) if !v.is_finite() => Err(SolarError::Validation(format!(
            "{field} must be a finite number"
        ))),
        Some(v) if v < 0.0 => Err(SolarError::Validation(format!("{field} must be >= 0"))),
        Some(v) => Ok(v),
    }
}

fn check(draft: &DeviceDraft) -> Result<(&str, f64, f64, u32), SolarError> {
    let name = match draft.name.as_deref() {
        None => return Err(SolarError::Validation("name is missing".to_string())),
        Some(n) if n.trim().is_empty() => {
            return Err(SolarError::Validation("name must not be empty".to_string()));
        }
        Some(n) => n,
    };
    let wattage = non_negative(draft.wattage, "wattage")?;
    let hours = non_negative(draft.hours, "hours")?;

    let count = match draft.count {
        None => return Err(SolarError::Validation("count is missing".to_string())),
        Some(c) if !c.is_finite() => {
            return Err(SolarError::Validation(
                "count must be a finite number".to_string(),
            ));
        }
        Some(c) if c <= 0.0 => return Err(SolarError::Validation("count must be > 0".to_string())),
        Some(c) if c.fract() != 0.0 || c > f64::from(u32::MAX) => {
            return Err(SolarError::Validation(
                "count must be a whole number of units".to_string(),
            ));
        }
        Some(c) => c as u32,
    };

    if !(wattage * hours * f64::from(count)).is_finite() {
        return Err(SolarError::Validation(
            "wattage × hours × count is too large".to_string(),
        ));
    }

    Ok((name, wattage, hours, count))
}

/// A validated inventory entry: one or more identical appliances.
///
/// Fields are private so a `Device` can only be obtained through validation
/// (including when read back from persisted state).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DeviceDraft")]
pub struct Device {
    name: String,
    wattage: f64,
    hours: f64,
    count: u32,
}

impl TryFrom<DeviceDraft> for Device {
    type Error = SolarError;

    fn try_from(draft: DeviceDraft) -> Result<Self, Self::Error> {
        let (name, wattage, hours, count) = check(&draft)?;
        Ok(Self {
            name: name.to_string(),
            wattage,
            hours,
            count,
        })
    }
}

impl From<&Device> for DeviceDraft {
    fn from(d: &Device) -> Self {
        Self {
            name: Some(d.name.clone()),
            wattage: Some(d.wattage),
            hours: Some(d.hours),
            count: Some(f64::from(d.count)),
        }
    }
}

impl Device {
    /// Validates and builds a device in one step.
    ///
    /// # Errors
    ///
    /// Returns [`SolarError::Validation`] when any field is out of range.
    pub fn new(
        name: impl Into<String>,
        wattage: f64,
        hours: f64,
        count: u32,
    ) -> Result<Self, SolarError> {
        Self::try_from(DeviceDraft::new(name, wattage, hours, f64::from(count)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Power draw per unit (W).
    pub fn wattage(&self) -> f64 {
        self.wattage
    }

    /// Daily usage (hours).
    pub fn hours(&self) -> f64 {
        self.hours
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    /// Combined draw of all units when running (W).
    pub fn load_w(&self) -> f64 {
        self.wattage * f64::from(self.count)
    }

    /// Daily energy, `wattage × hours × count / 1000` (kWh/day), unrounded.
    pub fn daily_consumption_kwh(&self) -> f64 {
        self.wattage * self.hours * f64::from(self.count) / 1000.0
    }
}

/// Rounds a value to two decimals for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_draft_passes() {
        assert!(validate(&DeviceDraft::new("ثلاجة", 150.0, 24.0, 1.0)));
        assert!(validate(&DeviceDraft::new("idle", 0.0, 0.0, 1.0)));
    }

    #[test]
    fn negative_values_fail() {
        assert!(!validate(&DeviceDraft::new("a", -1.0, 1.0, 1.0)));
        assert!(!validate(&DeviceDraft::new("a", 1.0, -0.5, 1.0)));
        assert!(!validate(&DeviceDraft::new("a", 1.0, 1.0, 0.0)));
        assert!(!validate(&DeviceDraft::new("a", 1.0, 1.0, -2.0)));
    }

    #[test]
    fn nan_and_infinite_fail() {
        assert!(!validate(&DeviceDraft::new("a", f64::NAN, 1.0, 1.0)));
        assert!(!validate(&DeviceDraft::new("a", 1.0, f64::NAN, 1.0)));
        assert!(!validate(&DeviceDraft::new("a", 1.0, 1.0, f64::NAN)));
        assert!(!validate(&DeviceDraft::new("a", f64::INFINITY, 1.0, 1.0)));
    }

    #[test]
    fn overflowing_daily_energy_fails() {
        assert!(validate(&DeviceDraft::new("a", 1e306, 24.0, 1.0)));
        assert!(!validate(&DeviceDraft::new("a", 1e306, 24.0, 1000.0)));
        assert!(!validate(&DeviceDraft::new("a", f64::MAX, 2.0, 1.0)));
    }

    #[test]
    fn missing_fields_fail() {
        let draft = DeviceDraft {
            name: Some("a".into()),
            wattage: Some(10.0),
            hours: None,
            count: Some(1.0),
        };
        assert!(!validate(&draft));
        assert!(!validate(&DeviceDraft::default()));
    }

    #[test]
    fn blank_name_fails() {
        assert!(!validate(&DeviceDraft::new("   ", 1.0, 1.0, 1.0)));
    }

    #[test]
    fn fractional_count_fails() {
        assert!(!validate(&DeviceDraft::new("a", 1.0, 1.0, 1.5)));
    }

    #[test]
    fn error_names_the_field() {
        let err = Device::try_from(DeviceDraft::new("a", 1.0, -3.0, 1.0)).err();
        let msg = err.map(|e| e.to_string()).unwrap_or_default();
        assert!(msg.contains("hours"), "{msg}");
    }

    #[test]
    fn daily_consumption_formula() {
        let d = Device::new("مكيف", 400.0, 5.0, 2).expect("valid device");
        assert_eq!(d.load_w(), 800.0);
        assert!((d.daily_consumption_kwh() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn merged_overwrites_only_present_fields() {
        let base = DeviceDraft::new("lamp", 10.0, 5.0, 3.0);
        let patch = DevicePatch {
            hours: Some(8.0),
            ..DevicePatch::default()
        };
        let merged = base.merged(&patch);
        assert_eq!(merged, DeviceDraft::new("lamp", 10.0, 8.0, 3.0));
    }

    #[test]
    fn deserialize_rejects_invalid_device() {
        let bad = r#"{"name":"x","wattage":-5,"hours":1,"count":1}"#;
        assert!(serde_json::from_str::<Device>(bad).is_err());
        let good = r#"{"name":"x","wattage":5,"hours":1,"count":2}"#;
        let d = serde_json::from_str::<Device>(good).ok();
        assert_eq!(d.map(|d| d.count()), Some(2));
    }

    #[test]
    fn round2_rounds_half_up() {
        assert_eq!(round2(1.234), 1.23);
        assert_eq!(round2(1150.0), 1150.0);
    }
}
