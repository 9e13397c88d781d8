//! Aggregation and sizing outputs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::devices::Category;

/// Daily energy per category (Wh/day), always holding all seven categories.
pub type CategoryBreakdown = BTreeMap<Category, f64>;

/// Returns a breakdown with every category set to zero.
pub fn empty_breakdown() -> CategoryBreakdown {
    Category::ALL.iter().map(|&c| (c, 0.0)).collect()
}

/// Consumption totals for an inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionSummary {
    /// Daily energy of all devices (Wh/day); the exact sum of `by_category`.
    pub total_wh: f64,
    /// Largest single-device load, `wattage × count` (W).
    pub max_load_w: f64,
    /// Daily energy per category (Wh/day).
    pub by_category: CategoryBreakdown,
}

/// Battery bank sizing, produced only for systems with storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryResult {
    /// Required bank capacity on the 12 V bus (Ah), unrounded.
    pub capacity_ah: f64,
    /// Number of battery units of the configured rating.
    pub count: u64,
}

/// Complete sizing snapshot, replaced wholesale on each calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Raw daily consumption (kWh/day).
    pub total_consumption_kwh: f64,
    /// Consumption after the safety margin (kWh/day).
    pub total_with_margin_kwh: f64,
    /// Consumption after margin and system loss (kWh/day).
    pub total_with_loss_kwh: f64,
    /// Number of panels of the configured wattage.
    pub panels_count: u64,
    /// Inverter rating (kW).
    pub inverter_size_kw: f64,
    /// Battery bank; absent for on-grid systems.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<BatteryResult>,
    /// Daily energy per category (Wh/day).
    pub consumption_by_category: CategoryBreakdown,
    /// Peak sun hours the result was computed with.
    pub sun_hours: f64,
}
