//! Panel, inverter and battery sizing.

use crate::devices::{Classifier, Device};
use crate::error::SolarError;
use crate::system::SystemConfig;

use super::aggregate::aggregate;
use super::types::{BatteryResult, SizingResult};

/// Fraction of nameplate panel output assumed to reach the load
/// (panel and wiring inefficiency).
pub const PANEL_DERATING: f64 = 0.8;

/// Inverter rating as a multiple of the largest device load.
pub const INVERTER_HEADROOM: f64 = 1.25;

/// Nominal battery bus voltage (V).
pub const BATTERY_BUS_VOLTAGE: f64 = 12.0;

/// Usable fraction of battery capacity.
pub const BATTERY_DEPTH_OF_DISCHARGE: f64 = 0.8;

/// Second fixed battery derating factor, applied together with
/// [`BATTERY_DEPTH_OF_DISCHARGE`].
pub const BATTERY_RESERVE_FACTOR: f64 = 0.5;

/// Sizes panels, inverter and (for off-grid and hybrid systems) the battery
/// bank for the given devices.
///
/// The computation is pure: identical inputs give bit-identical results.
///
/// # Errors
///
/// * [`SolarError::EmptyInventory`] if `devices` is empty.
/// * [`SolarError::InvalidConfig`] if `config` fails validation, so no
///   division by a non-positive denominator can happen.
///
/// # Examples
///
/// ```
/// use solar_sizer::devices::{Classifier, Device};
/// use solar_sizer::sizing::calculate;
/// use solar_sizer::system::SystemConfig;
///
/// let devices = vec![Device::new("مكيف", 400.0, 5.0, 2).unwrap()];
/// let result = calculate(&devices, &SystemConfig::default(), &Classifier::default()).unwrap();
/// assert_eq!(result.panels_count, 4);
/// assert_eq!(result.inverter_size_kw, 1.0);
/// ```
pub fn calculate(
    devices: &[Device],
    config: &SystemConfig,
    classifier: &Classifier,
) -> Result<SizingResult, SolarError> {
    if devices.is_empty() {
        return Err(SolarError::EmptyInventory);
    }
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(SolarError::InvalidConfig(errors));
    }

    let summary = aggregate(devices, classifier);
    let total_wh = summary.total_wh;
    let with_margin_wh = total_wh * (1.0 + config.safety_margin / 100.0);
    let with_loss_wh = with_margin_wh * (1.0 + config.system_loss / 100.0);

    // Daily yield of one panel (Wh) after derating.
    let panel_yield_wh = config.sun_hours * config.panel_wattage * PANEL_DERATING;
    let panels = (with_loss_wh / panel_yield_wh).ceil();

    let inverter_w = (summary.max_load_w * INVERTER_HEADROOM).ceil();

    // Each device is finite on its own; their sum can still overflow.
    if !with_loss_wh.is_finite() || !panels.is_finite() || !inverter_w.is_finite() {
        return Err(SolarError::Validation(
            "total consumption is too large to size".to_string(),
        ));
    }

    let battery = config.system_type.needs_battery().then(|| BatteryResult {
        capacity_ah: with_loss_wh
            / (BATTERY_BUS_VOLTAGE * BATTERY_DEPTH_OF_DISCHARGE * BATTERY_RESERVE_FACTOR),
        count: (with_loss_wh
            / (BATTERY_BUS_VOLTAGE
                * config.battery_ah
                * BATTERY_DEPTH_OF_DISCHARGE
                * BATTERY_RESERVE_FACTOR))
            .ceil() as u64,
    });

    Ok(SizingResult {
        total_consumption_kwh: total_wh / 1000.0,
        total_with_margin_kwh: with_margin_wh / 1000.0,
        total_with_loss_kwh: with_loss_wh / 1000.0,
        panels_count: panels as u64,
        inverter_size_kw: inverter_w / 1000.0,
        battery,
        consumption_by_category: summary.by_category,
        sun_hours: config.sun_hours,
    })
}
