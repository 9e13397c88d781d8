//! Plain-data and text views of sizing results for presentation layers.

use std::fmt;

use serde::Serialize;

use crate::devices::types::round2;
use crate::devices::{Category, Device};
use crate::sizing::SizingResult;
use crate::system::SystemConfig;

/// Text rendering of a sizing result together with the parameters used.
pub struct SizingReport<'a> {
    pub result: &'a SizingResult,
    pub config: &'a SystemConfig,
}

impl<'a> SizingReport<'a> {
    pub fn new(result: &'a SizingResult, config: &'a SystemConfig) -> Self {
        Self { result, config }
    }
}

impl fmt::Display for SizingReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        let c = self.config;
        writeln!(f, "--- Sizing Report ({}) ---", c.system_type)?;
        writeln!(f, "Daily consumption:      {:.2} kWh", r.total_consumption_kwh)?;
        writeln!(
            f,
            "With {}% margin:        {:.2} kWh",
            c.safety_margin, r.total_with_margin_kwh
        )?;
        writeln!(
            f,
            "With {}% system loss:   {:.2} kWh",
            c.system_loss, r.total_with_loss_kwh
        )?;
        writeln!(
            f,
            "Solar panels:           {} x {} W",
            r.panels_count, c.panel_wattage
        )?;
        writeln!(f, "Inverter:               {:.2} kW", r.inverter_size_kw)?;
        if let Some(battery) = &r.battery {
            writeln!(f, "Battery capacity:       {:.2} Ah", battery.capacity_ah)?;
            writeln!(
                f,
                "Batteries ({} Ah):      {}",
                c.battery_ah, battery.count
            )?;
        }
        write!(f, "Peak sun hours:         {} h/day", r.sun_hours)
    }
}

/// Text table of the inventory with per-device daily energy and a total row.
pub struct DeviceTable<'a>(pub &'a [Device]);

impl fmt::Display for DeviceTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No devices added yet.");
        }
        writeln!(
            f,
            "{:>3}  {:<24} {:>9} {:>6} {:>6} {:>10}",
            "#", "name", "watts", "count", "hours", "kWh/day"
        )?;
        let mut total = 0.0;
        for (i, d) in self.0.iter().enumerate() {
            let kwh = d.daily_consumption_kwh();
            total += kwh;
            writeln!(
                f,
                "{:>3}  {:<24} {:>9} {:>6} {:>6} {:>10.2}",
                i,
                d.name(),
                d.wattage(),
                d.count(),
                d.hours(),
                kwh
            )?;
        }
        write!(f, "{:>3}  {:<24} {:>33.2}", "", "total", total)
    }
}

/// One slice of the consumption breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: Category,
    /// Daily energy (Wh/day).
    pub consumption_wh: f64,
    /// Share of total consumption (percent).
    pub percent: f64,
}

/// Categories with non-zero consumption and their share of the total.
pub fn category_shares(result: &SizingResult) -> Vec<CategoryShare> {
    let total_wh = result.total_consumption_kwh * 1000.0;
    result
        .consumption_by_category
        .iter()
        .filter(|(_, wh)| **wh > 0.0)
        .map(|(&category, &wh)| CategoryShare {
            category,
            consumption_wh: wh,
            percent: if total_wh > 0.0 {
                100.0 * wh / total_wh
            } else {
                0.0
            },
        })
        .collect()
}

/// Daily production of the sized array against the adjusted consumption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductionComparison {
    /// `panels × panel_wattage × sun_hours` (kWh/day), before derating.
    pub production_kwh: f64,
    /// Consumption after margin and loss (kWh/day).
    pub consumption_kwh: f64,
    /// Production exceeding consumption, never negative (kWh/day).
    pub surplus_kwh: f64,
}

impl ProductionComparison {
    pub fn new(result: &SizingResult, config: &SystemConfig) -> Self {
        let production_kwh =
            result.panels_count as f64 * config.panel_wattage * config.sun_hours / 1000.0;
        let consumption_kwh = result.total_with_loss_kwh;
        Self {
            production_kwh,
            consumption_kwh,
            surplus_kwh: (production_kwh - consumption_kwh).max(0.0),
        }
    }
}

impl fmt::Display for ProductionComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Production:   {:.2} kWh/day", self.production_kwh)?;
        writeln!(f, "Consumption:  {:.2} kWh/day", self.consumption_kwh)?;
        write!(f, "Surplus:      {:.2} kWh/day", self.surplus_kwh)
    }
}

/// Breakdown lines, one per active category, e.g. `"الإضاءة: 12% (0.48 kWh)"`.
pub fn breakdown_lines(result: &SizingResult) -> Vec<String> {
    category_shares(result)
        .iter()
        .map(|s| {
            format!(
                "{}: {}% ({:.2} kWh)",
                s.category.label(),
                s.percent.round(),
                round2(s.consumption_wh / 1000.0)
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::Classifier;
    use crate::sizing::calculate;
    use crate::system::SystemType;

    fn sized(system_type: SystemType) -> (SizingResult, SystemConfig) {
        let devices = vec![
            Device::new("مكيف", 400.0, 5.0, 2).expect("valid"),
            Device::new("لمبة", 10.0, 10.0, 10).expect("valid"),
        ];
        let config = SystemConfig {
            system_type,
            ..SystemConfig::default()
        };
        let result =
            calculate(&devices, &config, &Classifier::default()).expect("sizing should succeed");
        (result, config)
    }

    #[test]
    fn shares_skip_empty_categories_and_sum_to_100() {
        let (result, _) = sized(SystemType::OffGrid);
        let shares = category_shares(&result);
        assert_eq!(shares.len(), 2);
        let pct: f64 = shares.iter().map(|s| s.percent).sum();
        assert!((pct - 100.0).abs() < 1e-9);
        assert_eq!(shares[0].category, Category::Cooling);
        assert_eq!(shares[1].category, Category::Lighting);
    }

    #[test]
    fn comparison_surplus_is_non_negative() {
        let (result, config) = sized(SystemType::OffGrid);
        let cmp = ProductionComparison::new(&result, &config);
        assert!(cmp.production_kwh >= cmp.consumption_kwh);
        assert!(
            (cmp.surplus_kwh - (cmp.production_kwh - cmp.consumption_kwh)).abs() < 1e-12
        );
    }

    #[test]
    fn report_mentions_battery_only_with_storage() {
        let (result, config) = sized(SystemType::OffGrid);
        let text = SizingReport::new(&result, &config).to_string();
        assert!(text.contains("Battery capacity"));

        let (result, config) = sized(SystemType::OnGrid);
        let text = SizingReport::new(&result, &config).to_string();
        assert!(!text.contains("Battery"));
        assert!(text.contains("Solar panels"));
    }

    #[test]
    fn device_table_has_total_row() {
        let devices = vec![
            Device::new("a", 100.0, 2.0, 1).expect("valid"),
            Device::new("b", 50.0, 3.0, 2).expect("valid"),
        ];
        let text = DeviceTable(&devices).to_string();
        let last = text.lines().last().unwrap_or("");
        assert!(last.contains("total"));
        assert!(last.trim_end().ends_with("0.50"));
    }

    #[test]
    fn empty_device_table() {
        assert_eq!(DeviceTable(&[]).to_string(), "No devices added yet.");
    }

    #[test]
    fn breakdown_lines_use_labels() {
        let (result, _) = sized(SystemType::OffGrid);
        let lines = breakdown_lines(&result);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with(Category::Cooling.label()));
    }
}
