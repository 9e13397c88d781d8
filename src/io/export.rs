//! CSV export for the device inventory and the category breakdown.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::devices::Device;
use crate::sizing::SizingResult;

/// Column header for the device inventory export.
const DEVICE_HEADER: &str = "name,wattage_w,count,hours,daily_kwh";

/// Column header for the category breakdown export.
const BREAKDOWN_HEADER: &str = "category,label,consumption_wh,share_pct";

/// Exports the inventory to a CSV file at the given path.
///
/// # Arguments
///
/// * `devices` - Inventory in display order
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_devices_csv(devices: &[Device], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_devices_csv(devices, io::BufWriter::new(file))
}

/// Writes the inventory as CSV to any writer, one row per device.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_devices_csv(devices: &[Device], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DEVICE_HEADER.split(','))?;

    for d in devices {
        wtr.write_record(&[
            d.name().to_string(),
            d.wattage().to_string(),
            d.count().to_string(),
            d.hours().to_string(),
            format!("{:.3}", d.daily_consumption_kwh()),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Writes the per-category breakdown of a sizing result, all seven
/// categories in fixed order.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_breakdown_csv(result: &SizingResult, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(BREAKDOWN_HEADER.split(','))?;

    let total_wh = result.total_consumption_kwh * 1000.0;
    for (category, wh) in &result.consumption_by_category {
        let share = if total_wh > 0.0 {
            100.0 * wh / total_wh
        } else {
            0.0
        };
        wtr.write_record(&[
            category.as_str().to_string(),
            category.label().to_string(),
            format!("{wh:.2}"),
            format!("{share:.2}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the category breakdown to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_breakdown_csv(result: &SizingResult, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_breakdown_csv(result, io::BufWriter::new(file))
}
