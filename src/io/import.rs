//! CSV import of device lists.
//!
//! Rows become [`DeviceDraft`]s; nothing is validated here, so unreadable
//! numbers simply leave the field empty and are rejected when the drafts are
//! added to an inventory.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::devices::DeviceDraft;

/// One input row. Columns are matched by header name; extra columns are
/// ignored.
#[derive(Debug, Deserialize)]
struct DeviceRow {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    wattage_w: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    hours: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    count: Option<f64>,
}

impl From<DeviceRow> for DeviceDraft {
    fn from(row: DeviceRow) -> Self {
        Self {
            name: row.name,
            wattage: row.wattage_w,
            hours: row.hours,
            count: row.count,
        }
    }
}

/// Reads device drafts from CSV with a `name,wattage_w,hours,count` header.
///
/// # Errors
///
/// Returns a `csv::Error` on malformed CSV (e.g. ragged rows) or I/O failure.
pub fn read_devices_csv(reader: impl Read) -> Result<Vec<DeviceDraft>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    rdr.deserialize::<DeviceRow>()
        .map(|row| row.map(DeviceDraft::from))
        .collect()
}

/// Reads device drafts from a CSV file.
///
/// # Errors
///
/// Returns a `csv::Error` if the file cannot be opened or parsed.
pub fn import_devices_csv(path: &Path) -> Result<Vec<DeviceDraft>, csv::Error> {
    let file = std::fs::File::open(path).map_err(csv::Error::from)?;
    read_devices_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::validate;

    #[test]
    fn reads_rows_in_order() {
        let data = "name,wattage_w,hours,count\nثلاجة,150,24,1\nلمبة,10,6,4\n";
        let drafts = read_devices_csv(data.as_bytes()).unwrap_or_default();
        assert_eq!(drafts.len(), 2);
        assert_eq!(drafts[0], DeviceDraft::new("ثلاجة", 150.0, 24.0, 1.0));
        assert_eq!(drafts[1].count, Some(4.0));
        assert!(drafts.iter().all(validate));
    }

    #[test]
    fn extra_columns_are_ignored_and_order_is_free() {
        let data = "count,name,daily_kwh,hours,wattage_w\n2,مكيف,4.0,5,400\n";
        let drafts = read_devices_csv(data.as_bytes()).unwrap_or_default();
        assert_eq!(drafts, vec![DeviceDraft::new("مكيف", 400.0, 5.0, 2.0)]);
    }

    #[test]
    fn unreadable_numbers_become_missing_fields() {
        let data = "name,wattage_w,hours,count\nx,abc,,2\n";
        let drafts = read_devices_csv(data.as_bytes()).unwrap_or_default();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].wattage, None);
        assert_eq!(drafts[0].hours, None);
        assert!(!validate(&drafts[0]));
    }

    #[test]
    fn missing_column_yields_invalid_drafts() {
        let data = "name,wattage_w,hours\nx,10,1\n";
        let drafts = read_devices_csv(data.as_bytes()).unwrap_or_default();
        assert_eq!(drafts.len(), 1);
        assert!(!validate(&drafts[0]));
    }

    #[test]
    fn ragged_rows_are_an_error() {
        let data = "name,wattage_w,hours,count\nx,10\n";
        assert!(read_devices_csv(data.as_bytes()).is_err());
    }
}
