//! CSV import and export.

pub mod export;
pub mod import;

pub use export::{export_breakdown_csv, export_devices_csv, write_breakdown_csv, write_devices_csv};
pub use import::{import_devices_csv, read_devices_csv};
