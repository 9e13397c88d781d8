//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::path::Path;

use solar_sizer::devices::{Classifier, DeviceDraft};
use solar_sizer::session::Session;
use solar_sizer::store::JsonFileStore;
use solar_sizer::system::{SystemConfig, SystemType};

/// Reference configuration: offgrid, 5 sun hours, 400 W panels, 200 Ah
/// batteries, 20% margin, 15% loss.
pub fn reference_config() -> SystemConfig {
    SystemConfig {
        system_type: SystemType::OffGrid,
        sun_hours: 5.0,
        panel_wattage: 400.0,
        battery_ah: 200.0,
        safety_margin: 20.0,
        system_loss: 15.0,
    }
}

/// Two 400 W air conditioners running 5 hours a day (4.0 kWh/day).
pub fn reference_draft() -> DeviceDraft {
    DeviceDraft::new("مكيف", 400.0, 5.0, 2.0)
}

/// A small household, one device per matchable category plus one unknown.
pub fn household_drafts() -> Vec<DeviceDraft> {
    vec![
        DeviceDraft::new("ثلاجة", 150.0, 24.0, 1.0),
        DeviceDraft::new("سخان ماء", 1500.0, 1.0, 1.0),
        DeviceDraft::new("مروحة سقف", 75.0, 8.0, 3.0),
        DeviceDraft::new("لمبة LED", 12.0, 6.0, 8.0),
        DeviceDraft::new("تلفزيون", 120.0, 5.0, 1.0),
        DeviceDraft::new("غسالة", 500.0, 1.0, 1.0),
        DeviceDraft::new("جهاز غريب", 30.0, 2.0, 1.0),
    ]
}

/// Opens a session persisted to a JSON file at `path`.
pub fn open_session(path: &Path) -> Session<JsonFileStore> {
    Session::open(
        JsonFileStore::new(path),
        Classifier::default(),
        reference_config(),
    )
}
