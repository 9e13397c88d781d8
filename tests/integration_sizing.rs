//! End-to-end sizing behavior through the public library API.

mod common;

use solar_sizer::SolarError;
use solar_sizer::devices::{Category, Classifier, Device, DeviceDraft, validate};
use solar_sizer::inventory::Inventory;
use solar_sizer::sizing::{aggregate, calculate};
use solar_sizer::system::{SystemConfig, SystemType};

fn inventory_of(drafts: Vec<DeviceDraft>) -> Inventory {
    let mut inv = Inventory::new();
    for draft in drafts {
        inv.add(draft).expect("fixture devices are valid");
    }
    inv
}

#[test]
fn reference_offgrid_installation() {
    let inv = inventory_of(vec![common::reference_draft()]);
    let result = calculate(
        inv.devices(),
        &common::reference_config(),
        &Classifier::default(),
    )
    .expect("sizing should succeed");

    assert!((result.total_consumption_kwh - 4.0).abs() < 1e-9);
    assert!((result.total_with_margin_kwh - 4.8).abs() < 1e-9);
    assert!((result.total_with_loss_kwh - 5.52).abs() < 1e-9);
    assert_eq!(result.panels_count, 4);
    assert!((result.inverter_size_kw - 1.0).abs() < 1e-12);

    let battery = result.battery.expect("offgrid systems size a battery bank");
    assert!((battery.capacity_ah - 1150.0).abs() < 1e-6);
    // ceil(5520 / (12 × 200 × 0.8 × 0.5)) = ceil(5.75)
    assert_eq!(battery.count, 6);
}

#[test]
fn ongrid_installation_has_no_battery() {
    let inv = inventory_of(vec![common::reference_draft()]);
    let config = SystemConfig {
        system_type: SystemType::OnGrid,
        ..common::reference_config()
    };
    let result = calculate(inv.devices(), &config, &Classifier::default())
        .expect("sizing should succeed");
    assert!(result.battery.is_none());
    assert_eq!(result.panels_count, 4);

    let json = serde_json::to_value(&result).expect("result serializes");
    assert!(json.get("battery").is_none());
}

#[test]
fn household_buckets_sum_to_total() {
    let inv = inventory_of(common::household_drafts());
    let summary = aggregate(inv.devices(), &Classifier::default());

    assert_eq!(summary.by_category.len(), Category::ALL.len());
    let bucket_sum: f64 = summary.by_category.values().sum();
    assert_eq!(bucket_sum, summary.total_wh);
    assert!((summary.total_wh / 1000.0 - inv.daily_consumption_kwh()).abs() < 1e-9);
    for category in Category::ALL {
        assert!(
            summary.by_category[&category] > 0.0,
            "{category} should have consumption"
        );
    }
    // The 1500 W heater is the largest single load.
    assert_eq!(summary.max_load_w, 1500.0);
}

#[test]
fn classifier_examples() {
    let classifier = Classifier::default();
    assert_eq!(classifier.classify("ثلاجة"), Category::Cooling);
    assert_eq!(classifier.classify("مروحة سقف"), Category::Fans);
    assert_eq!(classifier.classify("جهاز غريب"), Category::Other);
}

#[test]
fn invalid_drafts_never_enter_the_inventory() {
    let mut inv = inventory_of(vec![common::reference_draft()]);
    let bad = [
        DeviceDraft::new("x", -1.0, 1.0, 1.0),
        DeviceDraft::new("x", 1.0, -1.0, 1.0),
        DeviceDraft::new("x", 1.0, 1.0, 0.0),
        DeviceDraft::new("x", f64::NAN, 1.0, 1.0),
        DeviceDraft {
            hours: None,
            ..DeviceDraft::new("x", 1.0, 1.0, 1.0)
        },
    ];
    for draft in bad {
        assert!(!validate(&draft));
        assert!(matches!(inv.add(draft), Err(SolarError::Validation(_))));
    }
    assert_eq!(inv.len(), 1);
}

#[test]
fn zero_hours_device_is_valid_and_contributes_nothing() {
    let device = Device::new("راوتر احتياطي", 10.0, 0.0, 1).expect("zero hours is allowed");
    assert_eq!(device.daily_consumption_kwh(), 0.0);
}

#[test]
fn empty_inventory_cannot_be_sized() {
    let result = calculate(&[], &common::reference_config(), &Classifier::default());
    assert!(matches!(result, Err(SolarError::EmptyInventory)));
}

#[test]
fn repeated_calculation_is_identical() {
    let inv = inventory_of(common::household_drafts());
    let config = SystemConfig {
        system_type: SystemType::Hybrid,
        ..common::reference_config()
    };
    let first = calculate(inv.devices(), &config, &Classifier::default()).ok();
    let second = calculate(inv.devices(), &config, &Classifier::default()).ok();
    assert!(first.is_some());
    assert_eq!(first, second);
}
