//! Consumption aggregation over an inventory.

use crate::devices::{Classifier, Device};

use super::types::{ConsumptionSummary, empty_breakdown};

/// Sums daily energy per category and finds the largest device load.
///
/// `max_load_w` is the single largest `wattage × count`, not the coincident
/// peak of devices running together. An empty slice yields an all-zero
/// summary; sizing rejects empty inventories separately.
pub fn aggregate(devices: &[Device], classifier: &Classifier) -> ConsumptionSummary {
    let mut by_category = empty_breakdown();
    let mut max_load_w = 0.0_f64;

    for device in devices {
        let load = device.load_w();
        let consumption = load * device.hours();
        max_load_w = max_load_w.max(load);
        *by_category
            .entry(classifier.classify(device.name()))
            .or_insert(0.0) += consumption;
    }

    let total_wh = by_category.values().sum();

    ConsumptionSummary {
        total_wh,
        max_load_w,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::Category;

    fn device(name: &str, wattage: f64, hours: f64, count: u32) -> Device {
        Device::new(name, wattage, hours, count).expect("valid device")
    }

    #[test]
    fn empty_inventory_gives_zero_summary_with_all_keys() {
        let s = aggregate(&[], &Classifier::default());
        assert_eq!(s.total_wh, 0.0);
        assert_eq!(s.max_load_w, 0.0);
        assert_eq!(s.by_category.len(), 7);
    }

    #[test]
    fn buckets_sum_to_total() {
        let devices = vec![
            device("ثلاجة", 150.0, 24.0, 1),
            device("مروحة سقف", 75.3, 10.1, 3),
            device("لمبة", 9.7, 6.3, 11),
            device("غسالة", 500.0, 1.3, 1),
            device("pump", 0.1, 0.7, 7),
        ];
        let s = aggregate(&devices, &Classifier::default());
        let sum: f64 = s.by_category.values().sum();
        assert_eq!(sum, s.total_wh);
        assert_eq!(s.by_category.len(), 7);
        assert!(s.by_category[&Category::Heating] == 0.0);
        assert!(s.by_category[&Category::Other] > 0.0);
    }

    #[test]
    fn max_load_is_largest_single_device() {
        let devices = vec![
            device("a", 100.0, 1.0, 3),
            device("b", 250.0, 1.0, 1),
            device("c", 50.0, 1.0, 4),
        ];
        let s = aggregate(&devices, &Classifier::default());
        assert_eq!(s.max_load_w, 300.0);
    }

    #[test]
    fn same_category_accumulates() {
        let devices = vec![device("مكيف", 1000.0, 2.0, 1), device("ثلاجة", 100.0, 10.0, 2)];
        let s = aggregate(&devices, &Classifier::default());
        assert_eq!(s.by_category[&Category::Cooling], 4000.0);
        assert_eq!(s.total_wh, 4000.0);
    }
}
