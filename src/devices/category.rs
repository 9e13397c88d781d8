//! The closed set of device categories used for consumption breakdowns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Device classification used to break daily consumption down for reporting.
///
/// Variant order is the classifier's matching priority, with [`Category::Other`]
/// as the fallback. `Ord` follows declaration order so maps keyed by category
/// iterate in a stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Cooling,
    Heating,
    Fans,
    Lighting,
    Electronics,
    Kitchen,
    Other,
}

impl Category {
    /// All categories in priority order.
    pub const ALL: [Category; 7] = [
        Category::Cooling,
        Category::Heating,
        Category::Fans,
        Category::Lighting,
        Category::Electronics,
        Category::Kitchen,
        Category::Other,
    ];

    /// Categories that can be matched by keywords, in priority order.
    pub const MATCHABLE: [Category; 6] = [
        Category::Cooling,
        Category::Heating,
        Category::Fans,
        Category::Lighting,
        Category::Electronics,
        Category::Kitchen,
    ];

    /// Stable machine name (`"cooling"`, `"fans"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Cooling => "cooling",
            Category::Heating => "heating",
            Category::Fans => "fans",
            Category::Lighting => "lighting",
            Category::Electronics => "electronics",
            Category::Kitchen => "kitchen",
            Category::Other => "other",
        }
    }

    /// Display label shown in reports.
    pub fn label(self) -> &'static str {
        match self {
            Category::Cooling => "أجهزة التبريد",
            Category::Heating => "أجهزة التدفئة",
            Category::Fans => "مراوح",
            Category::Lighting => "الإضاءة",
            Category::Electronics => "أجهزة إلكترونية",
            Category::Kitchen => "أجهزة المطبخ",
            Category::Other => "أخرى",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_seven_unique_categories() {
        let mut seen = Category::ALL.to_vec();
        seen.dedup();
        assert_eq!(seen.len(), 7);
        assert_eq!(Category::ALL.last(), Some(&Category::Other));
    }

    #[test]
    fn matchable_excludes_other() {
        assert!(!Category::MATCHABLE.contains(&Category::Other));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&Category::Electronics).ok();
        assert_eq!(json.as_deref(), Some("\"electronics\""));
    }
}
