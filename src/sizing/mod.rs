//! Consumption aggregation and system sizing.

pub mod aggregate;
/// Sizing formulas and their derating constants.
pub mod engine;
pub mod types;

pub use aggregate::aggregate;
pub use engine::calculate;
pub use types::{BatteryResult, CategoryBreakdown, ConsumptionSummary, SizingResult};
