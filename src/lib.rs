//! Solar installation sizer: device inventory, consumption aggregation and
//! panel/inverter/battery sizing.

pub mod config;
pub mod devices;
pub mod error;
pub mod inventory;
/// CSV import and export.
pub mod io;
pub mod reporting;
pub mod session;
/// Consumption aggregation and the sizing engine.
pub mod sizing;
pub mod state;
pub mod store;
pub mod system;

#[cfg(feature = "api")]
pub mod api;

pub use error::{PersistenceError, SolarError};
