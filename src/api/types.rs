//! API request and response types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::devices::types::round2;
use crate::devices::{Category, Classifier, Device};
use crate::error::SolarError;
use crate::reporting::{CategoryShare, ProductionComparison};
use crate::sizing::{ConsumptionSummary, SizingResult};
use crate::system::SystemConfig;

/// Full session snapshot.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    /// Current system parameters.
    pub config: SystemConfig,
    /// Inventory in index order.
    pub devices: Vec<DeviceRecord>,
    /// Consumption totals for the inventory.
    pub summary: ConsumptionSummary,
    /// Last sizing result, even when stale.
    pub results: Option<SizingResult>,
    /// Whether `results` predates the current inventory or config.
    pub results_stale: bool,
}

/// One inventory entry as exposed by the API.
#[derive(Debug, Serialize)]
pub struct DeviceRecord {
    /// Position in the inventory; shifts after removals.
    pub index: usize,
    pub name: String,
    pub wattage: f64,
    pub hours: f64,
    pub count: u32,
    /// Category derived from the name.
    pub category: Category,
    /// `wattage × hours × count / 1000`, rounded to 2 decimals.
    pub daily_consumption_kwh: f64,
}

impl DeviceRecord {
    pub fn new(index: usize, device: &Device, classifier: &Classifier) -> Self {
        Self {
            index,
            name: device.name().to_string(),
            wattage: device.wattage(),
            hours: device.hours(),
            count: device.count(),
            category: classifier.classify(device.name()),
            daily_consumption_kwh: round2(device.daily_consumption_kwh()),
        }
    }
}

/// Sizing result with the derived presentation figures.
#[derive(Debug, Serialize)]
pub struct CalculationResponse {
    pub result: SizingResult,
    /// Non-empty categories with their share of consumption.
    pub shares: Vec<CategoryShare>,
    pub production: ProductionComparison,
}

/// Body of a successful mutation.
///
/// `saved` is false when the change was applied but could not be persisted.
#[derive(Debug, Serialize)]
pub struct Mutation<T> {
    pub data: T,
    pub saved: bool,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Error carried out of a handler as a status code plus [`ErrorResponse`].
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SolarError> for ApiError {
    fn from(e: SolarError) -> Self {
        let status = match &e {
            SolarError::Validation(_) | SolarError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            SolarError::IndexOutOfRange { .. } => StatusCode::NOT_FOUND,
            SolarError::EmptyInventory => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self {
            status,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
            }),
        )
            .into_response()
    }
}
