//! Request handlers for the API endpoints.
//!
//! Every handler takes the session lock for its whole body, so requests never
//! interleave. No handler awaits while holding the lock.

use std::sync::{MutexGuard, PoisonError};

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;

use super::SharedSession;
use super::types::{ApiError, CalculationResponse, DeviceRecord, Mutation, StateResponse};
use crate::devices::{DeviceDraft, DevicePatch};
use crate::reporting::{ProductionComparison, category_shares};
use crate::session::Session;
use crate::sizing::ConsumptionSummary;
use crate::store::StateStore;
use crate::system::{SystemConfig, SystemConfigPatch};

type ApiResult<T> = Result<T, ApiError>;

fn lock<S: StateStore>(shared: &SharedSession<S>) -> MutexGuard<'_, Session<S>> {
    // A panic mid-request leaves the state consistent: every mutation is
    // applied as a whole or not at all.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(v)| v)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

fn index_param(index: Result<Path<usize>, PathRejection>) -> ApiResult<usize> {
    index
        .map(|Path(i)| i)
        .map_err(|e| ApiError::bad_request(e.body_text()))
}

fn device_records<S: StateStore>(session: &Session<S>) -> Vec<DeviceRecord> {
    session
        .devices()
        .iter()
        .enumerate()
        .map(|(i, d)| DeviceRecord::new(i, d, session.classifier()))
        .collect()
}

fn state_response<S: StateStore>(session: &Session<S>) -> StateResponse {
    StateResponse {
        config: session.config().clone(),
        devices: device_records(session),
        summary: session.summary(),
        results: session.state().results.clone(),
        results_stale: session.state().results_stale,
    }
}

/// `GET /state` → 200 + [`StateResponse`]
pub async fn get_state<S: StateStore>(State(shared): State<SharedSession<S>>) -> Json<StateResponse> {
    Json(state_response(&lock(&shared)))
}

/// `GET /devices` → 200 + `Vec<DeviceRecord>`
pub async fn list_devices<S: StateStore>(
    State(shared): State<SharedSession<S>>,
) -> Json<Vec<DeviceRecord>> {
    Json(device_records(&lock(&shared)))
}

/// `POST /devices` → 201 + the new [`DeviceRecord`], or 400
pub async fn add_device<S: StateStore>(
    State(shared): State<SharedSession<S>>,
    body: Result<Json<DeviceDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Mutation<DeviceRecord>>)> {
    let draft = json_body(body)?;
    let mut session = lock(&shared);
    let persisted = session.add_device(draft)?;
    let index = session.devices().len() - 1;
    let record = DeviceRecord::new(index, &session.devices()[index], session.classifier());
    Ok((
        StatusCode::CREATED,
        Json(Mutation {
            data: record,
            saved: persisted.is_saved(),
        }),
    ))
}

/// `PATCH /devices/{index}` → 200 + the updated [`DeviceRecord`], 400 or 404
pub async fn update_device<S: StateStore>(
    State(shared): State<SharedSession<S>>,
    index: Result<Path<usize>, PathRejection>,
    body: Result<Json<DevicePatch>, JsonRejection>,
) -> ApiResult<Json<Mutation<DeviceRecord>>> {
    let index = index_param(index)?;
    let patch = json_body(body)?;
    let mut session = lock(&shared);
    let persisted = session.update_device(index, &patch)?;
    let record = DeviceRecord::new(index, &session.devices()[index], session.classifier());
    Ok(Json(Mutation {
        data: record,
        saved: persisted.is_saved(),
    }))
}

/// `DELETE /devices/{index}` → 200 + remaining devices, or 404
pub async fn remove_device<S: StateStore>(
    State(shared): State<SharedSession<S>>,
    index: Result<Path<usize>, PathRejection>,
) -> ApiResult<Json<Mutation<Vec<DeviceRecord>>>> {
    let index = index_param(index)?;
    let mut session = lock(&shared);
    let persisted = session.remove_device(index)?;
    Ok(Json(Mutation {
        data: device_records(&session),
        saved: persisted.is_saved(),
    }))
}

/// `PUT /config` → 200 + the resulting [`SystemConfig`], or 400
pub async fn update_config<S: StateStore>(
    State(shared): State<SharedSession<S>>,
    body: Result<Json<SystemConfigPatch>, JsonRejection>,
) -> ApiResult<Json<Mutation<SystemConfig>>> {
    let patch = json_body(body)?;
    let mut session = lock(&shared);
    let persisted = session.update_config(&patch)?;
    Ok(Json(Mutation {
        data: session.config().clone(),
        saved: persisted.is_saved(),
    }))
}

/// `GET /summary` → 200 + [`ConsumptionSummary`]
pub async fn get_summary<S: StateStore>(
    State(shared): State<SharedSession<S>>,
) -> Json<ConsumptionSummary> {
    Json(lock(&shared).summary())
}

/// `POST /calculate` → 200 + [`CalculationResponse`], 400 or 422
pub async fn calculate<S: StateStore>(
    State(shared): State<SharedSession<S>>,
) -> ApiResult<Json<Mutation<CalculationResponse>>> {
    let mut session = lock(&shared);
    let (result, persisted) = session.calculate()?;
    let production = ProductionComparison::new(&result, session.config());
    Ok(Json(Mutation {
        data: CalculationResponse {
            shares: category_shares(&result),
            production,
            result,
        },
        saved: persisted.is_saved(),
    }))
}

/// `POST /reset` → 200 + the emptied [`StateResponse`]
pub async fn reset<S: StateStore>(
    State(shared): State<SharedSession<S>>,
) -> Json<Mutation<StateResponse>> {
    let mut session = lock(&shared);
    let persisted = session.reset();
    Json(Mutation {
        data: state_response(&session),
        saved: persisted.is_saved(),
    })
}
