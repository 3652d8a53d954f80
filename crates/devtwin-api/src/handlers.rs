//! Request handlers
//!
//! Bodies are taken as raw bytes and decoded here so every malformed payload
//! surfaces as the same 400 response, before the runtime is touched.

use crate::error::{ApiError, ApiResult};
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use devtwin_core::{patch_from_value, Device, DeviceId, NewDevice, Runtime, TwinError};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Body of the heating setpoint command. `value` must be present.
#[derive(Debug, Deserialize)]
pub struct SetpointRequest {
    pub value: Option<f64>,
}

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn list_devices(State(runtime): State<Runtime>) -> Json<Vec<Device>> {
    Json(runtime.list_devices())
}

pub async fn create_device(
    State(runtime): State<Runtime>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Device>)> {
    let input: NewDevice = serde_json::from_slice(&body)?;
    let (device, _) = runtime.create_device(input)?;
    Ok((StatusCode::CREATED, Json(device)))
}

pub async fn get_device(
    State(runtime): State<Runtime>,
    Path(id): Path<String>,
) -> ApiResult<Json<Device>> {
    Ok(Json(runtime.get_device(&DeviceId::from(id))?))
}

pub async fn get_twin(
    State(runtime): State<Runtime>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let snapshot = runtime.get_twin(&DeviceId::from(id))?;
    let headers = [(header::ETAG, snapshot.etag.to_string())];
    Ok((headers, Json(snapshot.twin)))
}

pub async fn patch_twin(
    State(runtime): State<Runtime>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let if_match = headers
        .get(header::IF_MATCH)
        .map(|value| value.to_str().map_err(|_| ApiError::BadHeader("If-Match")))
        .transpose()?;

    let patch = patch_from_value(serde_json::from_slice::<Value>(&body)?)?;
    debug!(device_id = %id, ?if_match, "patching twin");

    let snapshot = runtime.patch_twin(&DeviceId::from(id), patch, if_match)?;
    let headers = [(header::ETAG, snapshot.etag.to_string())];
    Ok((headers, Json(snapshot.twin)))
}

pub async fn set_heating_setpoint(
    State(runtime): State<Runtime>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let request: SetpointRequest = serde_json::from_slice(&body)?;
    let value = request
        .value
        .ok_or_else(|| TwinError::invalid("value required"))?;

    let ack = runtime.set_heating_setpoint(&DeviceId::from(id), value)?;
    Ok((
        StatusCode::ACCEPTED,
        [(header::LOCATION, ack.status_ref.location())],
        Json(ack),
    ))
}
