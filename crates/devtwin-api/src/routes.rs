//! Route table

use crate::handlers;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use devtwin_core::Runtime;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn create_router(runtime: Runtime, request_timeout: Duration) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route(
            "/devices",
            get(handlers::list_devices).post(handlers::create_device),
        )
        .route("/devices/{id}", get(handlers::get_device))
        .route(
            "/devices/{id}/twin",
            get(handlers::get_twin).patch(handlers::patch_twin),
        )
        .route("/heating/{id}/setpoint", post(handlers::set_heating_setpoint))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(runtime)
}
