//! Device Twin HTTP API
//!
//! REST surface over the twin runtime:
//! - List, create and fetch devices
//! - Read twins with an `ETag` and patch them under `If-Match`
//! - Heating setpoint command endpoint

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;

use axum::Router;
use devtwin_core::Runtime;
use std::time::Duration;

pub use config::ApiConfig;
pub use error::ApiError;

/// Build the application router around a runtime
pub fn create_app(runtime: Runtime, request_timeout: Duration) -> Router {
    routes::create_router(runtime, request_timeout)
}
