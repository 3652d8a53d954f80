//! Mapping of core errors onto HTTP responses

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use devtwin_core::TwinError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Twin(#[from] TwinError),

    #[error("bad json: {0}")]
    BadJson(#[from] serde_json::Error),

    #[error("invalid header {0}")]
    BadHeader(&'static str),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Twin(TwinError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Twin(TwinError::VersionConflict { .. }) => StatusCode::CONFLICT,
            Self::Twin(TwinError::InvalidInput(_)) | Self::BadJson(_) | Self::BadHeader(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));

        match self {
            // Let the caller re-sync without another round trip
            Self::Twin(TwinError::VersionConflict { current, .. }) => {
                (status, [(header::ETAG, current.to_string())], body).into_response()
            }
            _ => (status, body).into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
