use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use faceverify_core::verification::domain::verification_error::VerificationError;

/// Failures of the HTTP handlers, each mapped to one status code.
///
/// Client errors carry `{"detail": ...}`, server errors `{"error": ...}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    PayloadTooLarge(String),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn missing_field(name: &str) -> Self {
        ApiError::InvalidRequest(format!("Missing required field: {name}"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Verification(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Verification(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(e.body_text())
        } else {
            ApiError::InvalidRequest(e.body_text())
        }
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(e: MultipartRejection) -> Self {
        ApiError::InvalidRequest(e.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = if status.is_server_error() {
            log::error!("Request failed: {self}");
            json!({ "error": self.to_string() })
        } else {
            json!({ "detail": self.to_string() })
        };
        (status, Json(body)).into_response()
    }
}
