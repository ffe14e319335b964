use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seoscan_core::AuditError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Errors surfaced to HTTP clients as `{"detail": "..."}`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Audit failed: {0}")]
    Audit(#[from] AuditError),

    #[error("Unsupported report format: {0}")]
    UnsupportedFormat(String),

    #[error("Report generation failed: {0}")]
    Report(#[from] serde_json::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Audit(_) | ApiError::Report(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UnsupportedFormat(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
