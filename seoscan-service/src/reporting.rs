// Reporting agent: render an existing audit result

use crate::error::ApiError;
use crate::{ServiceState, health_response};
use axum::routing::{get, post};
use axum::{Json, Router};
use seoscan_core::{AuditResult, ReportFormat, generate_report};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "SEO Reporting Agent";

fn default_format() -> String {
    ReportFormat::Markdown.as_str().to_string()
}

#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    pub audit_data: AuditResult,
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Serialize)]
pub struct ReportResponse {
    pub report_content: String,
    pub format: String,
}

pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/generate-report", post(generate))
        .route("/health", get(health))
        .with_state(state)
}

async fn generate(Json(request): Json<ReportRequest>) -> Result<Json<ReportResponse>, ApiError> {
    let format = ReportFormat::from_str(&request.format)
        .ok_or_else(|| ApiError::UnsupportedFormat(request.format.clone()))?;
    let report_content = generate_report(&request.audit_data, format)?;

    Ok(Json(ReportResponse {
        report_content,
        format: request.format,
    }))
}

async fn health() -> Json<Value> {
    health_response(SERVICE_NAME)
}
