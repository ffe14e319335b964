// Orchestrator: audit in-process and hand back a summary with a markdown report

use crate::audit_agent::{AuditRequest, run_audit};
use crate::error::ApiError;
use crate::{ServiceState, health_response};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use seoscan_core::report::generate_markdown_report;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

pub const SERVICE_NAME: &str = "SEO Orchestrator";

#[derive(Debug, Serialize)]
pub struct AuditSummary {
    pub url: String,
    pub issues_found: usize,
    pub report: String,
}

#[derive(Debug, Serialize)]
pub struct OrchestratorResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub data: AuditSummary,
}

pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/audit", post(audit))
        .route("/health", get(health))
        .with_state(state)
}

async fn audit(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<OrchestratorResponse>, ApiError> {
    let result = run_audit(&state, &request).await?;

    Ok(Json(OrchestratorResponse {
        status: "success",
        message: "Audit completed successfully",
        data: AuditSummary {
            url: request.url,
            issues_found: result.total_issues,
            report: generate_markdown_report(&result),
        },
    }))
}

async fn health() -> Json<Value> {
    health_response(SERVICE_NAME)
}
