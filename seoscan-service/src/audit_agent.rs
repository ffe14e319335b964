// Audit agent: crawl a site and return its raw findings

use crate::error::ApiError;
use crate::{ServiceState, health_response};
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use seoscan_core::{AuditOptions, AuditResult, audit_site};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

pub const SERVICE_NAME: &str = "SEO Audit Agent";

pub const DEFAULT_REQUEST_MAX_PAGES: usize = 10;

fn default_max_pages() -> usize {
    DEFAULT_REQUEST_MAX_PAGES
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuditRequest {
    pub url: String,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/crawl-and-audit", post(crawl_and_audit))
        .route("/health", get(health))
        .with_state(state)
}

/// Crawl and audit the requested site with the service's settings and
/// the request's page budget. Each call gets its own crawler.
pub async fn run_audit(state: &ServiceState, request: &AuditRequest) -> Result<AuditResult, ApiError> {
    info!("Audit requested for {} (max {} pages)", request.url, request.max_pages);

    let settings = state.settings.clone().with_max_pages(request.max_pages);
    let audit = audit_site(&request.url, AuditOptions::new(settings)).await?;
    Ok(audit.result)
}

async fn crawl_and_audit(
    State(state): State<Arc<ServiceState>>,
    Json(request): Json<AuditRequest>,
) -> Result<Json<AuditResult>, ApiError> {
    run_audit(&state, &request).await.map(Json)
}

async fn health() -> Json<Value> {
    health_response(SERVICE_NAME)
}
