//! HTTP agents wrapping the seoscan audit pipeline.
//!
//! Three independent services can be started from this crate, each with its
//! own router and `/health` endpoint:
//!
//! - the audit agent (`POST /crawl-and-audit`) returns the raw [`AuditResult`]
//! - the orchestrator (`POST /audit`) audits and summarises in one call
//! - the reporting agent (`POST /generate-report`) renders an existing result
//!
//! [`AuditResult`]: seoscan_core::AuditResult

pub mod audit_agent;
pub mod error;
pub mod orchestrator;
pub mod reporting;

use axum::{Json, Router};
use seoscan_scanner::CrawlSettings;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

pub use error::ApiError;

/// Which agent a server instance runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Audit,
    Orchestrator,
    Reporting,
}

impl AgentKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "audit" => Some(AgentKind::Audit),
            "orchestrator" => Some(AgentKind::Orchestrator),
            "reporting" | "report" => Some(AgentKind::Reporting),
            _ => None,
        }
    }

    pub fn service_name(&self) -> &'static str {
        match self {
            AgentKind::Audit => audit_agent::SERVICE_NAME,
            AgentKind::Orchestrator => orchestrator::SERVICE_NAME,
            AgentKind::Reporting => reporting::SERVICE_NAME,
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            AgentKind::Orchestrator => 8000,
            AgentKind::Audit => 8001,
            AgentKind::Reporting => 8002,
        }
    }
}

/// Shared, read-only state handed to every request handler.
#[derive(Debug, Clone, Default)]
pub struct ServiceState {
    /// Base crawl settings; requests override the page budget only.
    pub settings: CrawlSettings,
}

impl ServiceState {
    pub fn new(settings: CrawlSettings) -> Self {
        Self { settings }
    }
}

pub(crate) fn health_response(service: &str) -> Json<Value> {
    Json(json!({ "status": "healthy", "service": service }))
}

pub fn router_for(kind: AgentKind, state: Arc<ServiceState>) -> Router {
    match kind {
        AgentKind::Audit => audit_agent::router(state),
        AgentKind::Orchestrator => orchestrator::router(state),
        AgentKind::Reporting => reporting::router(state),
    }
}

/// Bind `addr` and serve `kind` until Ctrl-C.
pub async fn serve(addr: SocketAddr, kind: AgentKind, settings: CrawlSettings) -> anyhow::Result<()> {
    let app = router_for(kind, Arc::new(ServiceState::new(settings)));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("{} listening on http://{}", kind.service_name(), listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("{} stopped", kind.service_name());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
