// Tests for the HTTP agents, served on an ephemeral port

use seoscan_scanner::CrawlSettings;
use seoscan_service::{AgentKind, ServiceState, router_for};
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

const BARE_PAGE: &str = r#"<html><head></head><body><h2>x</h2><img src="a.jpg"></body></html>"#;

async fn spawn_agent(kind: AgentKind) -> String {
    let settings = CrawlSettings::default().with_delay_ms(0).with_timeout(2);
    let app = router_for(kind, Arc::new(ServiceState::new(settings)));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn site_with_bare_page() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BARE_PAGE, "text/html"))
        .mount(&server)
        .await;
    server
}

async fn post_json(url: String, body: Value) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(url)
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    (status, response.json().await.unwrap())
}

async fn get_json(url: String) -> Value {
    reqwest::get(url).await.unwrap().json().await.unwrap()
}

// ============================================================================
// Health Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    for kind in [AgentKind::Audit, AgentKind::Orchestrator, AgentKind::Reporting] {
        let base = spawn_agent(kind).await;
        let body = get_json(format!("{}/health", base)).await;

        assert_eq!(
            body,
            json!({ "status": "healthy", "service": kind.service_name() })
        );
    }
}

// ============================================================================
// Audit Agent Tests
// ============================================================================

#[tokio::test]
async fn test_crawl_and_audit_returns_result() {
    let site = site_with_bare_page().await;
    let base = spawn_agent(AgentKind::Audit).await;

    let (status, body) = post_json(
        format!("{}/crawl-and-audit", base),
        json!({ "url": site.uri() }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["base_url"], site.uri());
    assert_eq!(body["total_issues"], 4);
    assert_eq!(body["issues_by_severity"]["error"], 2);
    assert_eq!(body["issues_by_severity"]["warning"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 4);
    assert_eq!(body["items"][0]["check_name"], "Missing Title Tag");
}

#[tokio::test]
async fn test_crawl_and_audit_invalid_url_is_500() {
    let base = spawn_agent(AgentKind::Audit).await;

    let (status, body) = post_json(
        format!("{}/crawl-and-audit", base),
        json!({ "url": "not a url", "max_pages": 3 }),
    )
    .await;

    assert_eq!(status, 500);
    assert!(
        body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Audit failed: ")
    );
}

#[tokio::test]
async fn test_crawl_and_audit_honours_max_pages() {
    let site = MockServer::start().await;
    let mut root = String::from("<html><body>");
    for i in 0..5 {
        root.push_str(&format!(r#"<a href="/p{}">p</a>"#, i));
    }
    root.push_str("</body></html>");
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(root, "text/html"))
        .mount(&site)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(BARE_PAGE, "text/html"))
        .mount(&site)
        .await;

    let base = spawn_agent(AgentKind::Audit).await;
    let (status, body) = post_json(
        format!("{}/crawl-and-audit", base),
        json!({ "url": site.uri(), "max_pages": 2 }),
    )
    .await;

    assert_eq!(status, 200);
    let urls: std::collections::HashSet<&str> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["found_url"].as_str().unwrap())
        .collect();
    assert_eq!(urls.len(), 2);
}

// ============================================================================
// Orchestrator Tests
// ============================================================================

#[tokio::test]
async fn test_orchestrator_audit_summary() {
    let site = site_with_bare_page().await;
    let base = spawn_agent(AgentKind::Orchestrator).await;

    let (status, body) = post_json(format!("{}/audit", base), json!({ "url": site.uri() })).await;

    assert_eq!(status, 200);
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Audit completed successfully");
    assert_eq!(body["data"]["url"], site.uri());
    assert_eq!(body["data"]["issues_found"], 4);
    assert!(
        body["data"]["report"]
            .as_str()
            .unwrap()
            .contains("**Total issues:** 4")
    );
}

#[tokio::test]
async fn test_orchestrator_failure_detail() {
    let base = spawn_agent(AgentKind::Orchestrator).await;

    let (status, body) = post_json(format!("{}/audit", base), json!({ "url": "ftp://x" })).await;

    assert_eq!(status, 500);
    assert!(body["detail"].as_str().unwrap().contains("unsupported scheme"));
}

// ============================================================================
// Reporting Agent Tests
// ============================================================================

fn audit_data() -> Value {
    json!({
        "base_url": "https://example.com",
        "audit_timestamp": "2026-01-01T00:00:00Z",
        "total_issues": 1,
        "issues_by_severity": { "critical": 0, "error": 1, "warning": 0, "info": 0 },
        "items": [{
            "check_name": "Missing H1 Heading",
            "severity": "error",
            "description": "Page is missing an H1 heading",
            "found_url": "https://example.com/",
            "recommendation": "Add a single H1 heading that describes the page content"
        }]
    })
}

#[tokio::test]
async fn test_generate_report_defaults_to_markdown() {
    let base = spawn_agent(AgentKind::Reporting).await;

    let (status, body) = post_json(
        format!("{}/generate-report", base),
        json!({ "audit_data": audit_data() }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["format"], "markdown");
    let content = body["report_content"].as_str().unwrap();
    assert!(content.starts_with("# SEO Audit: https://example.com"));
    assert!(content.contains("- Missing H1 Heading: 1"));
}

#[tokio::test]
async fn test_generate_report_json_echoes_format() {
    let base = spawn_agent(AgentKind::Reporting).await;

    let (status, body) = post_json(
        format!("{}/generate-report", base),
        json!({ "audit_data": audit_data(), "format": "JSON" }),
    )
    .await;

    assert_eq!(status, 200);
    assert_eq!(body["format"], "JSON");
    let parsed: Value = serde_json::from_str(body["report_content"].as_str().unwrap()).unwrap();
    assert_eq!(parsed["total_issues"], 1);
}

#[tokio::test]
async fn test_generate_report_unknown_format() {
    let base = spawn_agent(AgentKind::Reporting).await;

    let (status, body) = post_json(
        format!("{}/generate-report", base),
        json!({ "audit_data": audit_data(), "format": "pdf" }),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["detail"], "Unsupported report format: pdf");
}
