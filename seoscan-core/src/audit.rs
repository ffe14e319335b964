use crate::checks::CheckRunner;
use crate::model::{AuditItem, AuditResult};
use indicatif::{ProgressBar, ProgressStyle};
use seoscan_scanner::{
    CancellationToken, CrawlOutput, CrawlSettings, CrawlStats, Crawler, Fetcher, ProgressCallback,
    ScanError,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

pub type Result<T> = std::result::Result<T, AuditError>;

/// Options for a single site audit
#[derive(Default)]
pub struct AuditOptions {
    pub settings: CrawlSettings,
    pub show_progress: bool,
    pub cancel: Option<CancellationToken>,
}

impl AuditOptions {
    pub fn new(settings: CrawlSettings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// The aggregated findings plus the statistics of the crawl that produced them.
#[derive(Debug, Clone)]
pub struct SiteAudit {
    pub result: AuditResult,
    pub stats: CrawlStats,
}

/// Parse an audit target. Only absolute http(s) URLs with a host are accepted.
pub fn parse_target(input: &str) -> Result<Url> {
    let trimmed = input.trim();
    let url = Url::parse(trimmed)
        .map_err(|e| AuditError::InvalidUrl(trimmed.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(AuditError::InvalidUrl(
            trimmed.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.host_str().is_none() {
        return Err(AuditError::InvalidUrl(
            trimmed.to_string(),
            "missing host".to_string(),
        ));
    }

    Ok(url)
}

/// Crawl `url` over HTTP and run the default checks on every page.
///
/// The only failures are an unusable target URL or an HTTP client that
/// cannot be built. Unreachable pages just contribute no findings.
pub async fn audit_site(url: &str, options: AuditOptions) -> Result<SiteAudit> {
    let seed = parse_target(url)?;
    let AuditOptions {
        settings,
        show_progress,
        cancel,
    } = options;

    let mut crawler = Crawler::new(settings)?;
    if let Some(token) = cancel {
        crawler = crawler.with_cancellation(token);
    }

    let spinner = show_progress.then(|| Arc::new(spinner(&seed)));
    if let Some(ref pb) = spinner {
        let pb = Arc::clone(pb);
        let callback: ProgressCallback = Arc::new(move |fetched, url| {
            pb.set_message(format!("[{} fetched] {}", fetched, url));
        });
        crawler = crawler.with_progress_callback(callback);
    }

    let audit = audit_with(&crawler, &seed, url.trim(), &CheckRunner::default()).await;

    if let Some(pb) = spinner {
        pb.finish_with_message(format!(
            "Audited {} pages, {} issues",
            audit.stats.pages_fetched, audit.result.total_issues
        ));
    }

    Ok(audit)
}

/// Crawl from `seed` with an already-built crawler and aggregate the
/// findings of `runner` under `base_url`.
pub async fn audit_with<F: Fetcher>(
    crawler: &Crawler<F>,
    seed: &Url,
    base_url: &str,
    runner: &CheckRunner,
) -> SiteAudit {
    let output = crawler.crawl(seed).await;
    let items = check_pages(&output, runner);

    info!(
        "Audit of {} finished: {} pages, {} issues ({:?})",
        base_url,
        output.len(),
        items.len(),
        output.stats.stop_reason
    );

    SiteAudit {
        result: AuditResult::aggregate(base_url, items),
        stats: output.stats,
    }
}

/// Run every check over every crawled page, preserving crawl order.
pub fn check_pages(output: &CrawlOutput, runner: &CheckRunner) -> Vec<AuditItem> {
    output
        .pages
        .iter()
        .flat_map(|page| {
            let items = runner.run_all(&page.markup, &page.url);
            debug!("{} issues on {}", items.len(), page.url);
            items
        })
        .collect()
}

fn spinner(seed: &Url) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(format!("Auditing {}...", seed));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
