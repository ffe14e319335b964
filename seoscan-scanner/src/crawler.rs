use crate::error::Result;
use crate::fetcher::{Fetcher, HttpFetcher};
use crate::frontier::{Enqueue, Frontier};
use crate::links::extract_links;
use crate::result::{CrawlOutput, CrawlStats, Page, StopReason};
use crate::settings::CrawlSettings;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Called before every fetch with the number of pages fetched so far and
/// the URL about to be fetched.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Sequential same-origin crawler.
///
/// One fetch is in flight at a time. The crawler itself holds no per-crawl
/// state: every call to [`Crawler::crawl`] works on a fresh [`Frontier`],
/// and [`Crawler::run`] drives a frontier owned by the caller.
pub struct Crawler<F = HttpFetcher> {
    fetcher: F,
    settings: CrawlSettings,
    cancel: CancellationToken,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler<HttpFetcher> {
    pub fn new(settings: CrawlSettings) -> Result<Self> {
        let fetcher = HttpFetcher::new(settings.timeout_secs)?;
        Ok(Self::with_fetcher(fetcher, settings))
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: F, settings: CrawlSettings) -> Self {
        Self {
            fetcher,
            settings,
            cancel: CancellationToken::new(),
            progress_callback: None,
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// An empty frontier sized from this crawler's settings.
    pub fn frontier(&self) -> Frontier {
        Frontier::new(self.settings.max_pages, self.settings.max_pending)
    }

    /// Crawl the origin of `seed`, starting at `seed`.
    ///
    /// Never fails: fetch errors are logged and skipped, so a dead seed
    /// simply yields an empty output.
    pub async fn crawl(&self, seed: &Url) -> CrawlOutput {
        info!(
            "Starting crawl of {} (max {} pages)",
            seed, self.settings.max_pages
        );

        let mut seed = seed.clone();
        seed.set_fragment(None);

        let mut frontier = self.frontier();
        frontier.seed(seed.as_str());
        self.run(&mut frontier).await
    }

    /// Drive the fetch/extract/enqueue loop until the frontier is empty,
    /// the page budget is spent, the crawl is cancelled or its deadline
    /// passes.
    pub async fn run(&self, frontier: &mut Frontier) -> CrawlOutput {
        let deadline = self.settings.deadline().map(|d| Instant::now() + d);
        let mut output = CrawlOutput::default();
        let mut stats = CrawlStats::default();
        let mut consecutive_failures: u32 = 0;

        let stop_reason = loop {
            if self.cancel.is_cancelled() {
                break StopReason::Cancelled;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                break StopReason::DeadlineElapsed;
            }
            if !frontier.has_budget() {
                break StopReason::BudgetReached;
            }
            let Some(url) = frontier.dequeue() else {
                break StopReason::FrontierExhausted;
            };

            frontier.mark_visited(&url);

            if let Some(ref callback) = self.progress_callback {
                callback(frontier.fetched(), url.clone());
            }

            let page_url = match Url::parse(&url) {
                Ok(page_url) => page_url,
                Err(e) => {
                    warn!("Skipping unparseable URL {}: {}", url, e);
                    stats.fetch_failures += 1;
                    continue;
                }
            };

            let fetched = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break StopReason::Cancelled,
                fetched = self.fetcher.fetch(&page_url) => fetched,
            };

            let markup = match fetched {
                Ok(markup) => markup,
                Err(e) => {
                    warn!("Error fetching {}: {}", url, e);
                    stats.fetch_failures += 1;
                    consecutive_failures = consecutive_failures.saturating_add(1);
                    self.pause(self.settings.pause_after(consecutive_failures))
                        .await;
                    continue;
                }
            };
            consecutive_failures = 0;

            if markup.is_empty() {
                debug!("Empty body from {}, not recording", url);
                stats.empty_pages += 1;
                continue;
            }

            frontier.record_fetched();

            let links = extract_links(&markup, &page_url);
            stats.links_discovered += links.len();
            for link in &links {
                match frontier.enqueue_if_new(link) {
                    Enqueue::Queued => stats.links_enqueued += 1,
                    Enqueue::Overflow => debug!("Pending queue full, dropping {}", link),
                    Enqueue::AlreadySeen => {}
                }
            }

            info!("Crawled {} ({} links)", url, links.len());
            output.pages.push(Page::new(url, markup));

            self.pause(self.settings.pause_after(0)).await;
        };

        stats.pages_fetched = output.pages.len();
        stats.revisits_skipped = frontier.skipped();
        stats.queue_overflow = frontier.overflow();
        stats.stop_reason = stop_reason;
        output.stats = stats;

        info!(
            "Crawl complete. Fetched {} pages ({} failures, stopped: {:?})",
            output.stats.pages_fetched, output.stats.fetch_failures, stop_reason
        );
        output
    }

    /// Sleep for `duration`, waking early if the crawl is cancelled.
    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        tokio::select! {
            _ = self.cancel.cancelled() => {}
            _ = tokio::time::sleep(duration) => {}
        }
    }
}
