use serde::{Deserialize, Serialize};

/// A successfully fetched page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub url: String,
    pub markup: String,
}

impl Page {
    pub fn new(url: impl Into<String>, markup: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            markup: markup.into(),
        }
    }
}

/// Why the crawl loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    FrontierExhausted,
    BudgetReached,
    Cancelled,
    DeadlineElapsed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrawlStats {
    pub pages_fetched: usize,
    pub fetch_failures: usize,
    /// Fetches that succeeded but returned an empty body.
    pub empty_pages: usize,
    /// Queue entries discarded because they were already visited.
    pub revisits_skipped: usize,
    pub links_discovered: usize,
    pub links_enqueued: usize,
    /// Discoveries dropped because the pending queue was full.
    pub queue_overflow: usize,
    pub stop_reason: StopReason,
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self {
            pages_fetched: 0,
            fetch_failures: 0,
            empty_pages: 0,
            revisits_skipped: 0,
            links_discovered: 0,
            links_enqueued: 0,
            queue_overflow: 0,
            stop_reason: StopReason::FrontierExhausted,
        }
    }
}

/// Pages in fetch order, each URL at most once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrawlOutput {
    pub pages: Vec<Page>,
    pub stats: CrawlStats,
}

impl CrawlOutput {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.pages
            .iter()
            .find(|page| page.url == url)
            .map(|page| page.markup.as_str())
    }

    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.url.as_str())
    }
}
