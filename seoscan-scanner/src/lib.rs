pub mod crawler;
pub mod error;
pub mod fetcher;
pub mod frontier;
pub mod links;
pub mod result;
pub mod settings;

pub use crawler::{Crawler, ProgressCallback};
pub use error::ScanError;
pub use fetcher::{Fetcher, HttpFetcher};
pub use frontier::{Enqueue, Frontier};
pub use links::extract_links;
pub use result::{CrawlOutput, CrawlStats, Page, StopReason};
pub use settings::CrawlSettings;
pub use tokio_util::sync::CancellationToken;
