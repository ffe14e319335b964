use crate::error::{Result, ScanError};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;
use url::Url;

/// Retrieves the markup behind a URL.
///
/// Implementations never retry. Any failure comes back as an error value
/// so the caller can log it and move on.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<String>;
}

#[async_trait]
impl<T: Fetcher + ?Sized> Fetcher for Arc<T> {
    async fn fetch(&self, url: &Url) -> Result<String> {
        (**self).fetch(url).await
    }
}

/// reqwest-backed fetcher with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!(
                "seoscan/",
                env!("CARGO_PKG_VERSION"),
                " (+https://github.com/seoscan/seoscan)"
            ))
            .timeout(Duration::from_secs(timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            timeout_secs,
        })
    }

    fn classify(&self, error: reqwest::Error) -> ScanError {
        if error.is_timeout() {
            ScanError::Timeout(self.timeout_secs)
        } else {
            ScanError::HttpError(error)
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<String> {
        debug!("Fetching {}", url);

        let start = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScanError::Status(status.as_u16()));
        }

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_textual(content_type)
        {
            return Err(ScanError::NotText(content_type.to_string()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        debug!("Fetched {} ({} bytes in {:?})", url, body.len(), start.elapsed());
        Ok(body)
    }
}

/// Whether a Content-Type header names something we can parse as markup.
pub fn is_textual(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/") || mime.contains("html") || mime.contains("xml")
}
