use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Unexpected status code: {0}")]
    Status(u16),

    #[error("Not a text response: {0}")]
    NotText(String),
}

pub type Result<T> = std::result::Result<T, ScanError>;
