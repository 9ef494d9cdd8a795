pub mod html;
pub mod web;

use std::future::Future;

use crate::error::RemoteFailure;

/// The scraping tool bound to the extraction agent
pub trait ContentScraper {
    type Error: RemoteFailure + Send;

    fn scrape(&self, url: &str) -> impl Future<Output = Result<ScrapedPage, Self::Error>> + Send;
}

/// Readable text of a fetched page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapedPage {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Failed to fetch {url}: HTTP {status}")]
    Status { status: u16, url: String },
    #[error("No readable content found at {0}")]
    EmptyPage(String),
}

impl RemoteFailure for ScrapeError {
    fn is_upstream(&self) -> bool {
        match self {
            ScrapeError::Request(e) => e.is_timeout(),
            ScrapeError::Status { status, .. } => *status == 429,
            _ => false,
        }
    }
}
