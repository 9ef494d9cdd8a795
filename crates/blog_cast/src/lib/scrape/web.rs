use std::{ops::Deref, time::Duration};

use url::Url;

use crate::scrape::{html::HtmlDocument, ContentScraper, ScrapeError, ScrapedPage};

/// Fetches a page over http(s) and reduces it to readable text
pub struct WebScraper(pub reqwest::Client);

impl WebScraper {
    const USER_AGENT: &str = concat!("blog-cast/", env!("CARGO_PKG_VERSION"));
    const TIMEOUT: Duration = Duration::from_secs(30);

    pub fn with_timeout(timeout: Duration) -> Result<Self, ScrapeError> {
        let client = reqwest::Client::builder()
            .user_agent(Self::USER_AGENT)
            .timeout(timeout)
            .build()?;
        Ok(Self(client))
    }
}

impl Default for WebScraper {
    fn default() -> Self {
        Self::with_timeout(Self::TIMEOUT).unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to build scraper client, using defaults without timeout");
            Self(reqwest::Client::default())
        })
    }
}

impl Deref for WebScraper {
    type Target = reqwest::Client;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl ContentScraper for WebScraper {
    type Error = ScrapeError;

    #[tracing::instrument(skip(self))]
    async fn scrape(&self, url: &str) -> Result<ScrapedPage, Self::Error> {
        let parsed = Url::parse(url)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ScrapeError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let resp = self
            .get(parsed)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch page"))?;

        if !resp.status().is_success() {
            return Err(ScrapeError::Status {
                status: resp.status().as_u16(),
                url: url.to_string(),
            });
        }

        let doc = HtmlDocument::from(resp.text().await?);
        let text = doc.to_text();
        if text.is_empty() {
            return Err(ScrapeError::EmptyPage(url.to_string()));
        }

        tracing::debug!(chars = text.len(), "Scraped page");

        Ok(ScrapedPage {
            url: url.to_string(),
            title: doc.title(),
            text,
        })
    }
}
