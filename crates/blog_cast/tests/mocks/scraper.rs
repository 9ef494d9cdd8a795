use std::sync::{Arc, Mutex};

use blog_cast::{ContentScraper, ScrapedPage};

#[derive(Clone)]
pub struct MockScraper {
    pub text: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockScraper {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            text: String::new(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl ContentScraper for MockScraper {
    type Error = anyhow::Error;

    async fn scrape(&self, url: &str) -> Result<ScrapedPage, Self::Error> {
        self.calls.lock().unwrap().push(url.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(ScrapedPage {
            url: url.to_string(),
            title: Some("Mock Post".to_string()),
            text: self.text.clone(),
        })
    }
}
