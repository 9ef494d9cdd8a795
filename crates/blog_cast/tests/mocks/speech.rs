use std::sync::{Arc, Mutex};

use blog_cast::{SpeechBackend, SpeechOptions};

#[derive(Clone)]
pub struct MockSpeechBackend {
    pub calls: Arc<Mutex<Vec<(String, SpeechOptions)>>>,
    pub fail_with: Option<String>,
}

impl Default for MockSpeechBackend {
    fn default() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockSpeechBackend {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl SpeechBackend for MockSpeechBackend {
    type Error = anyhow::Error;

    async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<Vec<u8>, Self::Error> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), options.clone()));
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(format!("ID3:{text}").into_bytes())
    }
}
