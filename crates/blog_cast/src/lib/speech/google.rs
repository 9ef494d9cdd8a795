use std::time::Duration;

use reqwest::Client;

use crate::speech::{SpeechBackend, SpeechOptions};

/// Google Translate's text-to-speech endpoint, the same one gTTS uses.
///
/// The endpoint only accepts short inputs, so text is split into chunks of at
/// most [`GoogleTts::MAX_CHUNK_CHARS`] characters on word boundaries and the
/// returned mp3 segments are concatenated.
#[derive(Debug, Clone)]
pub struct GoogleTts {
    client: Client,
    endpoint: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("TTS API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No text to speak")]
    EmptyText,
    #[error("TTS API returned no audio")]
    EmptyAudio,
}

impl GoogleTts {
    pub const MAX_CHUNK_CHARS: usize = 100;
    const TIMEOUT: Duration = Duration::from_secs(30);

    /// `tld` selects the regional host, e.g. `com` or `co.uk`
    pub fn new(tld: &str) -> Result<Self, SpeechError> {
        Self::with_timeout(tld, Self::TIMEOUT)
    }

    /// Each chunk request is abandoned after `timeout`
    pub fn with_timeout(tld: &str, timeout: Duration) -> Result<Self, SpeechError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("https://translate.google.{tld}/translate_tts"),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        idx: usize,
        total: usize,
        options: &SpeechOptions,
    ) -> Result<Vec<u8>, SpeechError> {
        let speed = if options.slow { "0.3" } else { "1" };
        let idx = idx.to_string();
        let total = total.to_string();
        let textlen = chunk.chars().count().to_string();

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("q", chunk),
                ("tl", options.language.as_str()),
                ("ttsspeed", speed),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(SpeechError::Api { status, message });
        }

        Ok(resp.bytes().await?.to_vec())
    }
}

impl SpeechBackend for GoogleTts {
    type Error = SpeechError;

    #[tracing::instrument(skip_all, fields(chars = text.len(), lang = %options.language))]
    async fn speak(&self, text: &str, options: &SpeechOptions) -> Result<Vec<u8>, Self::Error> {
        let chunks = split_into_chunks(text, Self::MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SpeechError::EmptyText);
        }

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, idx, chunks.len(), options).await?;
            audio.extend_from_slice(&bytes);
        }

        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        tracing::debug!(chunks = chunks.len(), bytes = audio.len(), "Synthesized speech");
        Ok(audio)
    }
}

/// Greedy word packing; words longer than `max_chars` are hard split
fn split_into_chunks(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if word_len > max_chars {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let chars = word.chars().collect::<Vec<_>>();
            chunks.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }

        let current_len = current.chars().count();
        if !current.is_empty() && current_len + 1 + word_len > max_chars {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
