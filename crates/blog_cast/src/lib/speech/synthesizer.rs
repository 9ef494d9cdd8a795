use cast_store::AssetStore;

use crate::{
    speech::{strip_markdown_symbols, SpeechBackend, SpeechOptions},
    AudioAsset, AudioFormat, PipelineError,
};

/// Turns summary text into a stored mp3 asset
pub struct TextSynthesizer<B, A>
where
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    backend: B,
    store: A,
    options: SpeechOptions,
}

impl<B, A> TextSynthesizer<B, A>
where
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    pub fn new(backend: B, store: A) -> Self {
        Self {
            backend,
            store,
            options: SpeechOptions::default(),
        }
    }

    pub fn with_options(mut self, options: SpeechOptions) -> Self {
        self.options = options;
        self
    }

    pub fn store(&self) -> &A {
        &self.store
    }

    /// Every asset gets a fresh file; concurrent runs never share one
    #[tracing::instrument(skip_all, fields(chars = text.len()))]
    pub async fn synthesize(&self, text: &str) -> Result<AudioAsset, PipelineError> {
        let spoken = strip_markdown_symbols(text);

        let bytes = self
            .backend
            .speak(&spoken, &self.options)
            .await
            .map_err(|e| PipelineError::Synthesis(e.to_string()))?;

        let format = AudioFormat::Mp3;
        let stored = self
            .store
            .persist(bytes, format.extension())
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to persist audio"))
            .map_err(|e| PipelineError::Synthesis(format!("{e:#}")))?;

        tracing::info!(asset = %stored.name, "Audio asset written");

        Ok(AudioAsset {
            file_path: stored.path,
            format,
        })
    }
}
