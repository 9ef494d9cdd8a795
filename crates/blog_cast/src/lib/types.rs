use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::PipelineError;

/// A single user submission
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PipelineRequest {
    pub url: String,
}

impl PipelineRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Returns the trimmed url, rejecting empty and whitespace-only input
    pub fn validated_url(&self) -> Result<&str, PipelineError> {
        match self.url.trim() {
            "" => Err(PipelineError::Validation("No URL provided".into())),
            url => Ok(url),
        }
    }
}

/// Markdown produced by the extraction agent; only ever fed to summarization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub markdown_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResult {
    pub markdown_text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Mp3,
}

impl AudioFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioAsset {
    pub file_path: PathBuf,
    pub format: AudioFormat,
}

impl AudioAsset {
    pub fn file_name(&self) -> Option<&str> {
        self.file_path.file_name().and_then(|n| n.to_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Processing,
    Success,
    Error,
}

/// Pipeline milestone an update was emitted at
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Idle,
    Extracting,
    Summarizing,
    Synthesizing,
    Done,
}

/// One staged update streamed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub stage: Stage,
    pub summary_text_so_far: Option<String>,
    pub audio_asset: Option<AudioAsset>,
    pub status_message: String,
    pub status_kind: StatusKind,
}

impl ProgressUpdate {
    pub const EXTRACTING_MESSAGE: &str = "Processing URL with the scraping and summarizing agents...";
    pub const SYNTHESIZING_MESSAGE: &str = "Generating audio from summary...";
    pub const COMPLETED_MESSAGE: &str = "Podcast generation completed successfully!";

    pub(crate) fn processing(stage: Stage, summary: Option<String>, message: &str) -> Self {
        Self {
            stage,
            summary_text_so_far: summary,
            audio_asset: None,
            status_message: message.into(),
            status_kind: StatusKind::Processing,
        }
    }

    pub(crate) fn completed(summary: String, audio: AudioAsset) -> Self {
        Self {
            stage: Stage::Done,
            summary_text_so_far: Some(summary),
            audio_asset: Some(audio),
            status_message: Self::COMPLETED_MESSAGE.into(),
            status_kind: StatusKind::Success,
        }
    }

    /// Terminal failure. `summary` is `None` only for rejected input.
    pub(crate) fn failed(summary: Option<String>, error: &PipelineError) -> Self {
        Self {
            stage: Stage::Done,
            summary_text_so_far: summary,
            audio_asset: None,
            status_message: format!("Error: {error}"),
            status_kind: StatusKind::Error,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.stage == Stage::Done
    }
}
