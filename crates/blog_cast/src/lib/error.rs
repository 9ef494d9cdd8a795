use std::fmt::Display;

use crate::{llm::client::LlmError, scrape::ScrapeError};

/// Failures surfaced by a pipeline run. The controller turns each of these
/// into a terminal status update; nothing below it recovers locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(String),
    #[error("Content extraction failed: {0}")]
    Extraction(String),
    #[error("Summarization failed: {0}")]
    Summarization(String),
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
    #[error("Upstream service error: {0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Extraction,
    Summarization,
    Synthesis,
    Upstream,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Validation(_) => ErrorKind::Validation,
            PipelineError::Extraction(_) => ErrorKind::Extraction,
            PipelineError::Summarization(_) => ErrorKind::Summarization,
            PipelineError::Synthesis(_) => ErrorKind::Synthesis,
            PipelineError::Upstream(_) => ErrorKind::Upstream,
        }
    }

    /// Upstream-class failures (transport, auth, quota) become `Upstream`,
    /// everything else is attributed to the step that raised it.
    pub(crate) fn classify<E: RemoteFailure>(err: E, step: fn(String) -> PipelineError) -> Self {
        if err.is_upstream() {
            PipelineError::Upstream(err.to_string())
        } else {
            step(err.to_string())
        }
    }
}

/// Error raised by one of the remote capabilities (scraper, language model)
pub trait RemoteFailure: Display {
    /// Whether the failure belongs to the transport / auth / quota class
    fn is_upstream(&self) -> bool {
        false
    }
}

impl RemoteFailure for anyhow::Error {
    fn is_upstream(&self) -> bool {
        if let Some(e) = self.downcast_ref::<LlmError>() {
            return e.is_upstream();
        }
        if let Some(e) = self.downcast_ref::<ScrapeError>() {
            return e.is_upstream();
        }
        false
    }
}
