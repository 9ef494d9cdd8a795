//! # blog_cast
//!
//! Turns a blog post into a short podcast: the page is scraped, rewritten as
//! markdown by an extraction agent, condensed by a summarization agent and
//! finally read out by a text-to-speech backend. Progress is reported as a
//! stream of [`ProgressUpdate`]s that the web layer relays to the browser.

mod controller;
mod error;
pub mod llm;
mod pipeline;
pub mod scrape;
pub mod speech;
pub mod tracing;
mod types;
pub mod web;

pub use controller::InteractionController;
pub use error::{ErrorKind, PipelineError, RemoteFailure};
pub use llm::{
    agent::{AgentTask, TaskKind},
    client::{ChatClient, LlmConfig, LlmError},
    LanguageModel,
};
pub use pipeline::{builder::PipelineCoordinatorBuilder, PipelineCoordinator};
pub use scrape::{web::WebScraper, ContentScraper, ScrapeError, ScrapedPage};
pub use speech::{
    google::{GoogleTts, SpeechError},
    synthesizer::TextSynthesizer,
    strip_markdown_symbols, SpeechBackend, SpeechOptions,
};
pub use types::{
    AudioAsset, AudioFormat, ExtractedDocument, PipelineRequest, ProgressUpdate, Stage, StatusKind,
    SummaryResult,
};
