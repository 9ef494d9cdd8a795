use async_stream::stream;
use cast_store::AssetStore;
use futures::Stream;

use crate::{
    llm::LanguageModel, scrape::ContentScraper, speech::SpeechBackend, PipelineCoordinator,
    PipelineRequest, ProgressUpdate, Stage, TextSynthesizer,
};

/// Drives one pipeline run per user action and reports its progress.
///
/// The controller is the only place a [`crate::PipelineError`] becomes a
/// user-visible status: every run ends in exactly one terminal update.
pub struct InteractionController<S, L, B, A>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    coordinator: PipelineCoordinator<S, L>,
    synthesizer: TextSynthesizer<B, A>,
}

impl<S, L, B, A> InteractionController<S, L, B, A>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
    B: SpeechBackend + Send + Sync + 'static,
    A: AssetStore + Send + Sync + 'static,
{
    pub fn new(coordinator: PipelineCoordinator<S, L>, synthesizer: TextSynthesizer<B, A>) -> Self {
        Self {
            coordinator,
            synthesizer,
        }
    }

    /// Where synthesized audio ends up
    pub fn assets(&self) -> &A {
        self.synthesizer.store()
    }

    /// Lazily runs the pipeline for `request`.
    ///
    /// Nothing happens until the stream is polled. Dropping the stream
    /// abandons the run at whichever remote call it is waiting on.
    pub fn handle(&self, request: PipelineRequest) -> impl Stream<Item = ProgressUpdate> + Send + '_ {
        stream! {
            let url = match request.validated_url() {
                Ok(url) => url.to_string(),
                Err(e) => {
                    tracing::warn!(error = %e, "Rejected request");
                    yield ProgressUpdate::failed(None, &e);
                    return;
                }
            };

            let mut session = Session::default();

            session.enter(Stage::Extracting);
            yield ProgressUpdate::processing(
                Stage::Extracting,
                None,
                ProgressUpdate::EXTRACTING_MESSAGE,
            );

            let summary = match self.coordinator.run(&url).await {
                Ok(summary) => summary.markdown_text,
                Err(e) => {
                    tracing::error!(error = %e, %url, "Pipeline run failed");
                    session.enter(Stage::Done);
                    yield ProgressUpdate::failed(Some(format!("Error processing URL: {e}")), &e);
                    return;
                }
            };

            session.enter(Stage::Summarizing);
            yield ProgressUpdate::processing(
                Stage::Summarizing,
                Some(summary.clone()),
                ProgressUpdate::SYNTHESIZING_MESSAGE,
            );

            session.enter(Stage::Synthesizing);
            let outcome = self.synthesizer.synthesize(&summary).await;

            session.enter(Stage::Done);
            match outcome {
                Ok(audio) => {
                    tracing::info!(%url, audio = ?audio.file_name(), "Podcast generated");
                    yield ProgressUpdate::completed(summary, audio);
                }
                Err(e) => {
                    tracing::error!(error = %e, %url, "Speech synthesis failed");
                    // the summary was already delivered, keep it on screen
                    yield ProgressUpdate::failed(Some(summary), &e);
                }
            }
        }
    }
}

/// Forward-only stage tracker for a single run
#[derive(Debug)]
struct Session {
    stage: Stage,
}

impl Default for Session {
    fn default() -> Self {
        Self { stage: Stage::Idle }
    }
}

impl Session {
    fn enter(&mut self, next: Stage) {
        debug_assert!(next > self.stage, "stage went from {:?} to {:?}", self.stage, next);
        tracing::debug!(from = ?self.stage, to = ?next, "Stage transition");
        self.stage = next;
    }
}
