pub mod builder;

use crate::{
    llm::{
        agent::AgentTask,
        client::{ChatClient, LlmConfig, LlmError},
        LanguageModel,
    },
    scrape::{web::WebScraper, ContentScraper},
    ExtractedDocument, PipelineError, SummaryResult,
};

/// Extraction followed by summarization, treated by callers as one step.
///
/// Both stages are remote calls; the second only starts once the first has
/// produced its whole output. Nothing is retried here, the language-model
/// client owns retry and fallback.
#[derive(Debug)]
pub struct PipelineCoordinator<S, L>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
{
    scraper: S,
    model: L,
}

impl PipelineCoordinator<WebScraper, ChatClient> {
    /// Wires the http scraper and the chat-completions client
    pub fn from_config(config: LlmConfig) -> Result<Self, LlmError> {
        Ok(Self::new(WebScraper::default(), ChatClient::new(config)?))
    }
}

impl<S, L> PipelineCoordinator<S, L>
where
    S: ContentScraper + Send + Sync + 'static,
    L: LanguageModel + Send + Sync + 'static,
{
    pub fn new(scraper: S, model: L) -> Self {
        Self { scraper, model }
    }

    /// Scrapes `url` and lets the extraction agent turn the page into markdown
    #[tracing::instrument(skip(self))]
    async fn extract(&self, url: &str) -> Result<ExtractedDocument, PipelineError> {
        let page = self
            .scraper
            .scrape(url)
            .await
            .map_err(|e| PipelineError::classify(e, PipelineError::Extraction))?;

        let task = AgentTask::extraction(url, &page);
        let markdown_text = self
            .model
            .complete(&task)
            .await
            .map_err(|e| PipelineError::classify(e, PipelineError::Extraction))?;

        if markdown_text.trim().is_empty() {
            tracing::warn!(url, "Extraction produced no content, summarizing anyway");
        }

        Ok(ExtractedDocument { markdown_text })
    }

    #[tracing::instrument(skip_all, fields(chars = document.markdown_text.len()))]
    async fn summarize(&self, document: &ExtractedDocument) -> Result<SummaryResult, PipelineError> {
        let task = AgentTask::summarization(document);
        let summary = self
            .model
            .complete(&task)
            .await
            .map_err(|e| PipelineError::classify(e, PipelineError::Summarization))?;

        let markdown_text = summary.trim().to_string();
        if markdown_text.is_empty() {
            return Err(PipelineError::Summarization("Model returned an empty summary".into()));
        }

        Ok(SummaryResult { markdown_text })
    }

    /// Runs one extraction and one summarization for `url`
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, url: &str) -> Result<SummaryResult, PipelineError> {
        let document = self.extract(url).await?;
        tracing::info!(chars = document.markdown_text.len(), "Content extracted");

        let summary = self.summarize(&document).await?;
        tracing::info!(chars = summary.markdown_text.len(), "Summary produced");

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{
        error::ErrorKind,
        llm::agent::TaskKind,
        scrape::{ScrapeError, ScrapedPage},
    };

    struct StaticScraper(Result<&'static str, u16>);

    impl ContentScraper for StaticScraper {
        type Error = ScrapeError;

        async fn scrape(&self, url: &str) -> Result<ScrapedPage, ScrapeError> {
            match self.0 {
                Ok(text) => Ok(ScrapedPage {
                    url: url.into(),
                    title: None,
                    text: text.into(),
                }),
                Err(status) => Err(ScrapeError::Status {
                    status,
                    url: url.into(),
                }),
            }
        }
    }

    #[derive(Default)]
    struct ScriptedModel {
        tasks: Mutex<Vec<AgentTask>>,
        extraction: Option<&'static str>,
        summary: Option<&'static str>,
    }

    impl LanguageModel for Arc<ScriptedModel> {
        type Error = anyhow::Error;

        async fn complete(&self, task: &AgentTask) -> anyhow::Result<String> {
            self.tasks.lock().unwrap().push(task.clone());
            let answer = match task.kind {
                TaskKind::Extraction => self.extraction,
                TaskKind::Summarization => self.summary,
            };
            answer
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("model refused {:?}", task.kind))
        }
    }

    fn model(extraction: Option<&'static str>, summary: Option<&'static str>) -> Arc<ScriptedModel> {
        Arc::new(ScriptedModel {
            extraction,
            summary,
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_summary_is_built_from_extracted_markdown() {
        let llm = model(Some("# Title\nBody text."), Some("  Body text summary.\n"));
        let coordinator = PipelineCoordinator::new(StaticScraper(Ok("Body text.")), llm.clone());

        let summary = coordinator.run("https://example.com/post").await.unwrap();

        assert_eq!(summary.markdown_text, "Body text summary.");
        let tasks = llm.tasks.lock().unwrap();
        assert_eq!(tasks.len(), 2);
        assert!(tasks[0].description.contains("Body text."));
        assert!(tasks[1].description.contains("# Title\nBody text."));
    }

    #[tokio::test]
    async fn test_scrape_failure_skips_the_model() {
        let llm = model(Some("unused"), Some("unused"));
        let coordinator = PipelineCoordinator::new(StaticScraper(Err(404)), llm.clone());

        let err = coordinator.run("https://example.com/missing").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert!(llm.tasks.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_scrape_is_upstream() {
        let coordinator = PipelineCoordinator::new(StaticScraper(Err(429)), model(None, None));

        let err = coordinator.run("https://example.com/post").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Upstream);
    }

    #[tokio::test]
    async fn test_empty_extraction_is_still_summarized() {
        let llm = model(Some("   "), Some("Nothing much here."));
        let coordinator = PipelineCoordinator::new(StaticScraper(Ok("text")), llm.clone());

        let summary = coordinator.run("https://example.com/post").await.unwrap();

        assert_eq!(summary.markdown_text, "Nothing much here.");
        assert_eq!(llm.tasks.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_model_failures_are_attributed_to_their_step() {
        let coordinator = PipelineCoordinator::new(StaticScraper(Ok("text")), model(None, None));
        let err = coordinator.run("https://example.com/post").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Extraction);

        let coordinator =
            PipelineCoordinator::new(StaticScraper(Ok("text")), model(Some("# Doc"), None));
        let err = coordinator.run("https://example.com/post").await.unwrap_err();
        assert_eq!(err, PipelineError::Summarization("model refused Summarization".into()));
    }

    #[tokio::test]
    async fn test_blank_summary_is_a_summarization_error() {
        let coordinator =
            PipelineCoordinator::new(StaticScraper(Ok("text")), model(Some("# Doc"), Some(" \n ")));

        let err = coordinator.run("https://example.com/post").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Summarization);
    }
}
