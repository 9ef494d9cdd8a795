use std::time::Duration;

use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Deserialize;

use crate::{
    error::RemoteFailure,
    llm::{agent::AgentTask, LanguageModel},
};

/// Gemini's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

/// Immutable language-model settings, built once at startup
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Checked lazily, on the first request
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Tried in order when the primary model fails
    pub fallback_models: Vec<String>,
    pub temperature: f32,
    /// Transport-level retries for transient failures (5xx, 429, timeouts)
    pub num_retries: u32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.into(),
            model: "gemini-2.0-flash".into(),
            fallback_models: vec!["gemini-1.5-flash".into()],
            temperature: 0.7,
            num_retries: 3,
            timeout: Duration::from_secs(120),
        }
    }
}

/// Chat-completions client speaking the OpenAI wire format
#[derive(Clone)]
pub struct ChatClient {
    client: ClientWithMiddleware,
    config: LlmConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest_middleware::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("Missing API key: set GOOGLE_API_KEY")]
    MissingApiKey,
    #[error("Model returned no content")]
    EmptyResponse,
}

impl RemoteFailure for LlmError {
    fn is_upstream(&self) -> bool {
        match self {
            LlmError::Request(_) | LlmError::MissingApiKey => true,
            LlmError::Http(e) => e.is_timeout() || e.is_connect(),
            LlmError::Api { status, .. } => matches!(status, 401 | 403 | 408 | 429 | 500..=599),
            LlmError::EmptyResponse => false,
        }
    }
}

impl ChatClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder().timeout(config.timeout).build()?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.num_retries);

        let client = ClientBuilder::new(http_client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self { client, config })
    }

    pub async fn send_completion_request(
        &self,
        model_name: &str,
        task: &AgentTask,
    ) -> Result<CompletionResponse, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let body = serde_json::json!({
            "model": model_name,
            "temperature": self.config.temperature,
            "messages": [
                {
                    "role": "system",
                    "content": task.system_message()
                },
                {
                    "role": "user",
                    "content": task.user_message()
                }
            ]
        });

        let resp = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.config.base_url.trim_end_matches('/')
            ))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api { status, message });
        }

        Ok(resp.json::<CompletionResponse>().await?)
    }

    async fn complete_with_model(&self, model_name: &str, task: &AgentTask) -> Result<String, LlmError> {
        let response = self.send_completion_request(model_name, task).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;
        tracing::debug!(model = model_name, finish_reason = ?choice.finish_reason, "Completion received");

        choice
            .message
            .content
            .filter(|content| !content.trim().is_empty())
            .ok_or(LlmError::EmptyResponse)
    }
}

#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl LanguageModel for ChatClient {
    type Error = LlmError;

    #[tracing::instrument(skip_all, fields(task = ?task.kind, model = %self.config.model))]
    async fn complete(&self, task: &AgentTask) -> Result<String, Self::Error> {
        let mut outcome = self.complete_with_model(&self.config.model, task).await;

        for fallback in &self.config.fallback_models {
            match &outcome {
                Ok(_) | Err(LlmError::MissingApiKey) => break,
                Err(e) => tracing::warn!(error = %e, fallback = %fallback, "Model failed, trying fallback"),
            }
            outcome = self.complete_with_model(fallback, task).await;
        }

        outcome.inspect_err(|e| tracing::error!(error = %e, "Failed to complete agent task"))
    }
}
