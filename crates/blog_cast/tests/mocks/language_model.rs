use std::sync::{Arc, Mutex};

use blog_cast::{AgentTask, LanguageModel, LlmError, TaskKind};

/// Answers each agent task with a canned response for its kind
#[derive(Clone)]
pub struct MockLanguageModel {
    pub extraction: String,
    pub summary: String,
    pub calls: Arc<Mutex<Vec<AgentTask>>>,
    pub fail_on: Option<(TaskKind, String)>,
    pub missing_key: bool,
}

impl MockLanguageModel {
    pub fn new(extraction: &str, summary: &str) -> Self {
        Self {
            extraction: extraction.to_string(),
            summary: summary.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_on: None,
            missing_key: false,
        }
    }

    pub fn failing(kind: TaskKind, msg: &str) -> Self {
        Self {
            fail_on: Some((kind, msg.to_string())),
            ..Self::new("# Extracted", "summary")
        }
    }

    pub fn without_api_key() -> Self {
        Self {
            missing_key: true,
            ..Self::new("", "")
        }
    }

    pub fn kinds_called(&self) -> Vec<TaskKind> {
        self.calls.lock().unwrap().iter().map(|t| t.kind).collect()
    }
}

impl LanguageModel for MockLanguageModel {
    type Error = anyhow::Error;

    async fn complete(&self, task: &AgentTask) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(task.clone());
        if self.missing_key {
            return Err(LlmError::MissingApiKey.into());
        }
        if let Some((kind, ref msg)) = self.fail_on {
            if kind == task.kind {
                return Err(anyhow::anyhow!("{}", msg));
            }
        }
        Ok(match task.kind {
            TaskKind::Extraction => self.extraction.clone(),
            TaskKind::Summarization => self.summary.clone(),
        })
    }
}
