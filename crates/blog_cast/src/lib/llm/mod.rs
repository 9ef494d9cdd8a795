pub mod agent;
pub mod client;

use std::future::Future;

use crate::{error::RemoteFailure, llm::agent::AgentTask};

/// Language-model capability used by both agent steps
pub trait LanguageModel {
    type Error: RemoteFailure + Send;

    /// Runs one agent task and returns the generated text
    fn complete(&self, task: &AgentTask) -> impl Future<Output = Result<String, Self::Error>> + Send;
}
