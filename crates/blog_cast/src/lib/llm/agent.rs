//! # Agent tasks
//!
//! The two language-model steps of the pipeline are declared as data: who
//! the agent is (role, goal, backstory), what it must do (description) and
//! what it must hand back (expected output). A [`crate::LanguageModel`]
//! renders a task into a system / user message pair.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::{scrape::ScrapedPage, types::ExtractedDocument};

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(url|title|content)\}").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Extraction,
    Summarization,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentTask {
    pub kind: TaskKind,
    pub role: &'static str,
    pub goal: &'static str,
    pub backstory: &'static str,
    pub description: String,
    pub expected_output: &'static str,
}

impl AgentTask {
    const EXTRACT_TEMPLATE: &str = include_str!("./prompts/extract.txt");
    const SUMMARIZE_TEMPLATE: &str = include_str!("./prompts/summarize.txt");

    /// Formats a scraped page into clean blog markdown
    pub fn extraction(url: &str, page: &ScrapedPage) -> Self {
        let title = page.title.as_deref().unwrap_or("(none)");
        let description = fill_template(Self::EXTRACT_TEMPLATE, |name| match name {
            "url" => Some(url),
            "title" => Some(title),
            "content" => Some(page.text.as_str()),
            _ => None,
        });

        Self {
            kind: TaskKind::Extraction,
            role: "Web Content Scraper",
            goal: "Extract complete and accurate information from a blog URL",
            backstory: "You are a web content scraper. You are given a blog URL and you need to \
                        extract the complete and accurate information from the blog.",
            description,
            expected_output: "The complete and accurate information from the blog in markdown format",
        }
    }

    /// Condenses the extracted markdown. Whatever the extraction step
    /// produced is summarized as-is, empty input included.
    pub fn summarization(document: &ExtractedDocument) -> Self {
        let description = fill_template(Self::SUMMARIZE_TEMPLATE, |name| {
            (name == "content").then_some(document.markdown_text.as_str())
        });

        Self {
            kind: TaskKind::Summarization,
            role: "Content Summarizer",
            goal: "Summarize the blog content in a concise and informative manner",
            backstory: "You are a blog summarizer. You are given a blog text and you need to \
                        summarize the blog content in a concise and informative manner.",
            description,
            expected_output: "The summary of the blog content around 200-250 words in markdown \
                              format. The summary will be used to generate a podcast script.",
        }
    }

    pub fn system_message(&self) -> String {
        format!(
            "You are a {}. {}\nYour personal goal is: {}",
            self.role, self.backstory, self.goal
        )
    }

    pub fn user_message(&self) -> String {
        format!(
            "{}\n\nThis is the expected criteria for your final answer: {}\n\
             You MUST return the actual complete content as the final answer, not a summary of \
             what you did.",
            self.description.trim_end(),
            self.expected_output
        )
    }
}

/// Substitutes every placeholder in one pass; inserted values are never
/// rescanned. Unknown placeholders are left as they are.
fn fill_template<'a>(template: &str, value: impl Fn(&str) -> Option<&'a str>) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| match value(&caps[1]) {
            Some(v) => v.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(text: &str) -> ScrapedPage {
        ScrapedPage {
            url: "https://example.com/post".into(),
            title: Some("A Post".into()),
            text: text.into(),
        }
    }

    #[test]
    fn test_extraction_task_embeds_url_title_and_page_text() {
        let task = AgentTask::extraction("https://example.com/post", &page("Body of the post"));

        assert_eq!(task.kind, TaskKind::Extraction);
        assert!(task.description.contains("https://example.com/post"));
        assert!(task.description.contains("Page title: A Post"));
        assert!(task.description.contains("Body of the post"));
        assert!(!task.description.contains("{content}"));
    }

    #[test]
    fn test_page_text_is_not_treated_as_template() {
        let task = AgentTask::extraction("https://example.com", &page("literal {url} marker"));
        assert!(task.description.contains("literal {url} marker"));
    }

    #[test]
    fn test_placeholders_in_title_and_url_are_kept_verbatim() {
        let page = ScrapedPage {
            url: "https://example.com/?tpl={title}".into(),
            title: Some("Using {content} slots in Vue".into()),
            text: "BODY_MARKER".into(),
        };
        let task = AgentTask::extraction("https://example.com/?tpl={title}", &page);

        assert!(task.description.contains("https://example.com/?tpl={title}"));
        assert!(task.description.contains("Page title: Using {content} slots in Vue"));
        assert_eq!(task.description.matches("BODY_MARKER").count(), 1);
    }

    #[test]
    fn test_summarization_keeps_placeholders_in_document() {
        let task = AgentTask::summarization(&ExtractedDocument {
            markdown_text: "Templates use {url} and {content}".into(),
        });
        assert!(task.description.contains("Templates use {url} and {content}"));
    }

    #[test]
    fn test_summarization_task_accepts_empty_document() {
        let document = ExtractedDocument {
            markdown_text: String::new(),
        };
        let task = AgentTask::summarization(&document);

        assert_eq!(task.kind, TaskKind::Summarization);
        assert!(task.user_message().contains("200-250 words"));
    }

    #[test]
    fn test_system_message_carries_role_and_goal() {
        let task = AgentTask::summarization(&ExtractedDocument {
            markdown_text: "# Title".into(),
        });
        let system = task.system_message();

        assert!(system.starts_with("You are a Content Summarizer."));
        assert!(system.contains("Summarize the blog content"));
    }
}
