pub mod google;
pub mod synthesizer;

use std::{fmt::Display, future::Future};

/// Text-to-speech capability
pub trait SpeechBackend {
    type Error: Display + Send;

    /// Returns mp3 bytes for `text`
    fn speak(
        &self,
        text: &str,
        options: &SpeechOptions,
    ) -> impl Future<Output = Result<Vec<u8>, Self::Error>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechOptions {
    /// IETF language tag, e.g. `en`
    pub language: String,
    pub slow: bool,
}

impl Default for SpeechOptions {
    fn default() -> Self {
        Self {
            language: "en".into(),
            slow: false,
        }
    }
}

/// Drops the literal `#`, `*` and `_` characters. Other markdown (links,
/// numbered lists, code fences) is left for the narrator to read out.
pub fn strip_markdown_symbols(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(c, '#' | '*' | '_'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_only_hash_star_underscore() {
        let stripped = strip_markdown_symbols("## Title\n**bold** _it_ [link](http://x) 1. item");
        assert_eq!(stripped, " Title\nbold it [link](http://x) 1. item");
    }

    #[test]
    fn test_strip_is_idempotent() {
        let inputs = ["# a * b _ c", "***", "", "plain text", "_#*mixed*#_ symbols"];
        for input in inputs {
            let once = strip_markdown_symbols(input);
            assert_eq!(strip_markdown_symbols(&once), once);
            assert!(!once.contains(['#', '*', '_']));
        }
    }
}
