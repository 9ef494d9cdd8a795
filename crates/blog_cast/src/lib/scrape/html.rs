//! # Html Parser
//!
//! Turns a fetched html page into the plain text handed to the extraction
//! agent: the `<title>`, and the visible body text with markup, scripts and
//! styles removed.

use std::sync::LazyLock;

use regex::Regex;

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Elements whose content is never readable text
static HIDDEN_BLOCK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["head", "script", "style", "noscript", "svg", "template", "iframe"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).unwrap())
        .collect()
});

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(p|div|br|hr|li|ul|ol|h[1-6]|tr|table|section|article|header|footer|nav|aside|main|blockquote|pre|figure|figcaption)\b[^>]*>",
    )
    .unwrap()
});

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static NUMERIC_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#([xX][0-9a-fA-F]+|[0-9]+);").unwrap());

#[derive(Debug, Clone)]
pub struct HtmlDocument(String);

impl HtmlDocument {
    pub fn new(html: String) -> Self {
        Self(html)
    }

    pub fn title(&self) -> Option<String> {
        TITLE_RE
            .captures(&self.0)
            .and_then(|caps| caps.get(1))
            .map(|m| collapse_whitespace(&decode_entities(m.as_str())))
            .filter(|title| !title.is_empty())
    }

    /// Visible text, one paragraph per line
    pub fn to_text(&self) -> String {
        let mut html = COMMENT_RE.replace_all(&self.0, "").into_owned();
        for re in HIDDEN_BLOCK_RES.iter() {
            html = re.replace_all(&html, "").into_owned();
        }

        // source line breaks carry no meaning; block elements do
        let html = WHITESPACE_RE.replace_all(&html, " ");
        let html = BLOCK_TAG_RE.replace_all(&html, "\n");
        let text = TAG_RE.replace_all(&html, "");
        let text = decode_entities(&text);

        text.lines()
            .map(collapse_whitespace)
            .filter(|line| !line.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<String> for HtmlDocument {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

fn collapse_whitespace(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    let text = NUMERIC_ENTITY_RE.replace_all(text, |caps: &regex::Captures| {
        let raw = &caps[1];
        let code = match raw.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => raw.parse::<u32>().ok(),
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // &amp; last so "&amp;lt;" stays "&lt;"
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
