//! Persisted record types

use serde::Deserialize;
use serde::Serialize;

/// One scraped page: a unique source identifier (URL) and its extracted text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRecord {
    #[serde(alias = "url")]
    pub source_id: String,
    pub content: String,
}

impl CorpusRecord {
    pub fn new(source_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            content: content.into(),
        }
    }
}

/// Text of a single extracted HTML element, tagged with its element name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedText {
    pub tag: String,
    pub text: String,
}

impl TaggedText {
    /// Render as a raw-text line such as `H1: Welcome`
    pub fn to_line(&self) -> String {
        format!("{}: {}", self.tag.to_uppercase(), self.text)
    }
}

/// A heading with the paragraphs that follow it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub section: String,
    pub content: String,
}

/// Question/answer pair used by the FAQ matcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}
