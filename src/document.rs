//! Document records handed to the retrieval pipeline

use crate::error::Result;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Lazily produced documents, borrowing whatever produces them
pub type DocumentStream<'a> = Pin<Box<dyn Stream<Item = Result<Document>> + Send + 'a>>;

/// Source label used for Box AI answers
pub const BOX_AI_SOURCE: &str = "Box AI";

/// A normalized document: extracted text plus where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Plain-text content
    pub content: String,
    /// URL (or label) the content was read from
    pub source: String,
    /// Human-readable title
    pub title: String,
}

impl Document {
    /// Create a new document
    pub fn new(
        content: impl Into<String>,
        source: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
            title: title.into(),
        }
    }

    /// Wrap a Box AI answer to `prompt`
    pub fn box_ai_answer(prompt: &str, answer: impl Into<String>) -> Self {
        Self::new(answer, BOX_AI_SOURCE, format!("Box AI {prompt}"))
    }
}
