//! Knowledge source data types.

use serde::{Deserialize, Serialize};

/// One ranked hit from a knowledge-source search.
///
/// `document_id` is unique within one response but not stable across calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub document_id: u64,
    /// Highlighted excerpt as returned by the source (may contain markup)
    pub snippet: String,
}

impl SearchResult {
    pub fn new(document_id: u64, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            document_id,
            snippet: String::new(),
        }
    }
}

/// Fetched content of one document, scoped to a single pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentContent {
    pub title: String,
    /// Plain-text introductory summary; empty when the source has none
    pub extract: String,
    /// Canonical reference link
    pub url: String,
}

impl DocumentContent {
    pub fn new(title: impl Into<String>, extract: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            extract: extract.into(),
            url: url.into(),
        }
    }
}
