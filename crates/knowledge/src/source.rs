//! Knowledge source abstraction.

use crate::types::{DocumentContent, SearchResult};
use wikiqa_core::AppResult;

/// A searchable collection of documents addressed by integer identifiers.
///
/// Implementations issue exactly one outbound request per call and never
/// retry or cache.
#[async_trait::async_trait]
pub trait KnowledgeSource: Send + Sync {
    /// Human-readable source name used in reasoning traces (e.g. "Wikipedia").
    fn name(&self) -> &str;

    /// Search for documents matching `query`, best match first.
    ///
    /// Zero matches is an empty vector, not an error. Transport, status or
    /// decoding failures are `AppError::Search`.
    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<SearchResult>>;

    /// Fetch one document's introductory extract and canonical URL.
    ///
    /// Returns `AppError::DocumentNotFound` when the source has no such page.
    async fn fetch_document(&self, document_id: u64) -> AppResult<DocumentContent>;
}
