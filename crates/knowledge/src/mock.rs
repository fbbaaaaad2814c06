//! In-memory knowledge source.

use crate::source::KnowledgeSource;
use crate::types::{DocumentContent, SearchResult};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use wikiqa_core::{AppError, AppResult};

/// Mock knowledge source for testing and development.
///
/// Every search returns the same configured results regardless of the
/// query (truncated to `limit`). Documents are served from a map; unknown
/// ids are `DocumentNotFound`. Call counts and searched queries are
/// recorded so tests can assert which steps ran.
#[derive(Debug, Default)]
pub struct MockKnowledgeSource {
    results: Vec<SearchResult>,
    search_error: Option<String>,
    documents: HashMap<u64, DocumentContent>,
    failing: HashSet<u64>,
    delays: HashMap<u64, Duration>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    queries: Mutex<Vec<String>>,
}

impl MockKnowledgeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned by every search.
    pub fn with_search_results(mut self, results: Vec<SearchResult>) -> Self {
        self.results = results;
        self
    }

    /// Make every search fail with `AppError::Search`.
    pub fn with_search_error(mut self, message: impl Into<String>) -> Self {
        self.search_error = Some(message.into());
        self
    }

    pub fn with_document(mut self, document_id: u64, document: DocumentContent) -> Self {
        self.documents.insert(document_id, document);
        self
    }

    /// Make fetches of this id fail with a transport-style error.
    pub fn with_failing_document(mut self, document_id: u64) -> Self {
        self.failing.insert(document_id);
        self
    }

    /// Delay fetches of this id before answering.
    pub fn with_fetch_delay(mut self, document_id: u64, delay: Duration) -> Self {
        self.delays.insert(document_id, delay);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Queries passed to `search`, in call order.
    pub fn queries(&self) -> Vec<String> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl KnowledgeSource for MockKnowledgeSource {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    async fn search(&self, query: &str, limit: u32) -> AppResult<Vec<SearchResult>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.to_string());
        }

        if let Some(ref message) = self.search_error {
            return Err(AppError::Search(message.clone()));
        }

        Ok(self
            .results
            .iter()
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn fetch_document(&self, document_id: u64) -> AppResult<DocumentContent> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&document_id) {
            tokio::time::sleep(*delay).await;
        }

        if self.failing.contains(&document_id) {
            return Err(AppError::Search(format!(
                "simulated fetch failure for {}",
                document_id
            )));
        }

        self.documents
            .get(&document_id)
            .cloned()
            .ok_or(AppError::DocumentNotFound(document_id))
    }
}
