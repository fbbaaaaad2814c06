//! Knowledge source access for wikiqa.
//!
//! - [`KnowledgeSource`]: search and by-id document fetch
//! - [`WikipediaClient`]: MediaWiki Action API implementation
//! - [`fetch_all`]: concurrent fan-out fetch that tolerates individual failures
//! - [`MockKnowledgeSource`]: in-memory source for tests and offline runs

pub mod fetcher;
pub mod mock;
pub mod source;
pub mod types;
pub mod wikipedia;

pub use fetcher::fetch_all;
pub use mock::MockKnowledgeSource;
pub use source::KnowledgeSource;
pub use types::{DocumentContent, SearchResult};
pub use wikipedia::WikipediaClient;
