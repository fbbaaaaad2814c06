//! Error types for wikiqa.
//!
//! One enum covers every failure category in the pipeline: configuration,
//! language-model calls, knowledge-source calls, and the wrapped
//! processing failure surfaced to callers of the orchestrator.

use thiserror::Error;

/// Unified error type for wikiqa.
///
/// All fallible functions return `Result<T, AppError>`.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// LLM provider transport or API errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Knowledge-source search or transport errors
    #[error("Search failed: {0}")]
    Search(String),

    /// The knowledge source has no page for this identifier
    #[error("Document not found: {0}")]
    DocumentNotFound(u64),

    /// Query formulation step failed
    #[error("Query formulation failed: {0}")]
    Formulation(String),

    /// Answer synthesis step failed
    #[error("Answer synthesis failed: {0}")]
    Synthesis(String),

    /// Prompt template errors
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Top-level pipeline failure. The message is safe to show to users.
    #[error("{0}")]
    Processing(String),

    /// Caller supplied unusable input
    #[error("{0}")]
    InvalidInput(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Whether this error was caused by the caller rather than the system.
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::InvalidInput(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
