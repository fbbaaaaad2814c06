//! Pipeline result types.

use serde::{Deserialize, Serialize};

/// How a pipeline run ended when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// An answer was synthesized from fetched documents
    #[default]
    Completed,
    /// The search returned no documents
    NoResultsFound,
    /// Documents were found but none could be fetched
    ContentUnavailable,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::NoResultsFound => "no_results_found",
            Self::ContentUnavailable => "content_unavailable",
        }
    }
}

/// Answer returned to callers of [`crate::Agent::process_question`].
///
/// Serializes to exactly `{answer, sources, reasoning}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Natural language answer, or an explanation when none could be given
    pub answer: String,

    /// Canonical URLs of the documents the answer was grounded in
    pub sources: Vec<String>,

    /// Which search query was derived from the question
    pub reasoning: String,

    /// Internal: terminal state of the run, not part of the wire format
    #[serde(skip)]
    pub outcome: Outcome,
}

impl AgentResponse {
    pub fn completed(answer: String, sources: Vec<String>, reasoning: String) -> Self {
        Self {
            answer,
            sources,
            reasoning,
            outcome: Outcome::Completed,
        }
    }

    /// Response when the search found nothing.
    pub fn no_results(source_name: &str, reasoning: String) -> Self {
        Self {
            answer: format!(
                "I couldn't find any relevant information on {} for your question. \
                 Please try rephrasing or asking something else.",
                source_name
            ),
            sources: Vec::new(),
            reasoning,
            outcome: Outcome::NoResultsFound,
        }
    }

    /// Response when pages were found but none could be fetched.
    pub fn content_unavailable(reasoning: String) -> Self {
        Self {
            answer: "I found relevant pages but couldn't retrieve their content. Please try again."
                .to_string(),
            sources: Vec::new(),
            reasoning,
            outcome: Outcome::ContentUnavailable,
        }
    }
}

/// Reasoning trace naming the derived query.
pub fn reasoning_for(source_name: &str, query: &str) -> String {
    format!(
        "I analyzed your question and decided to search {} for: \"{}\"",
        source_name, query
    )
}
