//! Question-answering pipeline for wikiqa.
//!
//! An [`Agent`] turns one question into an [`AgentResponse`]:
//! 1. [`QueryFormulator`] derives a search query with a language model
//! 2. the knowledge source is searched for the top-k pages
//! 3. all pages are fetched concurrently, failures dropped
//! 4. [`AnswerSynthesizer`] writes an answer grounded in the fetched pages

pub mod formulator;
pub mod orchestrator;
pub mod prompt;
pub mod synthesizer;
pub mod types;

#[cfg(test)]
mod test_support;

pub use formulator::QueryFormulator;
pub use orchestrator::{validate_question, Agent, DEFAULT_TOP_K, PROCESSING_FAILURE_MESSAGE};
pub use prompt::PromptTemplates;
pub use synthesizer::{build_context, AnswerSynthesizer, NO_ANSWER};
pub use types::{AgentResponse, Outcome};
