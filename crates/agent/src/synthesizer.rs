//! Answer synthesis grounded in fetched documents.

use crate::prompt::PromptTemplates;
use std::sync::Arc;
use wikiqa_core::{AppError, AppResult};
use wikiqa_knowledge::DocumentContent;
use wikiqa_llm::{LlmClient, LlmRequest};

pub const SYNTHESIS_TEMPERATURE: f32 = 0.5;

pub const SYNTHESIS_MAX_TOKENS: u32 = 500;

/// Answer used when the model returns no content.
pub const NO_ANSWER: &str = "I couldn't generate an answer.";

/// Separates documents inside the grounding context.
pub const DOCUMENT_BOUNDARY: &str = "\n\n---\n\n";

/// Concatenate titles and extracts, in order, into one grounding context.
pub fn build_context(documents: &[DocumentContent]) -> String {
    documents
        .iter()
        .map(|doc| format!("Source: {}\n{}", doc.title, doc.extract))
        .collect::<Vec<_>>()
        .join(DOCUMENT_BOUNDARY)
}

/// Writes the final answer from the question and grounding documents.
pub struct AnswerSynthesizer {
    client: Arc<dyn LlmClient>,
    model: String,
    prompts: Arc<PromptTemplates>,
    source_name: String,
}

impl AnswerSynthesizer {
    pub fn new(
        client: Arc<dyn LlmClient>,
        model: impl Into<String>,
        prompts: Arc<PromptTemplates>,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            client,
            model: model.into(),
            prompts,
            source_name: source_name.into(),
        }
    }

    /// Answer `question` using only `documents`, which must be non-empty.
    pub async fn synthesize(&self, question: &str, documents: &[DocumentContent]) -> AppResult<String> {
        if documents.is_empty() {
            return Err(AppError::Synthesis(
                "no documents to ground the answer in".to_string(),
            ));
        }

        let context = build_context(documents);
        tracing::debug!(
            documents = documents.len(),
            context_bytes = context.len(),
            "Built grounding context"
        );

        let prompt = self
            .prompts
            .synthesize(question, &self.source_name, &context)
            .map_err(|e| AppError::Synthesis(e.to_string()))?;

        let request = LlmRequest::new(prompt.user, &self.model)
            .with_system(prompt.system)
            .with_temperature(SYNTHESIS_TEMPERATURE)
            .with_max_tokens(SYNTHESIS_MAX_TOKENS);

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| AppError::Synthesis(e.to_string()))?;

        Ok(response
            .text()
            .map(str::to_string)
            .unwrap_or_else(|| NO_ANSWER.to_string()))
    }
}
