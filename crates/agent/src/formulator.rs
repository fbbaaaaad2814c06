//! Query formulation: question in, compact search query out.

use crate::prompt::PromptTemplates;
use std::sync::Arc;
use wikiqa_core::{AppError, AppResult};
use wikiqa_llm::{LlmClient, LlmRequest};

/// Low temperature keeps the extraction literal.
pub const FORMULATION_TEMPERATURE: f32 = 0.3;

pub const FORMULATION_MAX_TOKENS: u32 = 50;

/// Turns a natural-language question into a search-engine query.
pub struct QueryFormulator {
    client: Arc<dyn LlmClient>,
    model: String,
    prompts: Arc<PromptTemplates>,
    source_name: String,
}

impl QueryFormulator {
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

    /// Derive a search query for `question`.
    ///
    /// Falls back to the question verbatim when the model returns nothing
    /// usable. Provider failures become `AppError::Formulation`.
    pub async fn formulate(&self, question: &str) -> AppResult<String> {
        let prompt = self
            .prompts
            .formulate(question, &self.source_name)
            .map_err(|e| AppError::Formulation(e.to_string()))?;

        let request = LlmRequest::new(prompt.user, &self.model)
            .with_system(prompt.system)
            .with_temperature(FORMULATION_TEMPERATURE)
            .with_max_tokens(FORMULATION_MAX_TOKENS);

        let response = self
            .client
            .complete(&request)
            .await
            .map_err(|e| AppError::Formulation(e.to_string()))?;

        match response.text() {
            Some(query) => Ok(query.to_string()),
            None => {
                tracing::debug!("Model returned no query, searching with the question itself");
                Ok(question.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, ScriptedLlm};

    fn formulator(llm: Arc<ScriptedLlm>) -> QueryFormulator {
        QueryFormulator::new(
            llm,
            "gpt-3.5-turbo",
            Arc::new(PromptTemplates::new().unwrap()),
            "Wikipedia",
        )
    }

    #[tokio::test]
    async fn test_uses_trimmed_model_output() {
        let llm = Arc::new(ScriptedLlm::new([Reply::Text("  Eiffel Tower\n")]));
        let query = formulator(llm.clone())
            .formulate("What is the Eiffel Tower?")
            .await
            .unwrap();

        assert_eq!(query, "Eiffel Tower");

        let requests = llm.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].temperature, Some(FORMULATION_TEMPERATURE));
        assert_eq!(requests[0].max_tokens, Some(FORMULATION_MAX_TOKENS));
        assert!(requests[0].prompt.contains("What is the Eiffel Tower?"));
        assert!(requests[0].system.is_some());
    }

    #[tokio::test]
    async fn test_falls_back_to_question() {
        let question = "Who was Albert Einstein?";

        let llm = Arc::new(ScriptedLlm::new([Reply::Empty]));
        assert_eq!(formulator(llm).formulate(question).await.unwrap(), question);

        let llm = Arc::new(ScriptedLlm::new([Reply::Text("   ")]));
        assert_eq!(formulator(llm).formulate(question).await.unwrap(), question);
    }

    #[tokio::test]
    async fn test_provider_failure_is_formulation_error() {
        let llm = Arc::new(ScriptedLlm::new([Reply::Fail("connection refused")]));
        let result = formulator(llm).formulate("anything").await;

        match result {
            Err(AppError::Formulation(msg)) => assert!(msg.contains("connection refused")),
            other => panic!("Expected formulation error, got {:?}", other),
        }
    }
}
