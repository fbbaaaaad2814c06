//! Pipeline orchestration.
//!
//! One call to [`Agent::process_question`] is an independent transaction:
//! formulate → search → fetch → synthesize. Each step is timed and traced
//! with `step`, `duration_ms` and `outcome` fields inside a `pipeline` span
//! tagged with a per-run id.

use crate::formulator::QueryFormulator;
use crate::prompt::PromptTemplates;
use crate::synthesizer::AnswerSynthesizer;
use crate::types::{reasoning_for, AgentResponse};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use wikiqa_core::{AppConfig, AppError, AppResult};
use wikiqa_knowledge::{fetch_all, KnowledgeSource, WikipediaClient};
use wikiqa_llm::{create_client, LlmClient};

/// Number of search results fetched per question.
pub const DEFAULT_TOP_K: u32 = 3;

/// The only failure message callers ever see.
pub const PROCESSING_FAILURE_MESSAGE: &str = "Failed to process your question. Please try again.";

const INVALID_QUESTION_MESSAGE: &str = "Please provide a valid question.";

/// Check a caller-supplied question and return it trimmed.
pub fn validate_question(question: &str) -> AppResult<&str> {
    let trimmed = question.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(INVALID_QUESTION_MESSAGE.to_string()));
    }
    Ok(trimmed)
}

/// Question-answering agent over a knowledge source.
pub struct Agent {
    formulator: QueryFormulator,
    synthesizer: AnswerSynthesizer,
    source: Arc<dyn KnowledgeSource>,
    top_k: u32,
}

impl Agent {
    /// Build an agent using one model for both language-model steps.
    pub fn new(
        llm: Arc<dyn LlmClient>,
        model: impl Into<String>,
        source: Arc<dyn KnowledgeSource>,
    ) -> AppResult<Self> {
        let model = model.into();
        let prompts = Arc::new(PromptTemplates::new()?);
        let source_name = source.name().to_string();

        Ok(Self {
            formulator: QueryFormulator::new(llm.clone(), &model, prompts.clone(), &source_name),
            synthesizer: AnswerSynthesizer::new(llm, &model, prompts, &source_name),
            source,
            top_k: DEFAULT_TOP_K,
        })
    }

    /// Build an agent from application configuration.
    ///
    /// Fails with `AppError::Config` if the provider is unknown or its
    /// credential is missing.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        config.validate()?;

        let api_key = config.resolve_api_key(&config.provider);
        let endpoint = config.provider_endpoint(&config.provider);
        let llm = create_client(&config.provider, endpoint.as_deref(), api_key.as_deref())?;
        let source = Arc::new(WikipediaClient::from_config(&config.knowledge)?);

        tracing::debug!(
            provider = %config.provider,
            model = %config.model,
            knowledge_api = %config.knowledge.api_url,
            top_k = config.knowledge.top_k,
            "Agent configured"
        );

        Ok(Self::new(llm, &config.model, source)?.with_top_k(config.knowledge.top_k))
    }

    /// Override how many search results are fetched (minimum 1).
    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Answer `question`, which the caller has already validated.
    ///
    /// Degraded outcomes (nothing found, nothing fetchable) are successful
    /// responses. Any step failure is logged and replaced by
    /// `AppError::Processing` carrying [`PROCESSING_FAILURE_MESSAGE`].
    pub async fn process_question(&self, question: &str) -> AppResult<AgentResponse> {
        let run_id = uuid::Uuid::new_v4();
        let span = tracing::info_span!("pipeline", %run_id);

        async {
            let started = Instant::now();
            match self.run(question).await {
                Ok(response) => {
                    tracing::info!(
                        outcome = response.outcome.as_str(),
                        sources = response.sources.len(),
                        duration_ms = started.elapsed().as_millis() as u64,
                        "Question processed"
                    );
                    Ok(response)
                }
                Err(e) => {
                    tracing::error!(error = %e, "Error processing question");
                    Err(AppError::Processing(PROCESSING_FAILURE_MESSAGE.to_string()))
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run(&self, question: &str) -> AppResult<AgentResponse> {
        let source_name = self.source.name();

        let query = timed_step("formulate", self.formulator.formulate(question), |_| "ok").await?;
        tracing::debug!(%query, "Formulated search query");
        let reasoning = reasoning_for(source_name, &query);

        let results = timed_step(
            "search",
            self.source.search(&query, self.top_k),
            |results| if results.is_empty() { "no_results" } else { "ok" },
        )
        .await?;

        if results.is_empty() {
            return Ok(AgentResponse::no_results(source_name, reasoning));
        }

        let document_ids: Vec<u64> = results.iter().map(|r| r.document_id).collect();
        let documents = timed_step(
            "fetch",
            async { Ok::<_, AppError>(fetch_all(self.source.as_ref(), &document_ids).await) },
            |documents| if documents.is_empty() { "content_unavailable" } else { "ok" },
        )
        .await?;

        if documents.is_empty() {
            return Ok(AgentResponse::content_unavailable(reasoning));
        }

        let answer = timed_step(
            "synthesize",
            self.synthesizer.synthesize(question, &documents),
            |_| "ok",
        )
        .await?;

        let sources = documents.into_iter().map(|doc| doc.url).collect();
        Ok(AgentResponse::completed(answer, sources, reasoning))
    }
}

/// Await one pipeline step and trace its name, duration and outcome.
async fn timed_step<T, F>(step: &'static str, fut: F, outcome: impl Fn(&T) -> &'static str) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let started = Instant::now();
    let result = fut.await;
    let duration_ms = started.elapsed().as_millis() as u64;

    match &result {
        Ok(value) => tracing::info!(step, duration_ms, outcome = outcome(value), "Pipeline step finished"),
        Err(e) => tracing::warn!(step, duration_ms, outcome = "error", error = %e, "Pipeline step failed"),
    }

    result
}
