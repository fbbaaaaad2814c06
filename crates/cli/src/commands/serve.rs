//! Serve command handler.
//!
//! Exposes the agent over HTTP: `POST /api/agent` answers one question,
//! `GET /health` reports liveness.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Args;
use serde_json::{json, Value};
use std::sync::Arc;
use wikiqa_agent::{validate_question, Agent};
use wikiqa_core::{config::AppConfig, AppError, AppResult};

/// Serve the agent over HTTP
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:3000")]
    pub bind: String,
}

/// Shared handler state.
///
/// `agent` is `None` when the LLM credential is missing; requests are then
/// answered with `unavailable` instead of failing at startup.
pub struct ServeState {
    agent: Option<Arc<Agent>>,
    unavailable: String,
}

impl ServeState {
    pub fn ready(agent: Arc<Agent>) -> Self {
        Self {
            agent: Some(agent),
            unavailable: String::new(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            agent: None,
            unavailable: message.into(),
        }
    }

    /// Build state from configuration.
    ///
    /// A missing credential is deferred to request time. Every other
    /// configuration problem fails startup.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        if AppConfig::requires_api_key(&config.provider)
            && config.resolve_api_key(&config.provider).is_none()
        {
            let message = missing_key_message(&config.provider);
            tracing::warn!(provider = %config.provider, "{}", message);
            return Ok(Self::unavailable(message));
        }

        Ok(Self::ready(Arc::new(Agent::from_config(config)?)))
    }
}

impl ServeCommand {
    /// Execute the serve command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing serve command");

        let state = Arc::new(ServeState::from_config(config)?);
        let app = router(state);

        let listener = tokio::net::TcpListener::bind(&self.bind).await?;
        tracing::info!(bind = %self.bind, "wikiqa API listening");

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the HTTP router.
pub fn router(state: Arc<ServeState>) -> Router {
    Router::new()
        .route("/api/agent", post(agent_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

async fn agent_handler(State(state): State<Arc<ServeState>>, body: Bytes) -> Response {
    let question = match extract_question(&body).map(|q| validate_question(&q).map(str::to_string)) {
        Some(Ok(question)) => question,
        Some(Err(e)) => return error_response(&e),
        None => {
            return error_response(&AppError::InvalidInput(
                "Please provide a valid question.".to_string(),
            ))
        }
    };

    let Some(agent) = state.agent.as_ref() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": state.unavailable })),
        )
            .into_response();
    };

    match agent.process_question(&question).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(&e),
    }
}

/// Pull a string `question` out of a JSON request body.
fn extract_question(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("question")?.as_str().map(str::to_string)
}

fn status_for(err: &AppError) -> StatusCode {
    if err.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(err: &AppError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "Request failed");
    } else {
        tracing::debug!(error = %err, "Rejected request");
    }
    (status, Json(json!({ "error": err.to_string() }))).into_response()
}

fn missing_key_message(provider: &str) -> String {
    let label = if provider.eq_ignore_ascii_case("openai") {
        "OpenAI"
    } else {
        provider
    };
    format!("{} API key is not configured.", label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wikiqa_knowledge::{DocumentContent, MockKnowledgeSource, SearchResult};
    use wikiqa_llm::{LlmClient, LlmRequest, LlmResponse};

    struct EchoLlm;

    #[async_trait::async_trait]
    impl LlmClient for EchoLlm {
        fn provider_name(&self) -> &str {
            "echo"
        }

        async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
            let content = if request.max_tokens == Some(wikiqa_agent::formulator::FORMULATION_MAX_TOKENS) {
                "Eiffel Tower"
            } else {
                "A wrought-iron lattice tower in Paris."
            };
            Ok(LlmResponse::new(Some(content.to_string()), &request.model))
        }
    }

    fn ready_state(source: MockKnowledgeSource) -> Arc<ServeState> {
        let agent = Agent::new(Arc::new(EchoLlm), "gpt-3.5-turbo", Arc::new(source)).unwrap();
        Arc::new(ServeState::ready(Arc::new(agent)))
    }

    async fn post(state: Arc<ServeState>, body: &str) -> (StatusCode, Value) {
        let response = agent_handler(State(state), Bytes::from(body.to_string())).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_extract_question() {
        assert_eq!(
            extract_question(br#"{"question": "Who?"}"#),
            Some("Who?".to_string())
        );
        assert_eq!(extract_question(br#"{"question": 42}"#), None);
        assert_eq!(extract_question(br#"{"q": "Who?"}"#), None);
        assert_eq!(extract_question(b"not json"), None);
        assert_eq!(extract_question(b""), None);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&AppError::InvalidInput("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&AppError::Processing("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_for(&AppError::Config("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_missing_key_message() {
        assert_eq!(
            missing_key_message("openai"),
            "OpenAI API key is not configured."
        );
    }

    #[tokio::test]
    async fn test_invalid_questions_are_bad_requests() {
        let state = ready_state(MockKnowledgeSource::new());

        for body in [r#"{"question": "   "}"#, r#"{"question": 7}"#, r#"{}"#, "garbage"] {
            let (status, value) = post(state.clone(), body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert_eq!(value["error"], "Please provide a valid question.");
        }
    }

    #[tokio::test]
    async fn test_missing_credential_is_server_error() {
        let state = Arc::new(ServeState::unavailable(missing_key_message("openai")));
        let (status, value) = post(state, r#"{"question": "What is the Eiffel Tower?"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], "OpenAI API key is not configured.");
    }

    #[tokio::test]
    async fn test_answers_question() {
        let source = MockKnowledgeSource::new()
            .with_search_results(vec![SearchResult::new(1, "Eiffel Tower")])
            .with_document(
                1,
                DocumentContent::new(
                    "Eiffel Tower",
                    "A wrought-iron lattice tower on the Champ de Mars in Paris.",
                    "https://en.wikipedia.org/wiki/Eiffel_Tower",
                ),
            );

        let (status, value) = post(
            ready_state(source),
            r#"{"question": "What is the Eiffel Tower?"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["sources"][0], "https://en.wikipedia.org/wiki/Eiffel_Tower");
        assert!(!value["answer"].as_str().unwrap().is_empty());
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_pipeline_failure_is_generic_server_error() {
        let source = MockKnowledgeSource::new().with_search_error("search backend down");
        let (status, value) = post(ready_state(source), r#"{"question": "Anything?"}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value["error"], wikiqa_agent::PROCESSING_FAILURE_MESSAGE);
    }
}
