//! OpenAI Chat Completions provider.
//!
//! API: https://platform.openai.com/docs/api-reference/chat

use crate::client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
use serde::{Deserialize, Serialize};
use wikiqa_core::{AppError, AppResult};

const OPENAI_API_URL: &str = "https://api.openai.com/v1";

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

/// OpenAI LLM client.
pub struct OpenAiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, OPENAI_API_URL)
    }

    /// Create a client against an OpenAI-compatible endpoint.
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn to_chat_request(&self, request: &LlmRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(ref system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt.clone(),
        });

        ChatCompletionRequest {
            model: request.model.clone(),
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }

    /// Take the first choice's content; anything missing becomes `None`.
    fn convert_response(&self, response: ChatCompletionResponse, requested_model: &str) -> LlmResponse {
        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);

        let usage = response
            .usage
            .map(|u| LlmUsage::new(u.prompt_tokens, u.completion_tokens))
            .unwrap_or_default();

        LlmResponse {
            content,
            model: response.model.unwrap_or_else(|| requested_model.to_string()),
            usage,
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAiClient {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        tracing::debug!(model = %request.model, "OpenAI chat request");

        let url = format!("{}/chat/completions", self.base_url);
        let chat_request = self.to_chat_request(request);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to send request to OpenAI: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Llm(format!(
                "OpenAI API error ({}): {}",
                status, error_text
            )));
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Llm(format!("Failed to parse OpenAI response: {}", e)))?;

        let converted = self.convert_response(chat_response, &request.model);
        tracing::debug!(
            model = %converted.model,
            total_tokens = converted.usage.total_tokens,
            has_content = converted.text().is_some(),
            "OpenAI chat response"
        );

        Ok(converted)
    }
}
