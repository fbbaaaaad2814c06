//! LLM client abstraction and request/response types.

use serde::{Deserialize, Serialize};
use wikiqa_core::AppResult;

/// Chat completion request: one system instruction plus one user message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    /// The user message sent to the model
    pub prompt: String,

    /// Model identifier (e.g., "gpt-3.5-turbo", "llama3.2")
    pub model: String,

    /// Maximum tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// System instruction (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

impl LlmRequest {
    /// Create a new LLM request with required fields.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
            system: None,
        }
    }

    /// Set the maximum tokens to generate.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the temperature for sampling.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the system instruction.
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// LLM completion response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    /// Generated text; `None` when the provider returned no message content
    pub content: Option<String>,

    /// Model that generated the response
    pub model: String,

    /// Usage statistics
    #[serde(default)]
    pub usage: LlmUsage,
}

impl LlmResponse {
    pub fn new(content: Option<String>, model: impl Into<String>) -> Self {
        Self {
            content,
            model: model.into(),
            usage: LlmUsage::default(),
        }
    }

    /// Trimmed content, or `None` if the model produced nothing usable.
    pub fn text(&self) -> Option<&str> {
        self.content
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// Token usage statistics.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct LlmUsage {
    #[serde(default)]
    pub prompt_tokens: u32,

    #[serde(default)]
    pub completion_tokens: u32,

    #[serde(default)]
    pub total_tokens: u32,
}

impl LlmUsage {
    /// Create usage stats from prompt and completion token counts.
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens.saturating_add(completion_tokens),
        }
    }
}

/// Trait for LLM providers.
///
/// Each call issues exactly one request; retries are left to callers.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the provider name (e.g., "openai", "ollama").
    fn provider_name(&self) -> &str;

    /// Perform a non-streaming chat completion.
    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse>;
}
