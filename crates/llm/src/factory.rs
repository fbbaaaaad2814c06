//! LLM provider factory.
//!
//! Builds an [`LlmClient`] from a provider name, an optional endpoint and an
//! optional API key. Secret lookup happens in `wikiqa_core::AppConfig`.

use crate::client::LlmClient;
use crate::providers::{OllamaClient, OpenAiClient};
use std::sync::Arc;
use wikiqa_core::{AppError, AppResult};

/// Create an LLM client based on the provider name.
///
/// # Arguments
/// * `provider` - Provider identifier ("openai", "ollama")
/// * `endpoint` - Optional custom endpoint URL
/// * `api_key` - API key, required for "openai"
///
/// # Errors
/// Returns `AppError::Config` if the provider is unknown or its key is missing.
pub fn create_client(
    provider: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
) -> AppResult<Arc<dyn LlmClient>> {
    match provider.to_lowercase().as_str() {
        "openai" => {
            let api_key = api_key
                .filter(|key| !key.trim().is_empty())
                .ok_or_else(|| AppError::Config("OpenAI provider requires API key".to_string()))?;
            let client = match endpoint {
                Some(url) => OpenAiClient::with_base_url(api_key, url),
                None => OpenAiClient::new(api_key),
            };
            Ok(Arc::new(client))
        }
        "ollama" => {
            let client = match endpoint {
                Some(url) => OllamaClient::with_base_url(url),
                None => OllamaClient::new(),
            };
            Ok(Arc::new(client))
        }
        _ => Err(AppError::Config(format!("Unknown provider: {}", provider))),
    }
}
