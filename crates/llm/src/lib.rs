//! LLM integration crate for wikiqa.
//!
//! Provider-agnostic chat completions behind the [`LlmClient`] trait.
//!
//! # Providers
//! - **OpenAI**: Chat Completions API (default)
//! - **Ollama**: Local LLM runtime via `/api/chat`
//!
//! # Example
//! ```no_run
//! use wikiqa_llm::{LlmClient, LlmRequest, providers::OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new("sk-...");
//! let request = LlmRequest::new("Hello, world!", "gpt-3.5-turbo");
//! let response = client.complete(&request).await?;
//! println!("{}", response.text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod factory;
pub mod providers;

pub use client::{LlmClient, LlmRequest, LlmResponse, LlmUsage};
pub use factory::create_client;
pub use providers::{OllamaClient, OpenAiClient};
