//! Prompt templates for the two language-model steps.
//!
//! Templates are Handlebars strings rendered with HTML escaping disabled;
//! questions and page extracts are plain text.

use handlebars::Handlebars;
use serde_json::json;
use wikiqa_core::{AppError, AppResult};

const FORMULATE_SYSTEM: &str = "formulate.system";
const FORMULATE_USER: &str = "formulate.user";
const SYNTHESIZE_SYSTEM: &str = "synthesize.system";
const SYNTHESIZE_USER: &str = "synthesize.user";

const TEMPLATES: [(&str, &str); 4] = [
    (
        FORMULATE_SYSTEM,
        "You are a helpful assistant that generates {{source}} search queries. \
         Given a question, extract the key topics or entities that should be searched on {{source}}. \
         Return only the search query, nothing else.",
    ),
    (
        FORMULATE_USER,
        "Question: {{question}}\n\nGenerate a {{source}} search query:",
    ),
    (
        SYNTHESIZE_SYSTEM,
        "You are a helpful assistant that answers questions based on {{source}} content. \
         Provide accurate, factual answers using only the information provided. \
         If the information is insufficient, say so. \
         Keep your answer concise but informative.",
    ),
    (
        SYNTHESIZE_USER,
        "Question: {{question}}\n\n{{source}} Content:\n{{context}}\n\n\
         Answer the question based on the above {{source}} content:",
    ),
];

/// A rendered system + user message pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Registry of the pipeline's prompt templates.
pub struct PromptTemplates {
    registry: Handlebars<'static>,
}

impl std::fmt::Debug for PromptTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptTemplates").finish_non_exhaustive()
    }
}

impl PromptTemplates {
    pub fn new() -> AppResult<Self> {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        registry.set_strict_mode(true);

        for (name, template) in TEMPLATES {
            registry
                .register_template_string(name, template)
                .map_err(|e| AppError::Prompt(format!("Failed to register template {}: {}", name, e)))?;
        }

        Ok(Self { registry })
    }

    /// Prompt asking the model to turn `question` into a search query.
    pub fn formulate(&self, question: &str, source: &str) -> AppResult<RenderedPrompt> {
        let data = json!({ "question": question, "source": source });
        Ok(RenderedPrompt {
            system: self.render(FORMULATE_SYSTEM, &data)?,
            user: self.render(FORMULATE_USER, &data)?,
        })
    }

    /// Prompt asking the model to answer `question` from `context` only.
    pub fn synthesize(&self, question: &str, source: &str, context: &str) -> AppResult<RenderedPrompt> {
        let data = json!({ "question": question, "source": source, "context": context });
        Ok(RenderedPrompt {
            system: self.render(SYNTHESIZE_SYSTEM, &data)?,
            user: self.render(SYNTHESIZE_USER, &data)?,
        })
    }

    fn render(&self, name: &str, data: &serde_json::Value) -> AppResult<String> {
        self.registry
            .render(name, data)
            .map_err(|e| AppError::Prompt(format!("Failed to render template {}: {}", name, e)))
    }
}
