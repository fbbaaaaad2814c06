//! Scripted language model for pipeline tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use wikiqa_core::{AppError, AppResult};
use wikiqa_llm::{LlmClient, LlmRequest, LlmResponse};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(&'static str),
    /// A response with no message content
    Empty,
    /// A transport-style failure
    Fail(&'static str),
}

/// Answers `complete` calls from a queue and records every request.
#[derive(Debug, Default)]
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl ScriptedLlm {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl LlmClient for ScriptedLlm {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &LlmRequest) -> AppResult<LlmResponse> {
        self.requests.lock().unwrap().push(request.clone());

        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(Reply::Text(text)) => Ok(LlmResponse::new(Some(text.to_string()), &request.model)),
            Some(Reply::Empty) => Ok(LlmResponse::new(None, &request.model)),
            Some(Reply::Fail(message)) => Err(AppError::Llm(message.to_string())),
            None => Err(AppError::Llm("no scripted reply left".to_string())),
        }
    }
}
