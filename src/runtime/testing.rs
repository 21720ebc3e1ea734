//! Mock implementations for testing
//!
//! These mocks enable integration testing without real I/O.

use super::traits::LlmClient;
use crate::llm::LlmError;
use crate::report::{RenderError, ReportRenderer};
use crate::state_machine::Message;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

// ============================================================================
// Mock LLM Client
// ============================================================================

/// Mock LLM client that returns queued replies
pub struct MockLlmClient {
    replies: Mutex<VecDeque<Result<Message, LlmError>>>,
    /// Echo the latest user message when nothing is queued
    echo_when_empty: bool,
    delay: Option<Duration>,
    /// Record of every history the client was called with
    histories: Mutex<Vec<Vec<Message>>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            echo_when_empty: false,
            delay: None,
            histories: Mutex::new(Vec::new()),
        }
    }

    /// Client that answers `Echo: <text>` to anything not explicitly queued
    pub fn echoing() -> Self {
        Self {
            echo_when_empty: true,
            ..Self::new()
        }
    }

    /// Sleep before answering (for serialization tests)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: &str) {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(Message::assistant(text)));
    }

    /// Queue an error
    pub fn queue_error(&self, error: LlmError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    pub fn recorded_histories(&self) -> Vec<Vec<Message>> {
        self.histories.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.histories.lock().unwrap().len()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, history: &[Message]) -> Result<Message, LlmError> {
        self.histories.lock().unwrap().push(history.to_vec());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let queued = self.replies.lock().unwrap().pop_front();
        match queued {
            Some(result) => result,
            None if self.echo_when_empty => {
                let last = history.iter().rev().find(|m| m.is_user());
                Ok(Message::assistant(format!(
                    "Echo: {}",
                    last.map_or("", |m| m.content.as_str())
                )))
            }
            None => Err(LlmError::network("No mock response queued")),
        }
    }

    fn model_id(&self) -> &str {
        "mock-model"
    }
}

// ============================================================================
// Failing Renderer
// ============================================================================

/// Renderer that always fails
pub struct FailingRenderer;

impl ReportRenderer for FailingRenderer {
    fn render(&self, _messages: &[Message], _user_message_count: usize) -> Result<Vec<u8>, RenderError> {
        Err(RenderError::Pdf("renderer unavailable".to_string()))
    }
}
