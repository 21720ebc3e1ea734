//! API request and response types

use crate::runtime::{ThreadSnapshot, TurnOutcome};
use crate::state_machine::Message;
use serde::{Deserialize, Serialize};

/// Request to send a chat message
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub text: String,
}

/// Response with a single thread
#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub thread: ThreadSnapshot,
}

/// Response for an accepted chat turn
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: Message,
    pub thread: ThreadSnapshot,
}

impl From<TurnOutcome> for ChatResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            reply: outcome.reply,
            thread: outcome.thread,
        }
    }
}

/// Model information with metadata
#[derive(Debug, Serialize)]
pub struct ModelInfo {
    pub id: String,
    pub provider: String,
    pub description: String,
}

/// Response for model list
#[derive(Debug, Serialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelInfo>,
    pub default: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
