//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the conversation graph with mock
//! implementations.

use crate::llm::{LlmError, LlmMessage, LlmRequest, ModelRegistry};
use crate::state_machine::{Message, Role};
use async_trait::async_trait;
use std::sync::Arc;

/// Client for getting the next assistant reply
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Produce one reply for the full history. Called once per turn.
    async fn complete(&self, history: &[Message]) -> Result<Message, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: LlmClient + ?Sized> LlmClient for Arc<T> {
    async fn complete(&self, history: &[Message]) -> Result<Message, LlmError> {
        (**self).complete(history).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use `ModelRegistry` as `LlmClient`
pub struct RegistryLlmClient {
    registry: Arc<ModelRegistry>,
    model_id: String,
}

impl RegistryLlmClient {
    pub fn new(registry: Arc<ModelRegistry>, model_id: String) -> Self {
        Self { registry, model_id }
    }

    /// Client bound to the registry's default model
    pub fn with_default_model(registry: Arc<ModelRegistry>) -> Self {
        let model_id = registry.default_model_id().to_string();
        Self::new(registry, model_id)
    }
}

/// Translate conversation history into provider messages
pub fn build_llm_request(history: &[Message]) -> LlmRequest {
    LlmRequest {
        messages: history
            .iter()
            .map(|m| match m.role {
                Role::User => LlmMessage::user(m.content.clone()),
                Role::Assistant => LlmMessage::assistant(m.content.clone()),
            })
            .collect(),
        ..LlmRequest::default()
    }
}

#[async_trait]
impl LlmClient for RegistryLlmClient {
    async fn complete(&self, history: &[Message]) -> Result<Message, LlmError> {
        let llm = self
            .registry
            .get(&self.model_id)
            .or_else(|| self.registry.default())
            .ok_or_else(|| LlmError::auth("No LLM available. Set GEMINI_API_KEY or LLM_GATEWAY."))?;

        let response = llm.complete(&build_llm_request(history)).await?;
        if response.is_blank() {
            return Err(LlmError::unknown("Model returned an empty reply"));
        }
        Ok(Message::assistant(response.text()))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
