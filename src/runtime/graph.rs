//! Conversation graph runner
//!
//! Drives one turn through counting, the branch decision, and either the
//! responding or ending node. The only I/O is the adapter call made from the
//! responding node.

use super::traits::LlmClient;
use crate::llm::LlmError;
use crate::state_machine::{
    count_messages, end_conversation, respond, should_continue, Branch, ConversationState,
    Message, Node,
};
use thiserror::Error;

/// The language model did not return a usable reply
#[derive(Debug, Clone, Error)]
#[error("Language model call failed: {0}")]
pub struct AdapterFailure(#[from] pub LlmError);

/// Runs single turns of the conversation graph
pub struct ConversationGraph<L: LlmClient> {
    llm_client: L,
}

impl<L: LlmClient> ConversationGraph<L> {
    pub fn new(llm_client: L) -> Self {
        Self { llm_client }
    }

    pub fn llm_client(&self) -> &L {
        &self.llm_client
    }

    /// Run one turn. The input state is never modified; on adapter failure
    /// the caller still holds the last good state.
    pub async fn run(
        &self,
        thread_id: &str,
        state: &ConversationState,
        message: Message,
    ) -> Result<ConversationState, AdapterFailure> {
        let counted = count_messages(state.clone(), message);
        let branch = should_continue(&counted);
        let next = branch.next_node();

        tracing::debug!(
            thread_id = %thread_id,
            from = Node::Counting.name(),
            to = next.name(),
            user_message_count = counted.user_message_count,
            "Graph transition"
        );

        match branch {
            Branch::End => {
                tracing::info!(thread_id = %thread_id, "Turn limit reached, ending conversation");
                Ok(end_conversation(counted))
            }
            Branch::Continue => {
                let reply = self
                    .llm_client
                    .complete(&counted.messages)
                    .await
                    .map_err(|e| {
                        tracing::warn!(
                            thread_id = %thread_id,
                            model = %self.llm_client.model_id(),
                            error = %e,
                            kind = e.kind.as_str(),
                            transient = e.kind.is_transient(),
                            "Adapter failed during responding node"
                        );
                        AdapterFailure(e)
                    })?;
                Ok(respond(counted, reply.content))
            }
        }
    }
}
