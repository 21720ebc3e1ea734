//! Conversation state types

use serde::{Deserialize, Serialize};

/// Number of user messages after which the conversation ends
pub const MAX_USER_MESSAGES: usize = 5;

/// Fixed assistant message emitted when the turn limit is reached
pub const FAREWELL_MESSAGE: &str =
    "Thanks for chatting! You've hit the 5 message limit. 🛑 Download your summary below!";

// ============================================================================
// Messages
// ============================================================================

/// Author of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}

/// A single chat message. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn farewell() -> Self {
        Self::assistant(FAREWELL_MESSAGE)
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
}

/// Count user-authored messages in a history
pub fn count_user_messages(messages: &[Message]) -> usize {
    messages.iter().filter(|m| m.is_user()).count()
}

// ============================================================================
// Conversation State
// ============================================================================

/// Data carried through the conversation graph
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub messages: Vec<Message>,
    pub user_message_count: usize,
}

impl ConversationState {
    /// Empty state for a fresh thread
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the turn limit has been reached
    pub fn is_ended(&self) -> bool {
        self.user_message_count >= MAX_USER_MESSAGES
    }

    /// Most recent assistant message, if any
    pub fn latest_reply(&self) -> Option<&Message> {
        self.messages.iter().rev().find(|m| m.role == Role::Assistant)
    }

    /// Messages left before the conversation ends
    pub fn remaining_turns(&self) -> usize {
        MAX_USER_MESSAGES.saturating_sub(self.user_message_count)
    }
}

/// Nodes of the conversation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// Append the user message and recompute the count
    Counting,
    /// Ask the language model for a reply
    Responding,
    /// Emit the farewell without calling the model
    Ending,
}

impl Node {
    pub fn name(self) -> &'static str {
        match self {
            Node::Counting => "counting",
            Node::Responding => "responding",
            Node::Ending => "ending",
        }
    }
}
