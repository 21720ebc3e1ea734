//! Pure steps of the conversation graph
//!
//! Each function takes the state by value and returns the next state. None
//! of them perform I/O; the language-model call is made by the graph runner
//! between `should_continue` and `respond`.

use super::state::{count_user_messages, ConversationState, Message, Node, MAX_USER_MESSAGES};

/// Outcome of the branch decision after counting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Branch {
    Continue,
    End,
}

impl Branch {
    /// Node the graph visits next
    pub fn next_node(self) -> Node {
        match self {
            Branch::Continue => Node::Responding,
            Branch::End => Node::Ending,
        }
    }
}

/// Counting node: append the user message and recount from the full history.
///
/// The count is recomputed rather than incremented so that a history that
/// was trimmed or replayed is always reflected accurately.
pub fn count_messages(mut state: ConversationState, message: Message) -> ConversationState {
    state.messages.push(message);
    state.user_message_count = count_user_messages(&state.messages);
    state
}

/// Branch decision: end once the turn limit has been reached
pub fn should_continue(state: &ConversationState) -> Branch {
    if state.user_message_count >= MAX_USER_MESSAGES {
        Branch::End
    } else {
        Branch::Continue
    }
}

/// Responding node: record the model's reply as an assistant message
pub fn respond(mut state: ConversationState, reply: String) -> ConversationState {
    state.messages.push(Message::assistant(reply));
    state
}

/// Ending node: record the fixed farewell
pub fn end_conversation(mut state: ConversationState) -> ConversationState {
    state.messages.push(Message::farewell());
    state
}
