//! Core conversation graph
//!
//! Three nodes (counting, responding, ending) and one decision point.
//! Every step is a pure function of the state it is handed.

pub mod state;
pub mod transition;

#[cfg(test)]
mod proptests;

pub use state::{ConversationState, Message, Node, Role, FAREWELL_MESSAGE, MAX_USER_MESSAGES};
pub use transition::{count_messages, end_conversation, respond, should_continue, Branch};
