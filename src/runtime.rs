//! Runtime for executing conversations
//!
//! Holds the per-thread state, runs turns through the conversation graph,
//! and hands transcripts to the report renderer.

mod graph;
mod session;
mod store;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use session::{spawn_idle_sweeper, SessionError, SessionManager, ThreadSnapshot, TurnOutcome};
pub use traits::*;
