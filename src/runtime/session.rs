//! Session host: thread lifecycle, turns, resets and report downloads

use super::graph::{AdapterFailure, ConversationGraph};
use super::store::{ThreadHandle, ThreadStore};
use super::traits::LlmClient;
use crate::report::{RenderError, ReportRenderer};
use crate::state_machine::{ConversationState, Message, MAX_USER_MESSAGES};
use chrono::Local;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// Errors surfaced to the end user. None of them end the session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Unknown thread: {0}")]
    ThreadNotFound(String),
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("Conversation ended - max messages reached. Reset to start a new one.")]
    ConversationEnded,
    #[error(transparent)]
    Adapter(#[from] AdapterFailure),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Point-in-time view of a thread
#[derive(Debug, Clone, Serialize)]
pub struct ThreadSnapshot {
    pub thread_id: String,
    pub messages: Vec<Message>,
    pub total_messages: usize,
    pub user_message_count: usize,
    pub max_user_messages: usize,
    pub remaining_turns: usize,
    pub ended: bool,
}

impl ThreadSnapshot {
    fn of(thread_id: &str, state: &ConversationState) -> Self {
        Self {
            thread_id: thread_id.to_string(),
            messages: state.messages.clone(),
            total_messages: state.messages.len(),
            user_message_count: state.user_message_count,
            max_user_messages: MAX_USER_MESSAGES,
            remaining_turns: state.remaining_turns(),
            ended: state.is_ended(),
        }
    }
}

/// Result of an accepted user turn
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    /// Newest assistant message (model reply or farewell)
    pub reply: Message,
    pub thread: ThreadSnapshot,
}

/// A rendered transcript ready for download
#[derive(Debug, Clone)]
pub struct Report {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub content_type: &'static str,
}

/// Owns every thread and runs turns against the conversation graph
pub struct SessionManager {
    store: ThreadStore,
    graph: ConversationGraph<Arc<dyn LlmClient>>,
    renderer: Arc<dyn ReportRenderer>,
}

impl SessionManager {
    pub fn new(llm_client: Arc<dyn LlmClient>, renderer: Arc<dyn ReportRenderer>) -> Self {
        Self {
            store: ThreadStore::new(),
            graph: ConversationGraph::new(llm_client),
            renderer,
        }
    }

    pub fn model_id(&self) -> &str {
        self.graph.llm_client().model_id()
    }

    pub async fn create_thread(&self) -> ThreadSnapshot {
        let (thread_id, handle) = self.store.create().await;
        tracing::info!(thread_id = %thread_id, "Created thread");
        let state = handle.lock().await;
        ThreadSnapshot::of(&thread_id, &state)
    }

    pub async fn snapshot(&self, thread_id: &str) -> Result<ThreadSnapshot, SessionError> {
        let handle = self.handle(thread_id).await?;
        let state = handle.lock().await;
        Ok(ThreadSnapshot::of(thread_id, &state))
    }

    /// Run one user turn. The thread's lock is held for the whole turn, so
    /// turns on the same thread never overlap. On failure the stored state
    /// is left exactly as it was before the call.
    pub async fn send_message(
        &self,
        thread_id: &str,
        text: &str,
    ) -> Result<TurnOutcome, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }

        let handle = self.handle(thread_id).await?;
        let mut state = handle.lock().await;

        if state.is_ended() {
            return Err(SessionError::ConversationEnded);
        }

        let next = self
            .graph
            .run(thread_id, &state, Message::user(text))
            .await?;
        *state = next;

        let reply = state
            .latest_reply()
            .cloned()
            .unwrap_or_else(Message::farewell);

        tracing::info!(
            thread_id = %thread_id,
            user_message_count = state.user_message_count,
            ended = state.is_ended(),
            "Turn completed"
        );

        Ok(TurnOutcome {
            reply,
            thread: ThreadSnapshot::of(thread_id, &state),
        })
    }

    /// Discard a thread and start a new empty one under a fresh id. An
    /// unknown id still yields a fresh thread.
    pub async fn reset(&self, thread_id: &str) -> ThreadSnapshot {
        if !self.store.remove(thread_id).await {
            tracing::debug!(thread_id = %thread_id, "Reset of unknown thread");
        }
        let snapshot = self.create_thread().await;
        tracing::info!(old = %thread_id, new = %snapshot.thread_id, "Thread reset");
        snapshot
    }

    /// Render the thread's transcript. Reads the state without changing it.
    pub async fn render_report(&self, thread_id: &str) -> Result<Report, SessionError> {
        let handle = self.handle(thread_id).await?;
        let (messages, user_message_count) = {
            let state = handle.lock().await;
            (state.messages.clone(), state.user_message_count)
        };

        let bytes = self
            .renderer
            .render(&messages, user_message_count)
            .inspect_err(|e| tracing::error!(thread_id = %thread_id, error = %e, "Report rendering failed"))?;

        Ok(Report {
            bytes,
            filename: format!(
                "conversation_summary_{}.{}",
                Local::now().format("%Y%m%d_%H%M%S"),
                self.renderer.file_extension()
            ),
            content_type: self.renderer.content_type(),
        })
    }

    /// Drop threads nobody has touched for `max_idle`
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let evicted = self.store.evict_idle(Instant::now(), max_idle).await;
        if evicted > 0 {
            let remaining = self.store.len().await;
            tracing::info!(evicted, remaining, "Evicted idle threads");
        }
        evicted
    }

    async fn handle(&self, thread_id: &str) -> Result<ThreadHandle, SessionError> {
        self.store
            .get(thread_id)
            .await
            .ok_or_else(|| SessionError::ThreadNotFound(thread_id.to_string()))
    }
}

/// Periodically evict idle threads so abandoned sessions do not pile up
pub fn spawn_idle_sweeper(
    sessions: Arc<SessionManager>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    let period = (max_idle / 4).max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            sessions.evict_idle(max_idle).await;
        }
    })
}
