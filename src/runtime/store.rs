//! In-memory conversation store keyed by thread id

use crate::state_machine::ConversationState;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;

/// Shared handle to one thread's state. Holding the lock for a whole turn
/// serializes turns on that thread.
pub type ThreadHandle = Arc<Mutex<ConversationState>>;

struct Entry {
    handle: ThreadHandle,
    last_used: Instant,
}

/// Map of live threads
#[derive(Default)]
pub struct ThreadStore {
    threads: RwLock<HashMap<String, Entry>>,
}

impl ThreadStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty thread under a fresh id
    pub async fn create(&self) -> (String, ThreadHandle) {
        let id = uuid::Uuid::new_v4().to_string();
        let handle: ThreadHandle = Arc::new(Mutex::new(ConversationState::new()));
        self.threads.write().await.insert(
            id.clone(),
            Entry {
                handle: Arc::clone(&handle),
                last_used: Instant::now(),
            },
        );
        (id, handle)
    }

    /// Look up a thread and mark it as used
    pub async fn get(&self, thread_id: &str) -> Option<ThreadHandle> {
        let mut threads = self.threads.write().await;
        let entry = threads.get_mut(thread_id)?;
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.handle))
    }

    /// Drop a thread. Returns false if it did not exist.
    pub async fn remove(&self, thread_id: &str) -> bool {
        self.threads.write().await.remove(thread_id).is_some()
    }

    /// Drop threads not looked up for longer than `max_idle` as of `now`.
    /// A thread whose turn is still running is kept.
    pub async fn evict_idle(&self, now: Instant, max_idle: Duration) -> usize {
        let mut threads = self.threads.write().await;
        let before = threads.len();
        threads.retain(|_, entry| {
            now.saturating_duration_since(entry.last_used) <= max_idle
                || entry.handle.try_lock().is_err()
        });
        before - threads.len()
    }

    pub async fn len(&self) -> usize {
        self.threads.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state_machine::Message;

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = ThreadStore::new();
        let (id, handle) = store.create().await;
        handle.lock().await.messages.push(Message::user("hi"));

        let fetched = store.get(&id).await.unwrap();
        assert_eq!(fetched.lock().await.messages.len(), 1);

        assert!(store.remove(&id).await);
        assert!(!store.remove(&id).await);
        assert!(store.get(&id).await.is_none());
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = ThreadStore::new();
        let (a, _) = store.create().await;
        let (b, _) = store.create().await;
        assert_ne!(a, b);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_idle_threads_are_evicted() {
        let store = ThreadStore::new();
        let ttl = Duration::from_secs(60);
        let (stale, _) = store.create().await;
        let (fresh, _) = store.create().await;

        assert_eq!(store.evict_idle(Instant::now(), ttl).await, 0);

        let later = Instant::now() + Duration::from_secs(120);
        // Simulate recent use of one thread
        store.threads.write().await.get_mut(&fresh).unwrap().last_used = later;

        assert_eq!(store.evict_idle(later, ttl).await, 1);
        assert!(store.get(&stale).await.is_none());
        assert!(store.get(&fresh).await.is_some());
    }

    #[tokio::test]
    async fn test_busy_thread_survives_eviction() {
        let store = ThreadStore::new();
        let (id, handle) = store.create().await;
        let turn = handle.lock().await;

        let later = Instant::now() + Duration::from_secs(3600);
        assert_eq!(store.evict_idle(later, Duration::from_secs(1)).await, 0);
        assert_eq!(store.len().await, 1);
        drop(turn);
        assert_eq!(store.evict_idle(later, Duration::from_secs(1)).await, 1);
        assert!(store.get(&id).await.is_none());
    }
}
