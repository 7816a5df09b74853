use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use tracing::debug;

/// What `recall` returns for a user with no stored memory. Absence is valid
/// default state, not an error.
pub const NO_MEMORY_SENTINEL: &str = "No existing memory found.";

/// Key-value memory scoped by user identity: one free-text blob per user,
/// read whole and replaced whole. No versioning, no TTL.
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// The stored blob, if any.
    async fn get(&self, user_id: &str) -> Option<String>;

    /// Full replacement of the user's blob.
    async fn put(&self, user_id: &str, memory: String);

    /// Serialize a read-merge-write cycle for one user. Holding the guard
    /// blocks other writers for the same user_id only.
    async fn lock_user(&self, user_id: &str) -> OwnedMutexGuard<()>;

    /// The stored blob, or the sentinel default for an unknown user.
    async fn recall(&self, user_id: &str) -> String {
        self.get(user_id)
            .await
            .unwrap_or_else(|| NO_MEMORY_SENTINEL.to_string())
    }
}

/// Process-lifetime store; records vanish on exit.
pub struct InMemoryStore {
    blobs: RwLock<HashMap<String, String>>,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            user_locks: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemoryStore for InMemoryStore {
    async fn get(&self, user_id: &str) -> Option<String> {
        self.blobs.read().await.get(user_id).cloned()
    }

    async fn put(&self, user_id: &str, memory: String) {
        debug!(user_id, bytes = memory.len(), "memory blob replaced");
        self.blobs.write().await.insert(user_id.to_string(), memory);
    }

    async fn lock_user(&self, user_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut registry = self.user_locks.lock().await;
            Arc::clone(
                registry
                    .entry(user_id.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn missing_user_reads_as_sentinel_not_error() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("nobody").await, None);
        assert_eq!(store.recall("nobody").await, NO_MEMORY_SENTINEL);
    }

    #[tokio::test]
    async fn put_fully_replaces_the_blob() {
        let store = InMemoryStore::new();
        store.put("u1", "- likes rust".to_string()).await;
        store.put("u1", "- likes rust\n- lives in Lisbon".to_string()).await;
        assert_eq!(
            store.recall("u1").await,
            "- likes rust\n- lives in Lisbon"
        );
    }

    #[tokio::test]
    async fn read_after_write_returns_exactly_what_was_written() {
        let store = InMemoryStore::new();
        store.put("u1", "blob".to_string()).await;
        assert_eq!(store.get("u1").await.as_deref(), Some("blob"));
    }

    #[tokio::test]
    async fn users_are_isolated() {
        let store = InMemoryStore::new();
        store.put("u1", "one".to_string()).await;
        assert_eq!(store.recall("u2").await, NO_MEMORY_SENTINEL);
    }

    #[tokio::test]
    async fn user_lock_serializes_same_user_writers() {
        let store = InMemoryStore::new();
        let guard = store.lock_user("u1").await;

        // Same user: second lock must wait.
        let blocked = tokio::time::timeout(Duration::from_millis(20), store.lock_user("u1")).await;
        assert!(blocked.is_err());

        // Different user: unaffected.
        let other = tokio::time::timeout(Duration::from_millis(20), store.lock_user("u2")).await;
        assert!(other.is_ok());

        drop(guard);
        let unblocked = tokio::time::timeout(Duration::from_millis(20), store.lock_user("u1")).await;
        assert!(unblocked.is_ok());
    }
}
