//! In-process keyed async mutex.
//!
//! Serializes work per key (`room:<id>`, `property:<id>`) within one
//! process. Entries are pruned once nobody holds or waits on them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of per-key async mutexes.
#[derive(Default)]
pub struct KeyedLocks {
    entries: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

/// Held lock for one key; released on drop.
pub struct KeyGuard {
    _guard: OwnedMutexGuard<()>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room_key(id: Uuid) -> String {
        format!("room:{}", id)
    }

    pub fn property_key(id: Uuid) -> String {
        format!("property:{}", id)
    }

    /// Wait for the lock on `key`.
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let mutex = self.entry(key);
        KeyGuard {
            _guard: mutex.lock_owned().await,
        }
    }

    /// Lock several keys in a stable order so concurrent callers cannot
    /// deadlock on each other.
    pub async fn lock_all(&self, keys: &[String]) -> Vec<KeyGuard> {
        let mut ordered: Vec<&String> = keys.iter().collect();
        ordered.sort();
        ordered.dedup();

        let mut guards = Vec::with_capacity(ordered.len());
        for key in ordered {
            guards.push(self.lock(key).await);
        }
        guards
    }

    fn entry(&self, key: &str) -> Arc<AsyncMutex<()>> {
        let mut entries = self
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        // Only the registry references an idle entry.
        entries.retain(|_, mutex| Arc::strong_count(mutex) > 1);

        entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(AsyncMutex::new(())))
            .clone()
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = Arc::new(KeyedLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();

        for _ in 0..4 {
            let locks = locks.clone();
            let inside = inside.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock("room:1").await;
                assert_eq!(inside.fetch_add(1, Ordering::SeqCst), 0);
                tokio::time::sleep(Duration::from_millis(5)).await;
                inside.fetch_sub(1, Ordering::SeqCst);
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }
    }

    #[tokio::test]
    async fn test_idle_entries_are_pruned() {
        let locks = KeyedLocks::new();
        {
            let _a = locks.lock("room:a").await;
        }
        let _b = locks.lock("room:b").await;

        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn test_lock_all_deduplicates() {
        let locks = KeyedLocks::new();
        let keys = vec!["room:x".to_string(), "room:x".to_string()];

        let guards = locks.lock_all(&keys).await;
        assert_eq!(guards.len(), 1);
    }
}
