//! In-memory TTL cache: the default backing store for profiles and
//! prioritized selections.
//!
//! Entries expire lazily on read and are swept on write once the map grows
//! past `max_entries`; if every entry is still live, the one closest to
//! expiry is evicted. TTLs are capped at [`MAX_ENTRY_TTL`]. Expiry uses `tokio::time::Instant` so tests can drive
//! the clock with `tokio::time::pause`/`advance`.

use async_trait::async_trait;
use querylens_core::cache::ContextCache;
use querylens_core::error::CacheError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

/// Longest lifetime a single entry can be given.
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    expires_at: Instant,
}

/// A thread-safe in-memory cache with per-entry TTL.
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    max_entries: usize,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Cache holding at most `max_entries` entries.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
        }
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContextCache for InMemoryCache {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.expires_at > Instant::now() => Ok(Some(entry.value.clone())),
            _ => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        if entries.len() >= self.max_entries && !entries.contains_key(key) {
            let before = entries.len();
            entries.retain(|_, e| e.expires_at > now);
            debug!(swept = before - entries.len(), "Swept expired cache entries");

            while entries.len() >= self.max_entries {
                let Some(soonest) = entries
                    .iter()
                    .min_by_key(|(_, e)| e.expires_at)
                    .map(|(k, _)| k.clone())
                else {
                    break;
                };
                entries.remove(&soonest);
                debug!(key = %soonest, "Evicted live cache entry at capacity");
            }
        }

        let Some(expires_at) = now.checked_add(ttl.min(MAX_ENTRY_TTL)) else {
            debug!(key, "Cache expiry out of range, entry not stored");
            return Ok(());
        };
        entries.insert(key.to_string(), CacheEntry { value, expires_at });
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.entries.write().await.remove(key).is_some())
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().await.clear();
        Ok(())
    }
}
