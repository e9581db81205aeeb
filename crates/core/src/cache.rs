//! Cache trait: the read-through cache shared by the interpreter and
//! the prioritizer.
//!
//! Values are JSON so one cache can hold profiles and section lists alike.
//! Errors are never fatal: callers log them and treat them as misses.

use async_trait::async_trait;
use std::time::Duration;

use crate::error::CacheError;

#[async_trait]
pub trait ContextCache: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch an unexpired value.
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, CacheError>;

    /// Store a value for `ttl`.
    async fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<(), CacheError>;

    /// Remove a value. Returns whether it was present.
    async fn remove(&self, key: &str) -> Result<bool, CacheError>;

    /// Drop every entry.
    async fn clear(&self) -> Result<(), CacheError>;
}
