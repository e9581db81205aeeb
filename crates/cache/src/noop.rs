//! No-op cache: caching disabled. Every lookup is a miss.

use async_trait::async_trait;
use querylens_core::cache::ContextCache;
use querylens_core::error::CacheError;
use std::time::Duration;

pub struct NoopCache;

#[async_trait]
impl ContextCache for NoopCache {
    fn name(&self) -> &str {
        "none"
    }

    async fn get(&self, _key: &str) -> Result<Option<serde_json::Value>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: serde_json::Value, _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    async fn remove(&self, _key: &str) -> Result<bool, CacheError> {
        Ok(false)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
