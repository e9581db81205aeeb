//! Typed access on top of the JSON-valued [`ContextCache`].

use querylens_core::cache::ContextCache;
use querylens_core::error::CacheError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Read and decode a cached value. A value that no longer decodes as `T`
/// is a [`CacheError::Decode`].
pub async fn get_json<T: DeserializeOwned>(
    cache: &dyn ContextCache,
    key: &str,
) -> Result<Option<T>, CacheError> {
    match cache.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| CacheError::Decode(e.to_string())),
        None => Ok(None),
    }
}

/// Encode and store a value for `ttl`.
pub async fn set_json<T: Serialize>(
    cache: &dyn ContextCache,
    key: &str,
    value: &T,
    ttl: Duration,
) -> Result<(), CacheError> {
    let value = serde_json::to_value(value).map_err(|e| CacheError::Encode(e.to_string()))?;
    cache.set(key, value, ttl).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryCache;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Entry {
        question: String,
        hits: u32,
    }

    #[tokio::test]
    async fn typed_values_survive_the_cache() {
        let cache = InMemoryCache::new();
        let entry = Entry {
            question: "revenue by region".into(),
            hits: 3,
        };
        set_json(&cache, "profile:x", &entry, Duration::from_secs(60))
            .await
            .unwrap();

        let back: Option<Entry> = get_json(&cache, "profile:x").await.unwrap();
        assert_eq!(back, Some(entry));
        let missing: Option<Entry> = get_json(&cache, "profile:y").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn stale_shape_is_a_decode_error() {
        let cache = InMemoryCache::new();
        cache
            .set("profile:x", json!({"question": 42}), Duration::from_secs(60))
            .await
            .unwrap();

        let err = get_json::<Entry>(&cache, "profile:x").await.unwrap_err();
        assert!(matches!(err, CacheError::Decode(_)));
    }
}
