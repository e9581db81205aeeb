//! Similarity capability implementations.
//!
//! - [`EmbeddingSimilarity`]: cosine similarity over provider embeddings
//! - [`LexicalSimilarity`]: Sørensen–Dice bigram overlap, no network calls
//!
//! Both report scores in [0, 1]; negative cosine is clamped to 0.

use async_trait::async_trait;
use querylens_core::error::ProviderError;
use querylens_core::provider::{EmbeddingRequest, Provider, SimilarityProvider};
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::Arc;

/// Compute cosine similarity between two vectors.
///
/// Returns a value in [-1, 1] where 1 = identical, 0 = orthogonal, -1 = opposite.
/// Returns 0.0 if the vectors differ in length, are empty, or are zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (x, y) in a.iter().zip(b.iter()) {
        let x = *x as f64;
        let y = *y as f64;
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < 1e-10 {
        return 0.0;
    }

    (dot / denom) as f32
}

fn bounded(score: f32) -> f32 {
    if score.is_nan() { 0.0 } else { score.clamp(0.0, 1.0) }
}

/// Similarity backed by a provider's embedding endpoint.
pub struct EmbeddingSimilarity {
    provider: Arc<dyn Provider>,
    model: String,
}

impl EmbeddingSimilarity {
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }
}

#[async_trait]
impl SimilarityProvider for EmbeddingSimilarity {
    fn name(&self) -> &str {
        "embedding"
    }

    async fn similarity(&self, a: &str, b: &str) -> Result<f32, ProviderError> {
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![a.to_string(), b.to_string()],
            })
            .await?;

        match response.embeddings.as_slice() {
            [ea, eb] => Ok(bounded(cosine_similarity(ea, eb))),
            other => Err(ProviderError::ApiError {
                status_code: 200,
                message: format!("expected 2 embeddings, got {}", other.len()),
            }),
        }
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let response = self
            .provider
            .embed(EmbeddingRequest {
                model: self.model.clone(),
                inputs: vec![text.to_string()],
            })
            .await?;
        response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ApiError {
                status_code: 200,
                message: "empty embedding response".into(),
            })
    }
}

/// Offline similarity: Sørensen–Dice coefficient over lower-cased text.
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    /// Dimensions of the hashed bag-of-words vector returned by `embed`.
    pub const DIMENSIONS: usize = 256;
}

#[async_trait]
impl SimilarityProvider for LexicalSimilarity {
    fn name(&self) -> &str {
        "lexical"
    }

    async fn similarity(&self, a: &str, b: &str) -> Result<f32, ProviderError> {
        let score = strsim::sorensen_dice(&a.to_lowercase(), &b.to_lowercase());
        Ok(bounded(score as f32))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ProviderError> {
        let mut vector = vec![0.0f32; Self::DIMENSIONS];
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
        {
            let mut hasher = DefaultHasher::new();
            word.to_lowercase().hash(&mut hasher);
            vector[(hasher.finish() % Self::DIMENSIONS as u64) as usize] += 1.0;
        }
        Ok(vector)
    }
}
