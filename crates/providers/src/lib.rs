//! Capability implementations for querylens.
//!
//! - [`OpenAiCompatProvider`]: text generation and embeddings over any
//!   OpenAI-compatible endpoint
//! - [`EmbeddingSimilarity`] / [`LexicalSimilarity`]: the similarity capability
//! - [`HeuristicTokenCounter`]: the token-counting capability

pub mod openai_compat;
pub mod similarity;
pub mod token;

pub use openai_compat::OpenAiCompatProvider;
pub use similarity::{EmbeddingSimilarity, LexicalSimilarity, cosine_similarity};
pub use token::HeuristicTokenCounter;

use querylens_config::{AppConfig, SimilarityBackend};
use querylens_core::provider::{Provider, SimilarityProvider};
use std::sync::Arc;
use std::time::Duration;

/// Build the text-generation provider from configuration.
///
/// Returns `None` when no API key is configured; the interpreter then runs
/// with every model-backed signal degraded.
pub fn build_provider(config: &AppConfig) -> Option<Arc<dyn Provider>> {
    let api_key = config.provider.api_key.clone()?;
    Some(Arc::new(OpenAiCompatProvider::new(
        &config.provider.name,
        &config.provider.api_url,
        api_key,
        Duration::from_secs(config.provider.timeout_secs),
    )))
}

/// Build the similarity capability selected by `analysis.similarity`.
///
/// Falls back to lexical similarity when embeddings are requested but no
/// provider is available.
pub fn build_similarity(
    config: &AppConfig,
    provider: Option<Arc<dyn Provider>>,
) -> Arc<dyn SimilarityProvider> {
    match (config.analysis.similarity, provider) {
        (SimilarityBackend::Embedding, Some(provider)) => Arc::new(EmbeddingSimilarity::new(
            provider,
            &config.provider.embedding_model,
        )),
        (SimilarityBackend::Embedding, None) => {
            tracing::warn!("Embedding similarity requested without a provider, using lexical");
            Arc::new(LexicalSimilarity)
        }
        (SimilarityBackend::Lexical, _) => Arc::new(LexicalSimilarity),
    }
}
