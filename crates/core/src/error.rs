//! Error types for the querylens domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; the public entry points of
//! the interpreter and prioritizer convert all of them into degraded values
//! instead of returning them.

use thiserror::Error;

/// Failures of the text-generation / embedding capability.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures inside one interpretation signal or a catalog lookup.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("Classification call failed: {0}")]
    Classification(#[from] ProviderError),

    #[error("Unparseable structured output: {0}")]
    UnparseableOutput(String),

    #[error("Missing dependency: {0}")]
    MissingDependency(String),

    #[error("Analysis task aborted: {0}")]
    TaskAborted(String),
}

/// Failures inside the scoring / selection engine.
#[derive(Debug, Clone, Error)]
pub enum PrioritizationError {
    #[error("Invalid section {index}: {reason}")]
    InvalidSection { index: usize, reason: String },

    #[error("Selection table too large: {items} items x {budget} tokens exceeds {max_cells} cells")]
    BudgetTooLarge {
        items: usize,
        budget: usize,
        max_cells: usize,
    },

    #[error("Token counting failed: {0}")]
    Tokenizer(#[from] TokenizerError),
}

/// Failures of the backing cache. Callers treat these as misses.
#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),

    #[error("Cached value could not be decoded: {0}")]
    Decode(String),

    #[error("Value could not be encoded for caching: {0}")]
    Encode(String),
}

/// Failures of the token counting capability.
#[derive(Debug, Clone, Error)]
pub enum TokenizerError {
    #[error("Tokenizer unavailable: {0}")]
    Unavailable(String),
}
