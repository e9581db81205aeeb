//! # querylens Interpreter
//!
//! Turns a natural-language business question into a
//! [`BusinessContextProfile`](querylens_core::BusinessContextProfile):
//! intent, domain, entities, business terms and time range, derived
//! concurrently and aggregated into a weighted confidence score.

pub mod aggregate;
pub mod analyzer;
pub mod parse;
pub mod prompts;
pub mod signals;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use aggregate::{COMPARISON_KEYWORDS, Signals, build_profile, confidence_score};
pub use analyzer::ContextAnalyzer;
pub use signals::{Classifier, ClassifierSettings};
