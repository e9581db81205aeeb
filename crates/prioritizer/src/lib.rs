//! # querylens Prioritizer
//!
//! Scores candidate context sections against the question's intent and
//! selects the subset that best fits a token budget.
//!
//! | Strategy | Selection |
//! |----------|-----------|
//! | `Balanced` | exact 0/1 knapsack over composite priority |
//! | `MaxRelevance` | greedy by relevance |
//! | `MaxCoverage` | one per category, then greedy by relevance |
//! | `MinTokens` | greedy by relevance per token |
//!
//! Whatever the strategy, the selection is returned in a fixed
//! presentation order: tables, columns, relationships, business rules,
//! examples, glossary.

pub mod catalog;
pub mod engine;
pub mod materialize;
pub mod model;
pub mod ordering;
pub mod render;
pub mod scoring;
pub mod select;
pub mod weights;

pub use catalog::StaticMetadataCatalog;
pub use engine::{ContextPrioritizer, context_key};
pub use model::{OptimizationMetrics, OptimizationResult, PrioritizedContext};
pub use render::render_sections;
pub use weights::ImportanceWeights;
