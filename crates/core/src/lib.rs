//! # querylens Core
//!
//! Domain types, capability traits, and error definitions for querylens.
//! This crate has **no framework dependencies**: it defines the model that
//! the interpreter, prioritizer, and capability crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (text generation, similarity, token counting,
//! caching, catalogs) is a trait here. Implementations live in their own
//! crates so that:
//! - Implementations can be swapped via configuration
//! - Tests can use scripted mocks
//! - All crates depend inward on core

pub mod cache;
pub mod candidate;
pub mod catalog;
pub mod error;
pub mod profile;
pub mod provider;
pub mod section;

pub use cache::ContextCache;
pub use candidate::{
    CandidateSchema, ColumnCandidate, ExampleCandidate, GlossaryCandidate, RelationshipCandidate,
    RuleCandidate, TableCandidate,
};
pub use catalog::{BusinessDomain, DomainCatalog, MetadataCatalog, StaticDomainCatalog};
pub use error::{AnalysisError, CacheError, PrioritizationError, ProviderError, TokenizerError};
pub use profile::{
    BusinessContextProfile, Domain, Entity, EntityType, Granularity, Intent, IntentType, Signal,
    SignalKind, TimeContext,
};
pub use provider::{
    EmbeddingRequest, EmbeddingResponse, Provider, ProviderRequest, ProviderResponse,
    SimilarityProvider, TokenCounter, TokenHint, Usage,
};
pub use section::{ContextSection, OptimizationStrategy, SectionCategory, TokenBudget};
