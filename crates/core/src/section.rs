//! Scoreable context fragments and the request-scoped selection inputs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::provider::TokenHint;

/// The category of a context fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionCategory {
    TableDefinition,
    ColumnDefinition,
    BusinessRule,
    Example,
    Relationship,
    Glossary,
}

impl SectionCategory {
    /// Fixed presentation sequence used for the final ordering.
    pub const PRESENTATION_ORDER: [SectionCategory; 6] = [
        SectionCategory::TableDefinition,
        SectionCategory::ColumnDefinition,
        SectionCategory::Relationship,
        SectionCategory::BusinessRule,
        SectionCategory::Example,
        SectionCategory::Glossary,
    ];

    /// Position of this category in [`Self::PRESENTATION_ORDER`].
    pub fn presentation_rank(&self) -> usize {
        match self {
            Self::TableDefinition => 0,
            Self::ColumnDefinition => 1,
            Self::Relationship => 2,
            Self::BusinessRule => 3,
            Self::Example => 4,
            Self::Glossary => 5,
        }
    }

    /// Tokenizer hint for content of this category.
    pub fn token_hint(&self) -> TokenHint {
        match self {
            Self::Example => TokenHint::Code,
            _ => TokenHint::Prose,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TableDefinition => "table_definition",
            Self::ColumnDefinition => "column_definition",
            Self::BusinessRule => "business_rule",
            Self::Example => "example",
            Self::Relationship => "relationship",
            Self::Glossary => "glossary",
        }
    }
}

impl std::fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate fragment of schema or business knowledge.
///
/// Invariants: `relevance` is in [0, 1]. Derived scores and provenance live
/// in `attributes`, a sorted map so serialization is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextSection {
    pub category: SectionCategory,
    pub content: String,
    pub token_count: usize,
    pub relevance: f32,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
}

impl ContextSection {
    pub const IMPORTANCE: &'static str = "importance";
    pub const EFFICIENCY: &'static str = "efficiency";
    pub const PRIORITY: &'static str = "priority";

    pub fn new(
        category: SectionCategory,
        content: impl Into<String>,
        token_count: usize,
        relevance: f32,
    ) -> Self {
        Self {
            category,
            content: content.into(),
            token_count,
            relevance,
            attributes: BTreeMap::new(),
        }
    }

    /// Attach a provenance or score attribute (builder style).
    pub fn with_attribute(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    pub fn attribute_f64(&self, key: &str) -> Option<f64> {
        self.attributes.get(key).and_then(|v| v.as_f64())
    }

    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|v| v.as_str())
    }

    /// Recorded importance weight, if the section has been scored.
    pub fn importance(&self) -> Option<f64> {
        self.attribute_f64(Self::IMPORTANCE)
    }

    pub fn efficiency(&self) -> Option<f64> {
        self.attribute_f64(Self::EFFICIENCY)
    }

    /// Composite priority; 0.0 for unscored sections.
    pub fn priority(&self) -> f64 {
        self.attribute_f64(Self::PRIORITY).unwrap_or(0.0)
    }
}

/// Request-scoped token ceilings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBudget {
    /// Ceiling for the entire prompt.
    pub total: usize,
    /// Sub-ceiling available for context sections.
    pub context: usize,
}

impl TokenBudget {
    /// Create a budget; the context share is capped at the total.
    pub fn new(total: usize, context: usize) -> Self {
        Self {
            total,
            context: context.min(total),
        }
    }

    /// A budget where all tokens are available for context.
    pub fn context_only(tokens: usize) -> Self {
        Self::new(tokens, tokens)
    }
}

impl Default for TokenBudget {
    fn default() -> Self {
        Self::new(8000, 4000)
    }
}

/// Which selection algorithm processes the scored candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStrategy {
    MaxRelevance,
    MaxCoverage,
    MinTokens,
    #[default]
    Balanced,
}

impl OptimizationStrategy {
    pub const ALL: [OptimizationStrategy; 4] = [
        OptimizationStrategy::MaxRelevance,
        OptimizationStrategy::MaxCoverage,
        OptimizationStrategy::MinTokens,
        OptimizationStrategy::Balanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MaxRelevance => "max_relevance",
            Self::MaxCoverage => "max_coverage",
            Self::MinTokens => "min_tokens",
            Self::Balanced => "balanced",
        }
    }
}

impl std::fmt::Display for OptimizationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OptimizationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "max_relevance" | "maxrelevance" => Ok(Self::MaxRelevance),
            "max_coverage" | "maxcoverage" => Ok(Self::MaxCoverage),
            "min_tokens" | "mintokens" => Ok(Self::MinTokens),
            "balanced" => Ok(Self::Balanced),
            other => Err(format!("unknown optimization strategy: {other}")),
        }
    }
}
