//! The interpreted question: `BusinessContextProfile` and its signals.
//!
//! A profile is created fresh per question by the interpreter, cached for a
//! bounded window, and never mutated after construction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Closed classification of a question's analytical purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IntentType {
    Analytical,
    Operational,
    Exploratory,
    Comparison,
    Aggregation,
    Trend,
    Detail,
    #[default]
    Unknown,
}

impl IntentType {
    pub const ALL: [IntentType; 8] = [
        IntentType::Analytical,
        IntentType::Operational,
        IntentType::Exploratory,
        IntentType::Comparison,
        IntentType::Aggregation,
        IntentType::Trend,
        IntentType::Detail,
        IntentType::Unknown,
    ];

    /// Parse a model-produced label, case-insensitively. Anything outside
    /// the closed set becomes `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "analytical" => Self::Analytical,
            "operational" => Self::Operational,
            "exploratory" => Self::Exploratory,
            "comparison" => Self::Comparison,
            "aggregation" => Self::Aggregation,
            "trend" => Self::Trend,
            "detail" => Self::Detail,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Analytical => "Analytical",
            Self::Operational => "Operational",
            Self::Exploratory => "Exploratory",
            Self::Comparison => "Comparison",
            Self::Aggregation => "Aggregation",
            Self::Trend => "Trend",
            Self::Detail => "Detail",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for IntentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The classified intent of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Intent {
    pub intent_type: IntentType,
    pub description: String,
    /// Confidence in [0, 1].
    pub confidence: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_intents: Vec<String>,
}

/// The business domain a question belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Domain {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub related_tables: Vec<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    /// Relevance in [0, 1].
    pub relevance: f32,
}

impl Domain {
    pub const UNKNOWN: &'static str = "Unknown";

    /// Sentinel returned when no domain could be detected.
    pub fn unknown() -> Self {
        Self {
            name: Self::UNKNOWN.into(),
            description: String::new(),
            related_tables: Vec::new(),
            key_concepts: Vec::new(),
            relevance: 0.0,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.name == Self::UNKNOWN
    }
}

impl Default for Domain {
    fn default() -> Self {
        Self::unknown()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Table,
    Column,
    Metric,
    Dimension,
    TimeReference,
    ComparisonValue,
}

impl EntityType {
    /// Parse a model-produced label. Accepts `TimeReference`,
    /// `time_reference` and `time reference` spellings.
    pub fn parse(label: &str) -> Option<Self> {
        let normalized: String = label
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "table" => Some(Self::Table),
            "column" => Some(Self::Column),
            "metric" => Some(Self::Metric),
            "dimension" => Some(Self::Dimension),
            "timereference" | "time" => Some(Self::TimeReference),
            "comparisonvalue" | "comparison" => Some(Self::ComparisonValue),
            _ => None,
        }
    }
}

/// An entity mentioned in the question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub entity_type: EntityType,
    /// The text in the question that matched.
    pub original_text: String,
    pub confidence: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Granularity {
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
    #[default]
    Unknown,
}

impl Granularity {
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "hour" | "hourly" => Self::Hour,
            "day" | "daily" => Self::Day,
            "week" | "weekly" => Self::Week,
            "month" | "monthly" => Self::Month,
            "quarter" | "quarterly" => Self::Quarter,
            "year" | "yearly" | "annual" => Self::Year,
            _ => Self::Unknown,
        }
    }
}

/// The time range a question refers to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimeContext {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    /// Free-text relative expression, e.g. "last quarter".
    pub relative_expression: Option<String>,
    pub granularity: Granularity,
}

/// The five independently derived signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Intent,
    Domain,
    Entities,
    BusinessTerms,
    TimeRange,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intent => "intent",
            Self::Domain => "domain",
            Self::Entities => "entities",
            Self::BusinessTerms => "business_terms",
            Self::TimeRange => "time_range",
        };
        f.write_str(s)
    }
}

/// The outcome of one interpretation branch.
///
/// A branch never fails: on error it carries its neutral default together
/// with the reason it degraded.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal<T> {
    pub value: T,
    pub degradation: Option<String>,
}

impl<T> Signal<T> {
    pub fn ok(value: T) -> Self {
        Self {
            value,
            degradation: None,
        }
    }

    pub fn degraded(value: T, reason: impl Into<String>) -> Self {
        Self {
            value,
            degradation: Some(reason.into()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degradation.is_some()
    }
}

/// The interpreted question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessContextProfile {
    pub id: String,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub intent: Intent,
    pub domain: Domain,
    pub entities: Vec<Entity>,
    pub business_terms: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_context: Option<TimeContext>,
    pub identified_metrics: Vec<Entity>,
    pub identified_dimensions: Vec<Entity>,
    pub comparison_terms: Vec<String>,
    /// Weighted aggregate in [0, 1].
    pub confidence_score: f32,
    /// Signals that fell back to their neutral default.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded_signals: Vec<SignalKind>,
    pub created_at: DateTime<Utc>,
}

impl BusinessContextProfile {
    pub fn is_degraded(&self) -> bool {
        !self.degraded_signals.is_empty()
    }
}
