//! Results of prioritization and optimization.

use querylens_core::section::{ContextSection, OptimizationStrategy, SectionCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Measurements of one selection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationMetrics {
    pub strategy: OptimizationStrategy,
    pub candidate_count: usize,
    pub selected_count: usize,
    pub total_tokens: usize,
    pub budget: usize,
    /// `total_tokens / budget`, 0 for a zero budget.
    pub utilization: f64,
    pub total_relevance: f64,
    pub total_priority: f64,
    pub category_counts: BTreeMap<SectionCategory, usize>,
    pub duration_ms: u64,
}

impl OptimizationMetrics {
    pub fn measure(
        strategy: OptimizationStrategy,
        candidate_count: usize,
        selected: &[ContextSection],
        budget: usize,
        duration: Duration,
    ) -> Self {
        let total_tokens: usize = selected.iter().map(|s| s.token_count).sum();
        let mut category_counts = BTreeMap::new();
        for section in selected {
            *category_counts.entry(section.category).or_insert(0) += 1;
        }
        Self {
            strategy,
            candidate_count,
            selected_count: selected.len(),
            total_tokens,
            budget,
            utilization: if budget == 0 {
                0.0
            } else {
                total_tokens as f64 / budget as f64
            },
            total_relevance: selected.iter().map(|s| f64::from(s.relevance)).sum(),
            total_priority: selected.iter().map(ContextSection::priority).sum(),
            category_counts,
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Metrics of a run that selected nothing.
    pub fn empty(
        strategy: OptimizationStrategy,
        candidate_count: usize,
        budget: usize,
        duration: Duration,
    ) -> Self {
        Self::measure(strategy, candidate_count, &[], budget, duration)
    }
}

/// The ordered selection handed to prompt assembly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrioritizedContext {
    pub sections: Vec<ContextSection>,
    pub metrics: OptimizationMetrics,
    #[serde(default)]
    pub from_cache: bool,
    /// Why the selection is empty, when prioritization failed softly.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl PrioritizedContext {
    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

/// Output of a single-strategy `optimize` run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub selected: Vec<ContextSection>,
    pub metrics: OptimizationMetrics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}
