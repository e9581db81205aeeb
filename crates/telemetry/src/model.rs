//! Data model for recorded samples and aggregated reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One recorded invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSample {
    /// Wall-clock duration of the call.
    pub duration: Duration,
    /// Candidates fed in.
    pub candidates: usize,
    /// Candidates kept.
    pub selected: usize,
}

impl OperationSample {
    pub fn new(duration: Duration, candidates: usize, selected: usize) -> Self {
        Self {
            duration,
            candidates,
            selected,
        }
    }

    /// `selected / candidates`, or `None` when nothing was offered.
    pub fn selection_ratio(&self) -> Option<f64> {
        if self.candidates == 0 {
            None
        } else {
            Some(self.selected as f64 / self.candidates as f64)
        }
    }
}

/// Aggregated statistics for one operation name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationSummary {
    /// Operation name (e.g. "prioritize", "optimize:min_tokens").
    pub operation: String,
    /// Invocations recorded.
    pub count: u64,
    /// Mean duration in milliseconds.
    pub avg_duration_ms: f64,
    /// Slowest recorded duration in milliseconds.
    pub max_duration_ms: f64,
    /// Mean of per-call selection ratios (calls with no candidates excluded).
    pub avg_selection_ratio: f64,
    pub total_candidates: u64,
    pub total_selected: u64,
    pub last_recorded_at: DateTime<Utc>,
}

/// A point-in-time report across all operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub generated_at: DateTime<Utc>,
    /// Sorted by operation name.
    pub operations: Vec<OperationSummary>,
}

impl MetricsReport {
    pub fn operation(&self, name: &str) -> Option<&OperationSummary> {
        self.operations.iter().find(|o| o.operation == name)
    }

    pub fn total_invocations(&self) -> u64 {
        self.operations.iter().map(|o| o.count).sum()
    }
}
