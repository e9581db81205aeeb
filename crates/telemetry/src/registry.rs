//! Thread-safe metrics registry.
//!
//! A single `Mutex` guards the read-modify-write of every counter. The
//! registry is injected into the interpreter and prioritizer as an
//! `Arc<MetricsRegistry>`; there is no global instance.

use crate::model::{MetricsReport, OperationSample, OperationSummary};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Running totals for one operation name.
#[derive(Debug, Clone)]
struct OperationStats {
    count: u64,
    total_duration: Duration,
    max_duration: Duration,
    total_candidates: u64,
    total_selected: u64,
    ratio_sum: f64,
    ratio_samples: u64,
    last_recorded_at: DateTime<Utc>,
}

impl OperationStats {
    fn new() -> Self {
        Self {
            count: 0,
            total_duration: Duration::ZERO,
            max_duration: Duration::ZERO,
            total_candidates: 0,
            total_selected: 0,
            ratio_sum: 0.0,
            ratio_samples: 0,
            last_recorded_at: Utc::now(),
        }
    }

    fn add(&mut self, sample: &OperationSample) {
        self.count += 1;
        self.total_duration += sample.duration;
        self.max_duration = self.max_duration.max(sample.duration);
        self.total_candidates += sample.candidates as u64;
        self.total_selected += sample.selected as u64;
        if let Some(ratio) = sample.selection_ratio() {
            self.ratio_sum += ratio;
            self.ratio_samples += 1;
        }
        self.last_recorded_at = Utc::now();
    }

    fn summarize(&self, operation: &str) -> OperationSummary {
        let avg_duration_ms = if self.count == 0 {
            0.0
        } else {
            self.total_duration.as_secs_f64() * 1000.0 / self.count as f64
        };
        let avg_selection_ratio = if self.ratio_samples == 0 {
            0.0
        } else {
            self.ratio_sum / self.ratio_samples as f64
        };
        OperationSummary {
            operation: operation.to_string(),
            count: self.count,
            avg_duration_ms,
            max_duration_ms: self.max_duration.as_secs_f64() * 1000.0,
            avg_selection_ratio,
            total_candidates: self.total_candidates,
            total_selected: self.total_selected,
            last_recorded_at: self.last_recorded_at,
        }
    }
}

/// In-memory registry keyed by operation name.
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    operations: Mutex<HashMap<String, OperationStats>>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, OperationStats>> {
        // A panic while holding the lock leaves the counters usable.
        self.operations.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record one invocation of `operation`.
    pub fn record(&self, operation: &str, duration: Duration, candidates: usize, selected: usize) {
        let sample = OperationSample::new(duration, candidates, selected);
        let mut ops = self.lock();
        ops.entry(operation.to_string())
            .or_insert_with(OperationStats::new)
            .add(&sample);
        tracing::trace!(
            operation,
            duration_ms = duration.as_millis() as u64,
            candidates,
            selected,
            "Recorded operation metrics"
        );
    }

    /// Aggregated statistics for one operation.
    pub fn summary(&self, operation: &str) -> Option<OperationSummary> {
        self.lock().get(operation).map(|s| s.summarize(operation))
    }

    /// Aggregated statistics for every operation, sorted by name.
    pub fn report(&self) -> MetricsReport {
        let ops = self.lock();
        let mut operations: Vec<OperationSummary> =
            ops.iter().map(|(name, stats)| stats.summarize(name)).collect();
        operations.sort_by(|a, b| a.operation.cmp(&b.operation));
        MetricsReport {
            generated_at: Utc::now(),
            operations,
        }
    }

    /// Forget all recorded samples.
    pub fn reset(&self) {
        self.lock().clear();
    }
}
