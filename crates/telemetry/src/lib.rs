//! Operation metrics for querylens.
//!
//! Records the duration, candidate count and selected count of every
//! interpretation and prioritization call into an injected, mutex-guarded
//! registry, and serves aggregated reports on demand.

pub mod model;
pub mod registry;

pub use model::{MetricsReport, OperationSample, OperationSummary};
pub use registry::MetricsRegistry;
