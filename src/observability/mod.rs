//! Observability for the commit layer
//!
//! Structured JSON logging and counters-only metrics. Both are read-only
//! with respect to execution: no side effects, no async, no background
//! threads, deterministic output.

mod logger;
mod metrics;

pub use logger::{Logger, Severity};
pub use metrics::MetricsRegistry;
