//! Metrics for the ladder service
//!
//! Prometheus-based counters and histograms covering entity churn, recorded
//! matches, and the HTTP surface, rendered by the `/metrics` endpoint.

pub mod collector;

pub use collector::{EntityMetrics, HttpMetrics, MatchMetrics, MetricsCollector, ServiceMetrics};
