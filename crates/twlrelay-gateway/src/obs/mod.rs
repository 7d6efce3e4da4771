//! Lightweight in-process metrics (dependency-free).
//!
//! Metrics are stored as atomics keyed by sorted label sets and rendered in
//! Prometheus text format by the `/metrics` handler.

pub mod metrics;

pub use metrics::{CounterVec, GaugeGuard, GaugeVec, HistogramVec, RelayMetrics};
