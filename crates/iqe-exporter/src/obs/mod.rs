//! In-process metrics for the exporter.
//!
//! The five test counters and the build-info gauge are stored as atomics
//! and rendered by the `/metrics` handler in Prometheus text format.

pub mod metrics;
