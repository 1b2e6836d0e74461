//! iqe exporter library entry.
//!
//! Accepts per-run test summaries on `POST /results` and re-exposes them as
//! label-partitioned Prometheus counters on `GET /metrics`. It is consumed
//! by the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod app_state;
pub mod cli;
pub mod config;
pub mod ingest;
pub mod obs;
pub mod ops;
pub mod router;
pub mod server;
