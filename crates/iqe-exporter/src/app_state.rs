//! Shared application state for the exporter.
//!
//! Built once in `main` before the listener is bound, so every counter is
//! registered before the first request. Tests build one per case to keep
//! counters isolated.

use std::sync::Arc;

use iqe_core::error::Result;

use crate::config::{normalize_listen, ExporterConfig};
use crate::obs::metrics::ExporterMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
    metrics: Arc<ExporterMetrics>,
}

struct AppStateInner {
    listen: String,
}

impl AppState {
    /// Build application state.
    /// Returns Result so main can handle errors gracefully (no panic).
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        cfg.validate()?;
        let listen = normalize_listen(&cfg.exporter.listen)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { listen }),
            metrics: Arc::new(ExporterMetrics::default()),
        })
    }

    /// Normalized address to bind.
    pub fn listen_addr(&self) -> &str {
        &self.inner.listen
    }

    pub fn metrics(&self) -> Arc<ExporterMetrics> {
        Arc::clone(&self.metrics)
    }
}
