//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use iqe_core::error::{IqeError, Result};

pub use schema::{
    normalize_listen, ExporterConfig, ExporterSection, DEFAULT_LISTEN, WILDCARD_V6,
};

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| IqeError::Internal(format!("read config {path} failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| IqeError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
