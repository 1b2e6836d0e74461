//! Command-line flags.

use clap::Parser;

use iqe_core::error::Result;

use crate::config::{self, ExporterConfig};

#[derive(Debug, Parser)]
#[command(
    name = "iqe-exporter",
    version,
    about = "Re-exposes test-run results as Prometheus counters"
)]
pub struct Cli {
    /// The address to listen on for HTTP requests [default: :8080].
    #[arg(long = "listen-address", value_name = "HOST:PORT")]
    pub listen_address: Option<String>,

    /// Optional YAML config file.
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,
}

impl Cli {
    /// Resolve the effective config.
    ///
    /// `--listen-address` beats `exporter.listen` from the file, which beats
    /// the built-in default.
    pub fn into_config(self) -> Result<ExporterConfig> {
        let mut cfg = match &self.config {
            Some(path) => config::load_from_file(path)?,
            None => ExporterConfig::default(),
        };
        if let Some(addr) = self.listen_address {
            cfg.exporter.listen = addr;
        }
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_listen_address() {
        let cfg = Cli::try_parse_from(["iqe-exporter"]).unwrap().into_config().unwrap();
        assert_eq!(cfg.exporter.listen, ":8080");
    }

    #[test]
    fn listen_address_flag_with_equals() {
        let cli =
            Cli::try_parse_from(["iqe-exporter", "--listen-address=127.0.0.1:9100"]).unwrap();
        assert_eq!(cli.into_config().unwrap().exporter.listen, "127.0.0.1:9100");
    }

    #[test]
    fn flag_overrides_config_file() {
        let path = std::env::temp_dir()
            .join(format!("iqe-exporter-cli-{}.yaml", std::process::id()));
        std::fs::write(&path, "version: 1\nexporter:\n  listen: \"127.0.0.1:7000\"\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let from_file = Cli::try_parse_from(["iqe-exporter", "--config", &path]).unwrap();
        assert_eq!(from_file.into_config().unwrap().exporter.listen, "127.0.0.1:7000");

        let overridden = Cli::try_parse_from([
            "iqe-exporter",
            "--config",
            &path,
            "--listen-address",
            ":9000",
        ])
        .unwrap();
        assert_eq!(overridden.into_config().unwrap().exporter.listen, ":9000");

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn bad_listen_address_is_a_config_error() {
        let cli = Cli::try_parse_from(["iqe-exporter", "--listen-address", "8080"]).unwrap();
        assert!(cli.into_config().is_err());
    }

    #[test]
    fn missing_config_file_fails() {
        let cli =
            Cli::try_parse_from(["iqe-exporter", "--config", "/nonexistent/iqe.yaml"]).unwrap();
        assert!(cli.into_config().is_err());
    }
}
