use serde::Deserialize;
use iqe_core::error::{IqeError, Result};

pub const DEFAULT_LISTEN: &str = ":8080";

/// Host a bare `:port` is bound on.
pub const WILDCARD_V6: &str = "[::]";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
        }
    }
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(IqeError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.exporter.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        normalize_listen(&self.listen).map(|_| ())
    }
}

fn default_listen() -> String {
    DEFAULT_LISTEN.into()
}

/// Turn a `host:port` listen address into something `TcpListener::bind`
/// resolves.
///
/// A bare `:port` means every interface and becomes the dual-stack IPv6
/// wildcard `[::]:port`. Hostnames and bracketed IPv6 literals pass through
/// unchanged.
pub fn normalize_listen(addr: &str) -> Result<String> {
    let addr = addr.trim();
    let (host, port) = addr.rsplit_once(':').ok_or_else(|| {
        IqeError::Config(format!("listen address {addr:?} must be host:port"))
    })?;
    port.parse::<u16>().map_err(|e| {
        IqeError::Config(format!("listen address {addr:?} has an invalid port: {e}"))
    })?;

    if host.is_empty() {
        Ok(format!("{WILDCARD_V6}:{port}"))
    } else {
        Ok(addr.to_string())
    }
}
