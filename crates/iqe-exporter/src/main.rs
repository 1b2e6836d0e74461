//! iqe exporter
//!
//! Startup: tracing, flags, config, state (counters registered), bind,
//! serve. Exits non-zero on any startup or serve failure.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use iqe_core::error::Result;
use iqe_exporter::{app_state::AppState, cli::Cli, server};

#[tokio::main]
async fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.client_code().as_str(), error = %e, "iqe-exporter stopped");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cfg = cli.into_config()?;
    let state = AppState::new(cfg)?;

    tracing::info!(listen = %state.listen_addr(), "iqe-exporter starting");
    let listener = server::bind(&state).await?;
    server::serve(listener, state).await
}
