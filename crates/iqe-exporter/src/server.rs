//! HTTP server shell: bind, then serve until a fatal transport error.

use std::io::ErrorKind;

use tokio::net::TcpListener;

use iqe_core::error::{IqeError, Result};

use crate::{app_state::AppState, config::WILDCARD_V6, router};

/// Bind the state's normalized listen address.
///
/// The `[::]` wildcard falls back to `0.0.0.0` on hosts without IPv6. A
/// port already in use is reported as is.
pub async fn bind(state: &AppState) -> Result<TcpListener> {
    let addr = state.listen_addr();
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if e.kind() != ErrorKind::AddrInUse => match v4_fallback(addr) {
            Some(v4) => {
                tracing::warn!(%addr, %v4, error = %e, "ipv6 wildcard unavailable, binding ipv4");
                TcpListener::bind(&v4)
                    .await
                    .map_err(|e| IqeError::Internal(format!("bind {v4} failed: {e}")))
            }
            None => Err(IqeError::Internal(format!("bind {addr} failed: {e}"))),
        },
        Err(e) => Err(IqeError::Internal(format!("bind {addr} failed: {e}"))),
    }
}

fn v4_fallback(addr: &str) -> Option<String> {
    let port = addr.strip_prefix(WILDCARD_V6)?.strip_prefix(':')?;
    Some(format!("0.0.0.0:{port}"))
}

/// Serve every route on an already-bound listener.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let local = listener
        .local_addr()
        .map_err(|e| IqeError::Internal(format!("listener address unavailable: {e}")))?;
    tracing::info!(%local, "iqe-exporter serving");

    let app = router::build_router(state);
    axum::serve(listener, app)
        .await
        .map_err(|e| IqeError::Internal(format!("server failed: {e}")))
}
