//! Result ingestion endpoint.
//!
//! `POST /results` takes one JSON submission record and credits the five
//! test counters for its (plugin, priority, target_app) tuple. The body is
//! decoded and validated completely before any counter is touched, so a
//! rejected request leaves the registry unchanged.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use iqe_core::error::IqeError;
use iqe_core::protocol::parse_credits;

use crate::app_state::AppState;

pub async fn results(State(state): State<AppState>, body: Bytes) -> Response {
    let credits = match parse_credits(&body) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(
                code = e.client_code().as_str(),
                bytes = body.len(),
                error = %e,
                "submission rejected"
            );
            return reject(&e);
        }
    };

    state.metrics().credit(&credits);
    tracing::debug!(
        plugin = %credits.labels.plugin,
        priority = %credits.labels.priority,
        target_app = %credits.labels.target_app,
        ran = credits.ran,
        time_seconds = credits.time_seconds,
        "submission credited"
    );

    StatusCode::OK.into_response()
}

/// Status from the error's client code, body is the bare reason text.
fn reject(e: &IqeError) -> Response {
    let status = StatusCode::from_u16(e.client_code().status_code())
        .unwrap_or(StatusCode::BAD_REQUEST);
    (status, e.reason().to_string()).into_response()
}
