//! Axum router wiring.
//!
//! - `POST /results` : ingest one test-run submission
//! - `GET /metrics`  : scrape
//! - `GET /healthz`  : liveness

use axum::{routing::{get, post}, Router};

use crate::{app_state::AppState, ingest, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/results", post(ingest::results))
        .route("/metrics", get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .with_state(state)
}
