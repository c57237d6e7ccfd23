//! Liveness check for the Witness Lab API.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Body of `GET /health`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// Whether the session currently holds a loaded episode.
    pub episode_loaded: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        episode_loaded: state.session.snapshot().state.episode().is_loaded(),
    })
}

/// Router for the liveness check.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
