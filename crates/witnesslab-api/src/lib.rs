//! Witness Lab — HTTP API.
//!
//! Exposes one viewer session over JSON: reading the feed, answering
//! prompts, moving between stages, and browsing static content.

use axum::Router;

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use crate::state::AppState;

/// Builds the full router. `main` adds the tracing and CORS layers.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1/session", routes::session::router())
        .nest("/api/v1/stages", routes::stages::router())
        .nest("/api/v1/content", routes::content::router())
        .with_state(state)
}
