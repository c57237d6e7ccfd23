//! Routes for static content: authored episodes, taxonomy, methodology,
//! and the local telemetry log.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, instrument};
use witnesslab_content::domain::bibliography::{
    BibliographyEntry, METHODOLOGY_GROUPS, entry,
};
use witnesslab_content::domain::document::EpisodeDocument;
use witnesslab_core::telemetry::TelemetryEntry;
use witnesslab_witnessing::taxonomy::{TaxonomyEntry, WitnessTag};

use crate::error::ApiError;
use crate::state::AppState;

/// One taxonomy tag with its display text.
#[derive(Debug, Serialize)]
pub struct TaxonomyItem {
    pub code: &'static str,
    #[serde(flatten)]
    pub entry: &'static TaxonomyEntry,
}

/// A methodology group with its entries resolved.
#[derive(Debug, Serialize)]
pub struct MethodologyGroupView {
    pub id: &'static str,
    pub title: &'static str,
    pub entries: Vec<&'static BibliographyEntry>,
}

/// Response body for GET /telemetry.
#[derive(Debug, Serialize)]
pub struct TelemetryLogResponse {
    pub entries: Vec<TelemetryEntry>,
}

/// GET /episodes/{episode_id}
#[instrument(skip(state))]
async fn get_episode(
    State(state): State<AppState>,
    Path(episode_id): Path<String>,
) -> Result<Json<EpisodeDocument>, ApiError> {
    let document = state.loader.load(&episode_id).await?;
    info!(events = document.events.len(), "serving authored episode");
    Ok(Json(document))
}

/// GET /taxonomy
async fn get_taxonomy() -> Json<Vec<TaxonomyItem>> {
    Json(
        WitnessTag::ALL
            .iter()
            .map(|tag| TaxonomyItem {
                code: tag.code(),
                entry: tag.entry(),
            })
            .collect(),
    )
}

/// GET /methodology
async fn get_methodology() -> Json<Vec<MethodologyGroupView>> {
    Json(
        METHODOLOGY_GROUPS
            .iter()
            .map(|group| MethodologyGroupView {
                id: group.id,
                title: group.title,
                entries: group.entry_ids.iter().map(|id| entry(*id)).collect(),
            })
            .collect(),
    )
}

/// GET /telemetry
#[instrument(skip(state))]
async fn get_telemetry(State(state): State<AppState>) -> Json<TelemetryLogResponse> {
    Json(TelemetryLogResponse {
        entries: state.telemetry_log.entries().await,
    })
}

/// Returns the router for static content.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/episodes/{episode_id}", get(get_episode))
        .route("/taxonomy", get(get_taxonomy))
        .route("/methodology", get(get_methodology))
        .route("/telemetry", get(get_telemetry))
}
