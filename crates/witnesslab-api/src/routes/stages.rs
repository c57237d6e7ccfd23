//! Routes for stage orchestration and the research context panel.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;
use witnesslab_content::domain::bibliography::{
    BibliographyEntry, entries_for_stage, ref_number,
};
use witnesslab_content::domain::stages::{
    STAGES, StageContextContent, StageId, stage_by_id, stage_index, total_stages,
};
use witnesslab_session::domain::actions::ViewerAction;

use super::session::{SessionView, current_view};
use crate::error::ApiError;
use crate::state::AppState;

/// One stage in the registry listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub id: StageId,
    pub index: usize,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub badge_label: &'static str,
    pub teaser: &'static str,
    pub episode_file: &'static str,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageListResponse {
    pub stages: Vec<StageSummary>,
    pub total: usize,
    pub current_stage_id: StageId,
}

/// A cited work with its superscript number in the stage.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberedReference {
    pub ref_number: usize,
    #[serde(flatten)]
    pub entry: &'static BibliographyEntry,
}

/// Response body for GET /{stage_id}/context.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageContextResponse {
    pub stage_id: StageId,
    pub title: &'static str,
    pub context: &'static StageContextContent,
    pub references: Vec<NumberedReference>,
}

/// GET /
#[instrument(skip(state))]
async fn list_stages(State(state): State<AppState>) -> Json<StageListResponse> {
    let stages = STAGES
        .iter()
        .map(|stage| StageSummary {
            id: stage.id,
            index: stage_index(stage.id),
            title: stage.title,
            subtitle: stage.subtitle,
            badge_label: stage.badge_label,
            teaser: stage.teaser,
            episode_file: stage.episode_file,
        })
        .collect();

    Json(StageListResponse {
        stages,
        total: total_stages(),
        current_stage_id: state.session.snapshot().state.stage().current_stage_id,
    })
}

/// GET /{stage_id}/context
#[instrument]
async fn get_context(Path(stage_id): Path<String>) -> Result<Json<StageContextResponse>, ApiError> {
    let stage_id = StageId::parse(&stage_id)?;
    let stage = stage_by_id(stage_id);
    let references = entries_for_stage(stage_id)
        .into_iter()
        .map(|entry| NumberedReference {
            ref_number: ref_number(entry.id, stage_id),
            entry,
        })
        .collect();

    Ok(Json(StageContextResponse {
        stage_id,
        title: stage.title,
        context: &stage.context,
        references,
    }))
}

async fn apply(state: &AppState, action: ViewerAction) -> Result<Json<SessionView>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, ?action, "handling stage action");

    state.session.dispatch(action).await?;

    Ok(current_view(state))
}

/// POST /transition/open
#[instrument(skip(state))]
async fn open_transition(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, ViewerAction::OpenTransition).await
}

/// POST /transition/close
#[instrument(skip(state))]
async fn close_transition(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, ViewerAction::CloseTransition).await
}

/// POST /next
#[instrument(skip(state))]
async fn start_next_stage(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, ViewerAction::StartNextStage).await
}

/// POST /context/open
#[instrument(skip(state))]
async fn open_context(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, ViewerAction::OpenContext).await
}

/// POST /context/close
#[instrument(skip(state))]
async fn close_context(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    apply(&state, ViewerAction::CloseContext).await
}

/// Returns the router for stage orchestration.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_stages))
        .route("/{stage_id}/context", get(get_context))
        .route("/transition/open", post(open_transition))
        .route("/transition/close", post(close_transition))
        .route("/next", post(start_next_stage))
        .route("/context/open", post(open_context))
        .route("/context/close", post(close_context))
}
