//! Routes for the viewer session: feed, progression, and choices.

use std::collections::BTreeMap;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use witnesslab_content::domain::stages::{StageId, stage_index, total_stages};
use witnesslab_episode::application::feed::{FeedItem, project_feed};
use witnesslab_episode::domain::run::{Answer, Gating};
use witnesslab_session::application::runtime::SessionSnapshot;
use witnesslab_session::domain::stage::StageStatus;
use witnesslab_witnessing::profile::WitnessingProfile;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /choices.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectChoiceRequest {
    pub prompt_id: String,
    pub choice_id: String,
}

/// Stage position as shown alongside the feed.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageProgressView {
    pub id: StageId,
    pub title: &'static str,
    /// 1-based position.
    pub number: usize,
    pub total: usize,
    pub status: StageStatus,
    pub is_transition_open: bool,
    pub is_context_open: bool,
    pub has_next_stage: bool,
}

/// Response body describing the whole session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub stage: StageProgressView,
    pub episode_id: Option<String>,
    pub progress_index: usize,
    pub total_events: usize,
    pub locked_prompt_id: Option<String>,
    pub is_at_end: bool,
    pub feed: Vec<FeedItem>,
    pub answers: BTreeMap<String, Answer>,
    pub witnessing_profile: WitnessingProfile,
    pub gating: Gating,
    pub load_error: Option<String>,
}

impl From<&SessionSnapshot> for SessionView {
    fn from(snapshot: &SessionSnapshot) -> Self {
        let viewer = &snapshot.state;
        let stage = viewer.stage();
        let episode = viewer.episode();
        Self {
            stage: StageProgressView {
                id: stage.current_stage_id,
                title: viewer.current_stage().title,
                number: stage_index(stage.current_stage_id) + 1,
                total: total_stages(),
                status: stage.stage_status,
                is_transition_open: stage.is_transition_open,
                is_context_open: stage.is_context_open,
                has_next_stage: viewer.has_next_stage(),
            },
            episode_id: episode.episode_id().map(str::to_owned),
            progress_index: episode.progress_index(),
            total_events: episode.events().len(),
            locked_prompt_id: episode.locked_prompt_id().map(str::to_owned),
            is_at_end: episode.is_at_end(),
            feed: project_feed(episode),
            answers: episode.answers().clone(),
            witnessing_profile: episode.witnessing_profile().clone(),
            gating: episode.gating(),
            load_error: snapshot.load_error.clone(),
        }
    }
}

/// The current session as a response body.
pub(crate) fn current_view(state: &AppState) -> Json<SessionView> {
    Json(SessionView::from(&state.session.snapshot()))
}

/// GET /
#[instrument(skip(state))]
async fn get_session(State(state): State<AppState>) -> Json<SessionView> {
    current_view(&state)
}

/// POST /advance
#[instrument(skip(state))]
async fn advance(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling advance");

    state.session.advance().await?;

    Ok(current_view(&state))
}

/// POST /choices
#[instrument(
    skip(state, request),
    fields(prompt_id = %request.prompt_id, choice_id = %request.choice_id)
)]
async fn select_choice(
    State(state): State<AppState>,
    Json(request): Json<SelectChoiceRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling select_choice");

    state
        .session
        .select_choice(&request.prompt_id, &request.choice_id)
        .await?;

    Ok(current_view(&state))
}

/// PUT /gating
#[instrument(skip(state, gating))]
async fn set_gating(
    State(state): State<AppState>,
    Json(gating): Json<Gating>,
) -> Result<Json<SessionView>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(
        %correlation_id,
        sensitive_mode = gating.sensitive_mode,
        progress_lock = gating.progress_lock,
        "handling set_gating"
    );

    state.session.set_gating(gating).await?;

    Ok(current_view(&state))
}

/// POST /reset
#[instrument(skip(state))]
async fn reset(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling reset");

    state.session.reset().await?;

    Ok(current_view(&state))
}

/// POST /dropoff
#[instrument(skip(state))]
async fn dropoff(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling dropoff");

    state.session.report_dropoff().await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /episodes/{episode_id}
#[instrument(skip(state))]
async fn load_episode(
    State(state): State<AppState>,
    Path(episode_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
    let correlation_id = Uuid::new_v4();
    info!(%correlation_id, "handling load_episode");

    state.session.load_episode(&episode_id).await?;

    Ok(current_view(&state))
}

/// Returns the router for the session.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_session))
        .route("/advance", post(advance))
        .route("/choices", post(select_choice))
        .route("/gating", put(set_gating))
        .route("/reset", post(reset))
        .route("/dropoff", post(dropoff))
        .route("/episodes/{episode_id}", post(load_episode))
}
