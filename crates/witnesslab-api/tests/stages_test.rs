//! Integration tests for the stage routes.

mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn answer(app: &common::TestApp, prompt_id: &str, choice_id: &str) {
    let body = json!({ "promptId": prompt_id, "choiceId": choice_id });
    let (status, _) = common::post_json(app, "/api/v1/session/choices", &body).await;
    assert_eq!(status, StatusCode::OK);
}

/// Walks episode-001 to its checkpoint.
async fn complete_first_stage(app: &common::TestApp) {
    common::advance_times(app, 3).await;
    answer(app, "e001-p01", "e001-p01-b").await;
    common::advance_times(app, 4).await;
    answer(app, "e001-p02", "e001-p02-c").await;
    common::advance_times(app, 3).await;
}

#[tokio::test]
async fn test_list_stages_in_order() {
    // Arrange
    let app = common::build_test_app().await;

    // Act
    let (status, json) = common::get_json(&app, "/api/v1/stages").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 2);
    assert_eq!(json["currentStageId"], "stage-1");
    assert_eq!(json["stages"][0]["id"], "stage-1");
    assert_eq!(json["stages"][0]["episodeFile"], "episode-001");
    assert_eq!(json["stages"][1]["index"], 1);
    assert_eq!(json["stages"][1]["episodeFile"], "episode-002");
}

#[tokio::test]
async fn test_stage_context_numbers_references() {
    // Arrange
    let app = common::build_test_app().await;

    // Act
    let (status, json) = common::get_json(&app, "/api/v1/stages/stage-2/context").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stageId"], "stage-2");
    let references = json["references"].as_array().unwrap();
    assert_eq!(references.len(), 3);
    assert_eq!(references[0]["refNumber"], 1);
    assert_eq!(references[0]["shortCitation"], "Bareikytė & Makhortykh, 2024");
    assert_eq!(references[2]["refNumber"], 3);
}

#[tokio::test]
async fn test_unknown_stage_context_returns_404() {
    // Arrange
    let app = common::build_test_app().await;

    // Act
    let (status, json) = common::get_json(&app, "/api/v1/stages/stage-9/context").await;

    // Assert
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "stage_not_found");
}

#[tokio::test]
async fn test_reaching_checkpoint_completes_stage() {
    // Arrange
    let app = common::build_test_app().await;

    // Act
    complete_first_stage(&app).await;
    let (_, json) = common::get_json(&app, "/api/v1/session").await;

    // Assert
    assert_eq!(json["progressIndex"], 12);
    assert_eq!(json["isAtEnd"], true);
    assert_eq!(json["stage"]["status"], "completed");
    assert_eq!(json["witnessingProfile"]["SA"], 1);
    assert_eq!(json["witnessingProfile"]["CC"], 1);
}

#[tokio::test]
async fn test_transition_and_context_panels_toggle() {
    // Arrange
    let app = common::build_test_app().await;

    // Act
    let (_, opened) = common::post_empty(&app, "/api/v1/stages/transition/open").await;
    let (_, closed) = common::post_empty(&app, "/api/v1/stages/transition/close").await;
    let (_, context) = common::post_empty(&app, "/api/v1/stages/context/open").await;

    // Assert
    assert_eq!(opened["stage"]["isTransitionOpen"], true);
    assert_eq!(closed["stage"]["isTransitionOpen"], false);
    assert_eq!(context["stage"]["isContextOpen"], true);
}

#[tokio::test]
async fn test_next_stage_loads_its_episode() {
    // Arrange
    let app = common::build_test_app().await;
    complete_first_stage(&app).await;
    common::post_empty(&app, "/api/v1/stages/transition/open").await;

    // Act
    let (status, json) = common::post_empty(&app, "/api/v1/stages/next").await;
    let snapshot = app
        .session
        .wait_for(|s| s.state.episode().episode_id() == Some("episode-002"))
        .await
        .unwrap();

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"]["id"], "stage-2");
    assert_eq!(json["stage"]["isTransitionOpen"], false);
    assert_eq!(json["stage"]["hasNextStage"], false);
    assert_eq!(snapshot.state.episode().events().len(), 11);
    assert_eq!(snapshot.state.episode().progress_index(), 0);
}

#[tokio::test]
async fn test_next_stage_is_ignored_while_stage_in_progress() {
    // Arrange
    let app = common::build_test_app().await;
    common::advance_times(&app, 2).await;

    // Act
    let (status, json) = common::post_empty(&app, "/api/v1/stages/next").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stage"]["id"], "stage-1");
    assert_eq!(json["stage"]["status"], "in_progress");
    assert_eq!(json["episodeId"], "episode-001");
    assert_eq!(json["progressIndex"], 2);
}
