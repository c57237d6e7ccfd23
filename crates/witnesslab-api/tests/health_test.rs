//! Integration test for the health endpoint.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_reports_service_and_loaded_episode() {
    // Arrange
    let app = common::build_test_app().await;

    // Act
    let (status, json) = common::get_json(&app, "/health").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "witnesslab-api");
    assert!(json["version"].is_string());
    assert_eq!(json["episodeLoaded"], true);
}
