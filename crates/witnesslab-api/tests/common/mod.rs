//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use tower::ServiceExt;
use witnesslab_content::application::loader::{BundledEpisodeLoader, EpisodeLoader};
use witnesslab_core::clock::Clock;
use witnesslab_core::store::KeyValueStore;
use witnesslab_session::application::runtime::{
    RuntimeConfig, SessionDeps, SessionHandle, SessionRuntime,
};
use witnesslab_storage::telemetry_log::LocalTelemetryLog;
use witnesslab_test_support::{FixedClock, InMemoryStore};

use witnesslab_api::state::AppState;

/// Fixed timestamp used across all integration tests.
fn fixed_clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()))
}

/// A router plus the session behind it.
pub struct TestApp {
    pub router: Router,
    pub session: SessionHandle,
}

/// Build the full app over an in-memory store and bundled episodes, and
/// wait for the first stage's episode to load. Pacing is slow enough that
/// it never fires during a test.
pub async fn build_test_app() -> TestApp {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let clock = fixed_clock();
    let loader: Arc<dyn EpisodeLoader> = Arc::new(BundledEpisodeLoader);
    let telemetry_log = Arc::new(LocalTelemetryLog::new(Arc::clone(&store), Arc::clone(&clock)));

    let session = SessionRuntime::start(
        SessionDeps {
            store,
            loader: Arc::clone(&loader),
            telemetry: telemetry_log.clone(),
            clock,
        },
        RuntimeConfig {
            tick_interval: Duration::from_secs(3600),
            ..RuntimeConfig::default()
        },
    )
    .await;
    session
        .wait_for(|s| s.state.episode().is_loaded())
        .await
        .unwrap();

    let app_state = AppState::new(session.clone(), loader, telemetry_log);
    TestApp {
        router: witnesslab_api::app(app_state),
        session,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a request with a JSON body and return the response.
pub async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: &TestApp,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    send_json(app, "POST", uri, body).await
}

/// Send a POST request without a body and return the response.
pub async fn post_empty(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: &TestApp, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// POST /advance `times` times.
pub async fn advance_times(app: &TestApp, times: usize) {
    for _ in 0..times {
        let (status, _) = post_empty(app, "/api/v1/session/advance").await;
        assert_eq!(status, StatusCode::OK);
    }
}
