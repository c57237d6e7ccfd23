//! Witness Lab API server entry point.

use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use witnesslab_api::config::AppConfig;
use witnesslab_api::error::AppError;
use witnesslab_api::state::AppState;
use witnesslab_content::application::loader::{
    BundledEpisodeLoader, DirectoryEpisodeLoader, EpisodeLoader,
};
use witnesslab_core::clock::{Clock, SystemClock};
use witnesslab_core::store::KeyValueStore;
use witnesslab_episode::domain::mapper::MapperOptions;
use witnesslab_session::application::runtime::{RuntimeConfig, SessionDeps, SessionRuntime};
use witnesslab_storage::sqlite_store::SqliteKeyValueStore;
use witnesslab_storage::telemetry_log::LocalTelemetryLog;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    tracing::info!("Starting Witness Lab API server");

    let config = AppConfig::from_env()?;

    let store: Arc<dyn KeyValueStore> =
        Arc::new(SqliteKeyValueStore::connect(&config.database_url).await?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let telemetry_log = Arc::new(LocalTelemetryLog::new(Arc::clone(&store), Arc::clone(&clock)));
    let loader: Arc<dyn EpisodeLoader> = match &config.content_dir {
        Some(dir) => {
            tracing::info!(content_dir = %dir.display(), "serving episodes from directory");
            Arc::new(DirectoryEpisodeLoader::new(dir.clone()))
        }
        None => Arc::new(BundledEpisodeLoader),
    };

    let session = SessionRuntime::start(
        SessionDeps {
            store,
            loader: Arc::clone(&loader),
            telemetry: telemetry_log.clone(),
            clock,
        },
        RuntimeConfig {
            tick_interval: config.tick_interval,
            mapper: MapperOptions {
                current_user: config.current_user.clone(),
            },
        },
    )
    .await;

    let app_state = AppState::new(session.clone(), loader, telemetry_log);

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = witnesslab_api::app(app_state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The process exiting is the viewer leaving.
    if let Err(e) = session.report_dropoff().await {
        tracing::warn!(error = %e, "failed to record drop-off");
    }
    if let Err(e) = session.shutdown().await {
        tracing::warn!(error = %e, "session runtime did not stop cleanly");
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
