//! Shared application state.

use std::sync::Arc;

use witnesslab_content::application::loader::EpisodeLoader;
use witnesslab_session::application::runtime::SessionHandle;
use witnesslab_storage::telemetry_log::LocalTelemetryLog;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The viewer session.
    pub session: SessionHandle,
    /// Loader used to serve authored documents directly.
    pub loader: Arc<dyn EpisodeLoader>,
    /// Local telemetry log, read back by the content routes.
    pub telemetry_log: Arc<LocalTelemetryLog>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        session: SessionHandle,
        loader: Arc<dyn EpisodeLoader>,
        telemetry_log: Arc<LocalTelemetryLog>,
    ) -> Self {
        Self {
            session,
            loader,
            telemetry_log,
        }
    }
}
