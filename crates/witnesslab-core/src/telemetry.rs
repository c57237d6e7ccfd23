//! Telemetry sink abstraction.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One entry of the local telemetry log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEntry {
    /// Event name, e.g. `CHOICE_SELECTED`.
    pub event_name: String,
    /// Event-specific payload.
    pub payload: serde_json::Value,
    /// Milliseconds since the Unix epoch when the entry was recorded.
    pub ts: i64,
}

/// A fire-and-forget sink for named telemetry events.
///
/// `track` is infallible from the caller's point of view: implementations
/// swallow their own failures so progression never blocks on telemetry.
#[async_trait]
pub trait TelemetrySink: Send + Sync {
    /// Records a named event.
    async fn track(&self, event_name: &str, payload: serde_json::Value);
}
