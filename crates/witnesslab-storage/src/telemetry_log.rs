//! Local, append-only telemetry log.
//!
//! Entries are kept as a JSON array under a single key. The array is capped
//! at [`MAX_ENTRIES`]; the oldest entries are dropped first. Nothing here
//! ever reports failure to the caller.

use std::sync::Arc;

use async_trait::async_trait;
use witnesslab_core::clock::Clock;
use witnesslab_core::store::KeyValueStore;
use witnesslab_core::telemetry::{TelemetryEntry, TelemetrySink};

/// Storage key for the telemetry log.
pub const TELEMETRY_KEY: &str = "witnessLabTelemetry";

/// Maximum number of entries retained.
pub const MAX_ENTRIES: usize = 500;

/// A `TelemetrySink` that appends to a capped log in a `KeyValueStore`.
pub struct LocalTelemetryLog {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LocalTelemetryLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTelemetryLog").finish_non_exhaustive()
    }
}

impl LocalTelemetryLog {
    /// Creates a log over `store`, stamping entries with `clock`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Reads the current log. Absent, unreadable, or malformed logs read as
    /// empty.
    pub async fn entries(&self) -> Vec<TelemetryEntry> {
        let raw = match self.store.get(TELEMETRY_KEY).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::debug!(error = %err, "telemetry log unreadable");
                return Vec::new();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "telemetry log malformed, starting over");
            Vec::new()
        })
    }
}

#[async_trait]
impl TelemetrySink for LocalTelemetryLog {
    async fn track(&self, event_name: &str, payload: serde_json::Value) {
        let mut entries = self.entries().await;
        entries.push(TelemetryEntry {
            event_name: event_name.to_owned(),
            payload,
            ts: self.clock.now().timestamp_millis(),
        });
        if entries.len() > MAX_ENTRIES {
            let overflow = entries.len() - MAX_ENTRIES;
            entries.drain(..overflow);
        }

        let serialized = match serde_json::to_string(&entries) {
            Ok(serialized) => serialized,
            Err(err) => {
                tracing::debug!(error = %err, "telemetry entry not serializable");
                return;
            }
        };
        if let Err(err) = self.store.set(TELEMETRY_KEY, &serialized).await {
            tracing::debug!(error = %err, event_name, "telemetry write dropped");
        }
    }
}
