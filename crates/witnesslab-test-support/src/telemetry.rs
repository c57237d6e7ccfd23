//! Test telemetry sink.

use std::sync::Mutex;

use async_trait::async_trait;
use witnesslab_core::telemetry::TelemetrySink;

/// A sink that records every tracked event in order.
#[derive(Debug, Default)]
pub struct RecordingTelemetrySink {
    events: Mutex<Vec<(String, serde_json::Value)>>,
}

impl RecordingTelemetrySink {
    /// Create an empty recording sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all recorded events.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the payloads recorded under `event_name`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn payloads(&self, event_name: &str) -> Vec<serde_json::Value> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == event_name)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

#[async_trait]
impl TelemetrySink for RecordingTelemetrySink {
    async fn track(&self, event_name: &str, payload: serde_json::Value) {
        self.events
            .lock()
            .unwrap()
            .push((event_name.to_owned(), payload));
    }
}
