//! Device-local persistence of stage position.

use tracing::{debug, warn};
use witnesslab_core::store::KeyValueStore;

use crate::domain::stage::{PersistedStageState, StageRunState};

/// Storage key of the stage record.
pub const STAGE_STATE_KEY: &str = "witnessLabStageState:v1";

/// Reads the stored stage position. Any failure reads as "none".
pub async fn load_stage_state(store: &dyn KeyValueStore) -> Option<PersistedStageState> {
    let raw = match store.get(STAGE_STATE_KEY).await {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "failed to read persisted stage state");
            return None;
        }
    };
    serde_json::from_str(&raw)
        .inspect_err(|e| warn!(error = %e, "discarding unreadable persisted stage state"))
        .ok()
}

/// Writes stage position whenever it changes.
#[derive(Debug, Default)]
pub struct StagePersistence {
    last_written: Option<PersistedStageState>,
}

impl StagePersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists `stage` if it differs from the last record written.
    pub async fn sync(&mut self, store: &dyn KeyValueStore, stage: &StageRunState) -> bool {
        let record = stage.to_persisted();
        if self.last_written == Some(record) {
            return false;
        }
        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize stage state");
                return false;
            }
        };
        if let Err(e) = store.set(STAGE_STATE_KEY, &raw).await {
            warn!(error = %e, "failed to persist stage state");
            return false;
        }
        debug!(stage_id = %record.current_stage_id, "stage state persisted");
        self.last_written = Some(record);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::StageStatus;
    use witnesslab_content::domain::stages::StageId;
    use witnesslab_test_support::{FailingStore, InMemoryStore};

    #[tokio::test]
    async fn test_sync_then_load_round_trips_stage_position() {
        // Arrange
        let store = InMemoryStore::new();
        let mut persistence = StagePersistence::new();
        let stage = StageRunState {
            current_stage_id: StageId::Stage2,
            stage_status: StageStatus::Completed,
            is_transition_open: true,
            is_context_open: false,
        };

        // Act
        let written = persistence.sync(&store, &stage).await;
        let restored = load_stage_state(&store).await;

        // Assert
        assert!(written);
        assert_eq!(
            store.raw(STAGE_STATE_KEY).as_deref(),
            Some(r#"{"currentStageId":"stage-2","stageStatus":"completed"}"#)
        );
        assert_eq!(restored, Some(stage.to_persisted()));
    }

    #[tokio::test]
    async fn test_sync_ignores_overlay_only_changes() {
        // Arrange
        let store = InMemoryStore::new();
        let mut persistence = StagePersistence::new();
        let mut stage = StageRunState::default();
        persistence.sync(&store, &stage).await;

        // Act
        stage.is_context_open = true;
        let written = persistence.sync(&store, &stage).await;

        // Assert
        assert!(!written);
        assert_eq!(store.write_count(STAGE_STATE_KEY), 1);
    }

    #[tokio::test]
    async fn test_failures_read_as_no_state() {
        let unreadable = InMemoryStore::with_value(STAGE_STATE_KEY, r#"{"currentStageId":"stage-9"}"#);

        assert!(load_stage_state(&unreadable).await.is_none());
        assert!(load_stage_state(&FailingStore).await.is_none());
        assert!(!StagePersistence::new().sync(&FailingStore, &StageRunState::default()).await);
    }
}
