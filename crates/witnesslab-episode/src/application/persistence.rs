//! Best-effort, device-local persistence of the episode run.

use tracing::{debug, warn};
use witnesslab_core::store::KeyValueStore;

use crate::domain::run::{EpisodeRunState, PersistedEpisodeState};

/// Storage key of the persisted run record.
pub const EPISODE_STATE_KEY: &str = "witnessLabEpisodeState:v1";

/// Reads the persisted run record.
///
/// Absence, a parse failure, and a store failure all read as "no prior
/// state".
pub async fn load_persisted(store: &dyn KeyValueStore) -> Option<PersistedEpisodeState> {
    let raw = match store.get(EPISODE_STATE_KEY).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(error = %e, "failed to read persisted episode state");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "discarding unreadable persisted episode state");
            None
        }
    }
}

/// Writes the run record after each transition that changed it.
#[derive(Debug, Default)]
pub struct EpisodePersistence {
    last_written: Option<PersistedEpisodeState>,
}

impl EpisodePersistence {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Persists `run` if an episode is set and the record differs from the
    /// last one written. Returns whether a write happened. Failures are
    /// logged and swallowed.
    pub async fn sync(&mut self, store: &dyn KeyValueStore, run: &EpisodeRunState) -> bool {
        let Some(record) = run.to_persisted() else {
            return false;
        };
        if self.last_written.as_ref() == Some(&record) {
            return false;
        }

        let raw = match serde_json::to_string(&record) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(error = %e, "failed to serialize episode state");
                return false;
            }
        };
        if let Err(e) = store.set(EPISODE_STATE_KEY, &raw).await {
            warn!(error = %e, episode_id = %record.episode_id, "failed to persist episode state");
            return false;
        }

        debug!(
            episode_id = %record.episode_id,
            progress_index = record.progress_index,
            "episode state persisted"
        );
        self.last_written = Some(record);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::actions::EpisodeAction;
    use crate::domain::run::tests::{loaded, scenario_events};
    use witnesslab_core::reducer::Reducer;
    use witnesslab_test_support::{FailingStore, InMemoryStore};

    #[tokio::test]
    async fn test_load_persisted_reads_camel_case_record() {
        // Arrange
        let raw = r#"{
            "episodeId": "episode-001",
            "progressIndex": 2,
            "lockedPromptId": null,
            "answersByPromptId": {
                "P1": {"choiceId": "a", "choiceText": "Ask", "tag": "SI"}
            },
            "witnessingProfile": {"SI": 1},
            "gating": {"sensitiveMode": false, "progressLock": false}
        }"#;
        let store = InMemoryStore::with_value(EPISODE_STATE_KEY, raw);

        // Act
        let record = load_persisted(&store).await;

        // Assert
        let record = record.expect("record should parse");
        assert_eq!(record.episode_id, "episode-001");
        assert_eq!(record.progress_index, 2);
        assert_eq!(record.answers_by_prompt_id["P1"].choice_id, "a");
        assert_eq!(record.witnessing_profile.count("SI"), 1);
    }

    #[tokio::test]
    async fn test_load_persisted_treats_garbage_as_absent() {
        let store = InMemoryStore::with_value(EPISODE_STATE_KEY, "{not json");

        assert!(load_persisted(&store).await.is_none());
    }

    #[tokio::test]
    async fn test_load_persisted_treats_store_failure_as_absent() {
        assert!(load_persisted(&FailingStore).await.is_none());
    }

    #[tokio::test]
    async fn test_sync_skips_unloaded_run() {
        // Arrange
        let store = InMemoryStore::new();
        let mut persistence = EpisodePersistence::new();

        // Act
        let written = persistence.sync(&store, &EpisodeRunState::new()).await;

        // Assert
        assert!(!written);
        assert!(store.raw(EPISODE_STATE_KEY).is_none());
    }

    #[tokio::test]
    async fn test_sync_writes_only_when_record_changes() {
        // Arrange
        let store = InMemoryStore::new();
        let mut persistence = EpisodePersistence::new();
        let mut run = loaded("episode-001", scenario_events());

        // Act
        persistence.sync(&store, &run).await;
        persistence.sync(&store, &run).await;
        run.apply(&EpisodeAction::Advance);
        persistence.sync(&store, &run).await;

        // Assert
        assert_eq!(store.write_count(EPISODE_STATE_KEY), 2);
        let restored = load_persisted(&store).await.expect("record written");
        assert_eq!(restored.progress_index, 1);
        assert_eq!(restored.locked_prompt_id.as_deref(), Some("P1"));
    }

    #[tokio::test]
    async fn test_sync_swallows_store_failure() {
        let mut persistence = EpisodePersistence::new();
        let run = loaded("episode-001", scenario_events());

        assert!(!persistence.sync(&FailingStore, &run).await);
    }
}
