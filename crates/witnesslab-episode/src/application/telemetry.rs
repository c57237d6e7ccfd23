//! Telemetry tracker: derives named events from run transitions.
//!
//! The tracker is a pure observer. It is fed each new run snapshot and the
//! current time and returns the records to hand to a telemetry sink. Its
//! memory resets whenever the episode id changes.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde_json::{Value, json};

use crate::domain::events::PromptChoice;
use crate::domain::run::EpisodeRunState;

pub const EPISODE_STARTED: &str = "EPISODE_STARTED";
pub const EPISODE_COMPLETED: &str = "EPISODE_COMPLETED";
pub const PROMPT_SHOWN: &str = "PROMPT_SHOWN";
pub const SEGMENT_TIME: &str = "SEGMENT_TIME";
pub const CHOICE_SELECTED: &str = "CHOICE_SELECTED";
pub const DROPOFF: &str = "DROPOFF";

/// A named telemetry event ready for a sink.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub event_name: &'static str,
    pub payload: Value,
}

impl TelemetryRecord {
    fn new(event_name: &'static str, payload: Value) -> Self {
        Self {
            event_name,
            payload,
        }
    }
}

#[derive(Debug, Default)]
pub struct EpisodeTelemetryTracker {
    episode_id: Option<String>,
    started: bool,
    completed: bool,
    shown_prompts: HashSet<String>,
    prev_progress: usize,
    segment_start: Option<DateTime<Utc>>,
}

impl EpisodeTelemetryTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Observes the run after a transition.
    pub fn observe(&mut self, run: &EpisodeRunState, now: DateTime<Utc>) -> Vec<TelemetryRecord> {
        if run.episode_id() != self.episode_id.as_deref() {
            *self = Self {
                episode_id: run.episode_id().map(str::to_owned),
                segment_start: Some(now),
                ..Self::default()
            };
        }

        let mut records = Vec::new();
        let Some(episode_id) = run.episode_id() else {
            return records;
        };
        if !run.is_loaded() {
            return records;
        }
        let ts = now.timestamp_millis();
        let progress = run.progress_index();

        if !self.started {
            self.started = true;
            records.push(TelemetryRecord::new(
                EPISODE_STARTED,
                json!({ "episodeId": episode_id, "ts": ts }),
            ));
        }

        if run.is_at_end() && !self.completed {
            self.completed = true;
            records.push(TelemetryRecord::new(
                EPISODE_COMPLETED,
                json!({ "episodeId": episode_id, "ts": ts }),
            ));
        }

        if let Some(prompt) = run.current_event().and_then(|event| event.as_prompt())
            && self.shown_prompts.insert(prompt.prompt_id.clone())
        {
            records.push(TelemetryRecord::new(
                PROMPT_SHOWN,
                json!({
                    "episodeId": episode_id,
                    "promptId": prompt.prompt_id,
                    "index": progress,
                    "ts": ts,
                }),
            ));
        }

        if progress > self.prev_progress {
            let since = self.segment_start.unwrap_or(now);
            records.push(TelemetryRecord::new(
                SEGMENT_TIME,
                json!({
                    "episodeId": episode_id,
                    "fromIndex": self.prev_progress,
                    "toIndex": progress,
                    "ms": (now - since).num_milliseconds(),
                }),
            ));
            self.segment_start = Some(now);
            self.prev_progress = progress;
        }

        records
    }

    /// The record for a choice, read from the run before the choice is
    /// applied. `None` when no episode is set.
    #[must_use]
    pub fn choice_selected(
        run: &EpisodeRunState,
        prompt_id: &str,
        choice: &PromptChoice,
        now: DateTime<Utc>,
    ) -> Option<TelemetryRecord> {
        let episode_id = run.episode_id()?;
        Some(TelemetryRecord::new(
            CHOICE_SELECTED,
            json!({
                "episodeId": episode_id,
                "promptId": prompt_id,
                "choiceId": choice.id,
                "tag": choice.tag,
                "ts": now.timestamp_millis(),
            }),
        ))
    }

    /// The record for the viewer leaving. `None` when no episode is set.
    #[must_use]
    pub fn dropoff(run: &EpisodeRunState, now: DateTime<Utc>) -> Option<TelemetryRecord> {
        let episode_id = run.episode_id()?;
        Some(TelemetryRecord::new(
            DROPOFF,
            json!({
                "episodeId": episode_id,
                "lastIndex": run.progress_index(),
                "ts": now.timestamp_millis(),
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::domain::actions::EpisodeAction;
    use crate::domain::run::tests::{choice, loaded, message, prompt, scenario_events};
    use witnesslab_core::reducer::Reducer;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(1_700_000_000_000 + ms).unwrap()
    }

    fn names(records: &[TelemetryRecord]) -> Vec<&'static str> {
        records.iter().map(|r| r.event_name).collect()
    }

    #[test]
    fn test_observe_emits_started_once_per_load() {
        // Arrange
        let mut tracker = EpisodeTelemetryTracker::new();
        let run = loaded("episode-001", scenario_events());

        // Act
        let first = tracker.observe(&run, at(0));
        let second = tracker.observe(&run, at(10));

        // Assert
        assert_eq!(names(&first), vec![EPISODE_STARTED]);
        assert!(second.is_empty());
        assert_eq!(first[0].payload["episodeId"], "episode-001");
    }

    #[test]
    fn test_observe_emits_prompt_shown_and_segment_time_on_advance() {
        // Arrange
        let mut tracker = EpisodeTelemetryTracker::new();
        let mut run = loaded("episode-001", scenario_events());
        tracker.observe(&run, at(0));

        // Act
        run.apply(&EpisodeAction::Advance);
        let records = tracker.observe(&run, at(2_000));

        // Assert
        assert_eq!(names(&records), vec![PROMPT_SHOWN, SEGMENT_TIME]);
        assert_eq!(records[0].payload["promptId"], "P1");
        assert_eq!(records[0].payload["index"], 1);
        assert_eq!(records[1].payload["fromIndex"], 0);
        assert_eq!(records[1].payload["toIndex"], 1);
        assert_eq!(records[1].payload["ms"], 2_000);
    }

    #[test]
    fn test_observe_emits_completed_once_at_last_event() {
        // Arrange
        let mut tracker = EpisodeTelemetryTracker::new();
        let mut run = loaded("episode-001", vec![message("m1"), message("m2")]);
        tracker.observe(&run, at(0));
        run.apply(&EpisodeAction::Advance);

        // Act
        let at_end = tracker.observe(&run, at(1_000));
        run.apply(&EpisodeAction::Advance);
        let again = tracker.observe(&run, at(2_000));

        // Assert
        assert_eq!(names(&at_end), vec![EPISODE_COMPLETED, SEGMENT_TIME]);
        assert!(again.is_empty());
    }

    #[test]
    fn test_prompt_shown_once_per_distinct_prompt() {
        // Arrange
        let mut tracker = EpisodeTelemetryTracker::new();
        let mut run = loaded("episode-001", vec![prompt("P1"), prompt("P2"), message("m1")]);

        // Act
        let first = tracker.observe(&run, at(0));
        let repeat = tracker.observe(&run, at(5));
        run.apply(&EpisodeAction::SelectChoice {
            prompt_id: "P1".to_owned(),
            choice: choice("a", "SI"),
        });
        let next = tracker.observe(&run, at(10));

        // Assert
        assert_eq!(names(&first), vec![EPISODE_STARTED, PROMPT_SHOWN]);
        assert!(repeat.is_empty());
        assert_eq!(names(&next), vec![PROMPT_SHOWN, SEGMENT_TIME]);
        assert_eq!(next[0].payload["promptId"], "P2");
    }

    #[test]
    fn test_memory_resets_when_episode_changes() {
        // Arrange
        let mut tracker = EpisodeTelemetryTracker::new();
        let first = loaded("episode-001", scenario_events());
        tracker.observe(&first, at(0));

        // Act
        let records = tracker.observe(&loaded("episode-002", scenario_events()), at(1));

        // Assert
        assert_eq!(names(&records), vec![EPISODE_STARTED]);
        assert_eq!(records[0].payload["episodeId"], "episode-002");
    }

    #[test]
    fn test_unloaded_run_emits_nothing() {
        let mut tracker = EpisodeTelemetryTracker::new();

        assert!(tracker.observe(&EpisodeRunState::new(), at(0)).is_empty());
        assert!(EpisodeTelemetryTracker::dropoff(&EpisodeRunState::new(), at(0)).is_none());
    }

    #[test]
    fn test_choice_and_dropoff_payloads() {
        // Arrange
        let mut run = loaded("episode-001", scenario_events());
        run.apply(&EpisodeAction::Advance);
        let now = at(0) + Duration::seconds(3);

        // Act
        let choice_record =
            EpisodeTelemetryTracker::choice_selected(&run, "P1", &choice("b", "CC"), now)
                .expect("episode loaded");
        let dropoff = EpisodeTelemetryTracker::dropoff(&run, now).expect("episode loaded");

        // Assert
        assert_eq!(choice_record.event_name, CHOICE_SELECTED);
        assert_eq!(
            choice_record.payload,
            json!({
                "episodeId": "episode-001",
                "promptId": "P1",
                "choiceId": "b",
                "tag": "CC",
                "ts": now.timestamp_millis(),
            })
        );
        assert_eq!(dropoff.payload["lastIndex"], 1);
    }
}
