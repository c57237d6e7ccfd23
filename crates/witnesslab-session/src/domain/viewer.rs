//! The combined viewer reducer: episode run plus stage progression.

use serde::Serialize;
use witnesslab_content::domain::stages::{StageDefinition, next_stage, stage_by_id};
use witnesslab_core::reducer::Reducer;
use witnesslab_episode::domain::actions::EpisodeAction;
use witnesslab_episode::domain::run::EpisodeRunState;

use super::actions::ViewerAction;
use super::stage::{StageRunState, StageStatus};

/// Everything one viewer sees. Mutated only through [`Reducer::apply`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    episode: EpisodeRunState,
    stage: StageRunState,
}

impl ViewerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn episode(&self) -> &EpisodeRunState {
        &self.episode
    }

    #[must_use]
    pub fn stage(&self) -> &StageRunState {
        &self.stage
    }

    /// Definition of the current stage.
    #[must_use]
    pub fn current_stage(&self) -> &'static StageDefinition {
        stage_by_id(self.stage.current_stage_id)
    }

    /// Whether a stage follows the current one.
    #[must_use]
    pub fn has_next_stage(&self) -> bool {
        next_stage(self.stage.current_stage_id).is_some()
    }

    fn start_next_stage(&mut self) {
        if self.stage.stage_status != StageStatus::Completed {
            return;
        }
        let Some(next) = next_stage(self.stage.current_stage_id) else {
            return;
        };
        self.stage.current_stage_id = next.id;
        self.stage.stage_status = StageStatus::InProgress;
        self.stage.is_transition_open = false;
        self.episode.apply(&EpisodeAction::Unload);
    }

    /// Completion is one-way and fires when the current event is a
    /// checkpoint.
    fn check_completion(&mut self) {
        if self.stage.stage_status == StageStatus::InProgress
            && self
                .episode
                .current_event()
                .is_some_and(|event| event.is_checkpoint())
        {
            self.stage.stage_status = StageStatus::Completed;
        }
    }
}

impl Reducer for ViewerState {
    type Action = ViewerAction;

    fn apply(&mut self, action: &Self::Action) {
        match action {
            ViewerAction::Episode(inner) => self.episode.apply(inner),
            ViewerAction::RestoreStage(persisted) => {
                self.stage = StageRunState {
                    current_stage_id: persisted.current_stage_id,
                    stage_status: persisted.stage_status,
                    ..StageRunState::default()
                };
            }
            ViewerAction::CompleteStage => self.stage.stage_status = StageStatus::Completed,
            ViewerAction::OpenTransition => self.stage.is_transition_open = true,
            ViewerAction::CloseTransition => self.stage.is_transition_open = false,
            ViewerAction::StartNextStage => self.start_next_stage(),
            ViewerAction::OpenContext => self.stage.is_context_open = true,
            ViewerAction::CloseContext => self.stage.is_context_open = false,
            ViewerAction::Reset => {
                self.episode.apply(&EpisodeAction::Reset);
                self.stage = StageRunState::default();
            }
        }
        self.check_completion();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::stage::PersistedStageState;
    use witnesslab_content::domain::stages::StageId;
    use witnesslab_episode::domain::events::{
        CheckpointPayload, Event, EventPayload, Message, Phase, PromptChoice, PromptPayload,
        RevealPayload,
    };

    fn event(id: &str, payload: EventPayload) -> Event {
        Event {
            id: id.to_owned(),
            timestamp: None,
            payload,
        }
    }

    pub(crate) fn choice(id: &str, tag: &str) -> PromptChoice {
        PromptChoice {
            id: id.to_owned(),
            text: format!("choice {id}"),
            tag: tag.to_owned(),
            on_select: String::new(),
        }
    }

    /// `[message, prompt P1, reveal R1, checkpoint]`
    pub(crate) fn scenario_events() -> Vec<Event> {
        vec![
            event(
                "m1",
                EventPayload::Message(Message {
                    id: 1,
                    author: "Channel".to_owned(),
                    timestamp: "08:00".to_owned(),
                    phase: Phase::Shock,
                    text: "Sirens again".to_owned(),
                    reply_to_id: None,
                }),
            ),
            event(
                "P1",
                EventPayload::Prompt(PromptPayload {
                    prompt_id: "P1".to_owned(),
                    question: "What do you do?".to_owned(),
                    choices: vec![choice("a", "SI"), choice("b", "CC")],
                }),
            ),
            event(
                "R1",
                EventPayload::Reveal(RevealPayload {
                    title: "Insight".to_owned(),
                    content: "authored".to_owned(),
                    tags: Vec::new(),
                    ref_ids: None,
                }),
            ),
            event(
                "c1",
                EventPayload::Checkpoint(CheckpointPayload {
                    title: "Checkpoint".to_owned(),
                    summary: "First hours".to_owned(),
                }),
            ),
        ]
    }

    fn load(state: &mut ViewerState, episode_id: &str) {
        state.apply(&ViewerAction::Episode(EpisodeAction::LoadEpisode {
            episode_id: episode_id.to_owned(),
            events: scenario_events(),
        }));
    }

    fn advance(state: &mut ViewerState) {
        state.apply(&EpisodeAction::Advance.into());
    }

    fn select(state: &mut ViewerState, choice_id: &str, tag: &str) {
        state.apply(&ViewerAction::Episode(EpisodeAction::SelectChoice {
            prompt_id: "P1".to_owned(),
            choice: choice(choice_id, tag),
        }));
    }

    #[test]
    fn test_scenario_runs_to_completed_stage() {
        // Arrange
        let mut state = ViewerState::new();
        load(&mut state, "episode-001");

        // Act / Assert
        advance(&mut state);
        assert_eq!(state.episode().progress_index(), 1);
        assert_eq!(state.episode().locked_prompt_id(), Some("P1"));

        advance(&mut state);
        assert_eq!(state.episode().progress_index(), 1);

        select(&mut state, "a", "SI");
        assert_eq!(state.episode().progress_index(), 2);
        assert_eq!(state.episode().witnessing_profile().count("SI"), 1);
        assert!(state.episode().locked_prompt_id().is_none());

        advance(&mut state);
        assert_eq!(state.episode().progress_index(), 3);
        assert_eq!(state.stage().stage_status, StageStatus::Completed);
    }

    #[test]
    fn test_completion_is_one_way() {
        // Arrange
        let mut state = ViewerState::new();
        load(&mut state, "episode-001");
        state.apply(&ViewerAction::CompleteStage);

        // Act
        advance(&mut state);
        state.apply(&ViewerAction::OpenContext);

        // Assert
        assert_eq!(state.stage().stage_status, StageStatus::Completed);
    }

    #[test]
    fn test_start_next_stage_clears_run_and_keeps_profile() {
        // Arrange
        let mut state = ViewerState::new();
        load(&mut state, "episode-001");
        advance(&mut state);
        select(&mut state, "b", "CC");
        advance(&mut state);
        state.apply(&ViewerAction::OpenTransition);

        // Act
        state.apply(&ViewerAction::StartNextStage);

        // Assert
        assert_eq!(state.stage().current_stage_id, StageId::Stage2);
        assert_eq!(state.stage().stage_status, StageStatus::InProgress);
        assert!(!state.stage().is_transition_open);
        assert!(state.episode().episode_id().is_none());
        assert!(state.episode().events().is_empty());
        assert!(state.episode().answers().is_empty());
        assert_eq!(state.episode().witnessing_profile().count("CC"), 1);
        assert_eq!(state.current_stage().episode_file, "episode-002");
    }

    #[test]
    fn test_start_next_stage_waits_for_completion() {
        // Arrange
        let mut state = ViewerState::new();
        load(&mut state, "episode-001");
        state.apply(&ViewerAction::OpenTransition);
        let before = state.clone();

        // Act
        state.apply(&ViewerAction::StartNextStage);

        // Assert
        assert_eq!(state.stage().stage_status, StageStatus::InProgress);
        assert_eq!(state.stage().current_stage_id, StageId::Stage1);
        assert_eq!(state.episode().episode_id(), Some("episode-001"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_start_next_stage_on_last_stage_is_noop() {
        // Arrange
        let mut state = ViewerState::new();
        state.apply(&ViewerAction::CompleteStage);
        state.apply(&ViewerAction::StartNextStage);
        load(&mut state, "episode-002");
        state.apply(&ViewerAction::CompleteStage);
        state.apply(&ViewerAction::OpenTransition);
        let before = state.clone();

        // Act
        state.apply(&ViewerAction::StartNextStage);

        // Assert
        assert!(!state.has_next_stage());
        assert_eq!(state, before);
    }

    #[test]
    fn test_overlay_toggles() {
        let mut state = ViewerState::new();

        state.apply(&ViewerAction::OpenContext);
        state.apply(&ViewerAction::OpenTransition);
        assert!(state.stage().is_context_open);
        assert!(state.stage().is_transition_open);

        state.apply(&ViewerAction::CloseContext);
        state.apply(&ViewerAction::CloseTransition);
        assert!(!state.stage().is_context_open);
        assert!(!state.stage().is_transition_open);
    }

    #[test]
    fn test_restore_stage_sets_position_and_closes_overlays() {
        // Arrange
        let mut state = ViewerState::new();
        state.apply(&ViewerAction::OpenContext);

        // Act
        state.apply(&ViewerAction::RestoreStage(PersistedStageState {
            current_stage_id: StageId::Stage2,
            stage_status: StageStatus::Completed,
        }));

        // Assert
        assert_eq!(state.stage().current_stage_id, StageId::Stage2);
        assert_eq!(state.stage().stage_status, StageStatus::Completed);
        assert!(!state.stage().is_context_open);
    }

    #[test]
    fn test_reset_returns_to_first_stage() {
        // Arrange
        let mut state = ViewerState::new();
        load(&mut state, "episode-001");
        state.apply(&ViewerAction::StartNextStage);

        // Act
        state.apply(&ViewerAction::Reset);

        // Assert
        assert_eq!(state, ViewerState::new());
    }
}
