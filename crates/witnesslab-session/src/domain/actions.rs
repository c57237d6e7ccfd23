//! Actions accepted by the viewer reducer.

use witnesslab_core::reducer::Action;
use witnesslab_episode::domain::actions::EpisodeAction;

use super::stage::PersistedStageState;

/// The closed set of viewer transitions.
#[derive(Debug, Clone)]
pub enum ViewerAction {
    /// A transition of the episode run.
    Episode(EpisodeAction),
    /// Restore stage position read from storage at startup.
    RestoreStage(PersistedStageState),
    CompleteStage,
    OpenTransition,
    CloseTransition,
    /// Move to the following stage, clearing the episode run. No-op on the
    /// last stage.
    StartNextStage,
    OpenContext,
    CloseContext,
    /// Reset both the episode run and stage progression.
    Reset,
}

impl Action for ViewerAction {
    fn action_type(&self) -> &'static str {
        match self {
            Self::Episode(action) => action.action_type(),
            Self::RestoreStage(_) => "stage.restore",
            Self::CompleteStage => "stage.complete",
            Self::OpenTransition => "stage.open_transition",
            Self::CloseTransition => "stage.close_transition",
            Self::StartNextStage => "stage.start_next",
            Self::OpenContext => "stage.open_context",
            Self::CloseContext => "stage.close_context",
            Self::Reset => "viewer.reset",
        }
    }
}

impl From<EpisodeAction> for ViewerAction {
    fn from(action: EpisodeAction) -> Self {
        Self::Episode(action)
    }
}
