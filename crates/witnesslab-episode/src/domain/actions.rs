//! Actions accepted by the episode run reducer.

use witnesslab_core::reducer::Action;

use super::events::{Event, PromptChoice};
use super::run::{Gating, PersistedEpisodeState};

/// The closed set of episode run transitions.
#[derive(Debug, Clone)]
pub enum EpisodeAction {
    /// Stash a restore payload read from storage at startup. It is applied
    /// by the next `LoadEpisode` for the same episode id and discarded by
    /// any other load.
    Hydrate(Option<PersistedEpisodeState>),
    /// Install an episode's events.
    LoadEpisode {
        /// The episode identifier.
        episode_id: String,
        /// Events in authored order.
        events: Vec<Event>,
    },
    /// Move to the next event unless gated or locked at a prompt.
    Advance,
    /// Answer a prompt and step past it.
    SelectChoice {
        /// The prompt being answered.
        prompt_id: String,
        /// The chosen answer.
        choice: PromptChoice,
    },
    /// A reveal was rendered. Accepted and ignored.
    RevealShown,
    /// Replace the gating flags.
    SetGating(Gating),
    /// Drop the loaded episode, keeping profile, gating, and any pending
    /// restore payload.
    Unload,
    /// Return to defaults, keeping only a pending restore payload.
    Reset,
}

impl Action for EpisodeAction {
    fn action_type(&self) -> &'static str {
        match self {
            Self::Hydrate(_) => "episode.hydrate",
            Self::LoadEpisode { .. } => "episode.load_episode",
            Self::Advance => "episode.advance",
            Self::SelectChoice { .. } => "episode.select_choice",
            Self::RevealShown => "episode.reveal_shown",
            Self::SetGating(_) => "episode.set_gating",
            Self::Unload => "episode.unload",
            Self::Reset => "episode.reset",
        }
    }
}
