//! The episode run: progression index, prompt gating, answers, profile.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use witnesslab_core::reducer::Reducer;
use witnesslab_witnessing::profile::WitnessingProfile;

use super::actions::EpisodeAction;
use super::events::{Event, PromptChoice};

/// The answer recorded for a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Answer {
    pub choice_id: String,
    pub choice_text: String,
    pub tag: String,
}

/// Flags that suppress automatic progression independently of prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gating {
    pub sensitive_mode: bool,
    pub progress_lock: bool,
}

/// The record written to device-local storage on every run change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedEpisodeState {
    pub episode_id: String,
    pub progress_index: usize,
    pub locked_prompt_id: Option<String>,
    pub answers_by_prompt_id: BTreeMap<String, Answer>,
    pub witnessing_profile: WitnessingProfile,
    pub gating: Gating,
}

/// State of the currently running episode.
///
/// Mutated only through [`Reducer::apply`]. Once events are loaded,
/// `progress_index` stays within `0..events.len()`, and a locked prompt is
/// always the current event and unanswered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeRunState {
    episode_id: Option<String>,
    events: Vec<Event>,
    progress_index: usize,
    locked_prompt_id: Option<String>,
    answers_by_prompt_id: BTreeMap<String, Answer>,
    witnessing_profile: WitnessingProfile,
    gating: Gating,
    #[serde(skip)]
    pending_hydrate: Option<PersistedEpisodeState>,
}

impl EpisodeRunState {
    /// Creates an unloaded run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn episode_id(&self) -> Option<&str> {
        self.episode_id.as_deref()
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn progress_index(&self) -> usize {
        self.progress_index
    }

    #[must_use]
    pub fn locked_prompt_id(&self) -> Option<&str> {
        self.locked_prompt_id.as_deref()
    }

    #[must_use]
    pub fn answers(&self) -> &BTreeMap<String, Answer> {
        &self.answers_by_prompt_id
    }

    #[must_use]
    pub fn answer(&self, prompt_id: &str) -> Option<&Answer> {
        self.answers_by_prompt_id.get(prompt_id)
    }

    #[must_use]
    pub fn witnessing_profile(&self) -> &WitnessingProfile {
        &self.witnessing_profile
    }

    #[must_use]
    pub fn gating(&self) -> Gating {
        self.gating
    }

    #[must_use]
    pub fn pending_hydrate(&self) -> Option<&PersistedEpisodeState> {
        self.pending_hydrate.as_ref()
    }

    /// Whether any events are loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        !self.events.is_empty()
    }

    /// The event at the progress index.
    #[must_use]
    pub fn current_event(&self) -> Option<&Event> {
        self.events.get(self.progress_index)
    }

    /// Events revealed so far: everything up to and including the current
    /// one.
    #[must_use]
    pub fn visible_events(&self) -> &[Event] {
        let end = (self.progress_index + 1).min(self.events.len());
        &self.events[..end]
    }

    /// Whether the last event has been reached.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.is_loaded() && self.progress_index + 1 >= self.events.len()
    }

    /// Finds a choice of a loaded prompt.
    #[must_use]
    pub fn find_choice(&self, prompt_id: &str, choice_id: &str) -> Option<&PromptChoice> {
        self.events
            .iter()
            .filter_map(Event::as_prompt)
            .find(|prompt| prompt.prompt_id == prompt_id)?
            .choices
            .iter()
            .find(|choice| choice.id == choice_id)
    }

    /// The storage record for this run, or `None` when no episode is set.
    #[must_use]
    pub fn to_persisted(&self) -> Option<PersistedEpisodeState> {
        Some(PersistedEpisodeState {
            episode_id: self.episode_id.clone()?,
            progress_index: self.progress_index,
            locked_prompt_id: self.locked_prompt_id.clone(),
            answers_by_prompt_id: self.answers_by_prompt_id.clone(),
            witnessing_profile: self.witnessing_profile.clone(),
            gating: self.gating,
        })
    }

    fn last_index(&self) -> usize {
        self.events.len().saturating_sub(1)
    }

    fn unanswered_prompt_at(&self, index: usize) -> Option<&str> {
        let prompt = self.events.get(index)?.as_prompt()?;
        (!self.answers_by_prompt_id.contains_key(&prompt.prompt_id))
            .then_some(prompt.prompt_id.as_str())
    }

    fn load(&mut self, episode_id: &str, events: &[Event]) {
        let restore = self
            .pending_hydrate
            .take()
            .filter(|hydrate| hydrate.episode_id == episode_id);

        self.episode_id = Some(episode_id.to_owned());
        self.events = events.to_vec();
        match restore {
            Some(hydrate) => {
                self.progress_index = hydrate.progress_index.min(self.last_index());
                self.answers_by_prompt_id = hydrate.answers_by_prompt_id;
                self.witnessing_profile = hydrate.witnessing_profile;
                self.gating = hydrate.gating;
                // A lock only survives if it still names the current,
                // unanswered prompt.
                self.locked_prompt_id = hydrate.locked_prompt_id.filter(|locked| {
                    self.unanswered_prompt_at(self.progress_index) == Some(locked.as_str())
                });
            }
            None => {
                self.progress_index = 0;
                self.locked_prompt_id = None;
                self.answers_by_prompt_id = BTreeMap::new();
                self.witnessing_profile = WitnessingProfile::new();
                self.gating = Gating::default();
            }
        }
    }

    fn advance(&mut self) {
        if self.gating.progress_lock || self.locked_prompt_id.is_some() {
            return;
        }
        let next_index = self.progress_index + 1;
        if next_index >= self.events.len() {
            return;
        }
        self.locked_prompt_id = self.unanswered_prompt_at(next_index).map(str::to_owned);
        self.progress_index = next_index;
    }

    fn select_choice(&mut self, prompt_id: &str, choice: &PromptChoice) {
        self.answers_by_prompt_id.insert(
            prompt_id.to_owned(),
            Answer {
                choice_id: choice.id.clone(),
                choice_text: choice.text.clone(),
                tag: choice.tag.clone(),
            },
        );
        self.witnessing_profile.record(&choice.tag);

        // Re-answering an earlier prompt only rewrites its answer.
        let is_current = self
            .current_event()
            .and_then(Event::as_prompt)
            .is_some_and(|prompt| prompt.prompt_id == prompt_id);
        if !is_current {
            return;
        }
        self.locked_prompt_id = None;
        self.progress_index = (self.progress_index + 1).min(self.last_index());
    }
}

impl Reducer for EpisodeRunState {
    type Action = EpisodeAction;

    fn apply(&mut self, action: &Self::Action) {
        match action {
            EpisodeAction::Hydrate(payload) => {
                self.pending_hydrate.clone_from(payload);
            }
            EpisodeAction::LoadEpisode { episode_id, events } => {
                self.load(episode_id, events);
            }
            EpisodeAction::Advance => self.advance(),
            EpisodeAction::SelectChoice { prompt_id, choice } => {
                self.select_choice(prompt_id, choice);
            }
            EpisodeAction::RevealShown => {}
            EpisodeAction::SetGating(gating) => self.gating = *gating,
            EpisodeAction::Unload => {
                self.episode_id = None;
                self.events.clear();
                self.progress_index = 0;
                self.locked_prompt_id = None;
                self.answers_by_prompt_id.clear();
            }
            EpisodeAction::Reset => {
                *self = Self {
                    pending_hydrate: self.pending_hydrate.take(),
                    ..Self::default()
                };
            }
        }
    }
}
