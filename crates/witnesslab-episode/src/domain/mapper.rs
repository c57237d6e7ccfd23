//! Episode mapper: authored document to ordered feed events.

use witnesslab_content::domain::document::{EpisodeDocument, EpisodeUnit};

use super::events::{
    CheckpointPayload, Event, EventPayload, Message, Phase, PromptChoice, PromptPayload,
    RevealPayload,
};

/// Display name of the viewer when no other is configured.
pub const DEFAULT_CURRENT_USER: &str = "Miguel";

/// Generic reveal title, replaced by the reveal builder after an answer.
pub const REVEAL_TITLE: &str = "Insight";

/// Title of every checkpoint card.
pub const CHECKPOINT_TITLE: &str = "Checkpoint";

/// Mapping options.
#[derive(Debug, Clone)]
pub struct MapperOptions {
    /// Author name shown for the `user` speaker code.
    pub current_user: String,
}

impl Default for MapperOptions {
    fn default() -> Self {
        Self {
            current_user: DEFAULT_CURRENT_USER.to_owned(),
        }
    }
}

/// Translates a speaker code into a display author. Unrecognised codes pass
/// through unchanged.
#[must_use]
pub fn speaker_to_author(speaker: &str, options: &MapperOptions) -> String {
    match speaker {
        "channel" => "Channel".to_owned(),
        "user" => options.current_user.clone(),
        "mod" => "Mod".to_owned(),
        "system" => "System".to_owned(),
        other => other.to_owned(),
    }
}

/// Maps an authored episode to feed events, preserving array order exactly.
#[must_use]
pub fn map_episode_to_events(episode: &EpisodeDocument, options: &MapperOptions) -> Vec<Event> {
    episode
        .events
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let payload = match unit {
                EpisodeUnit::Message(m) => EventPayload::Message(Message {
                    id: index + 1,
                    author: speaker_to_author(&m.speaker, options),
                    timestamp: m.ts.clone(),
                    phase: Phase::default(),
                    text: m.text.clone(),
                    reply_to_id: None,
                }),
                EpisodeUnit::Prompt(p) => EventPayload::Prompt(PromptPayload {
                    prompt_id: p.id.clone(),
                    question: p.question.clone(),
                    choices: p
                        .choices
                        .iter()
                        .map(|c| PromptChoice {
                            id: c.id.clone(),
                            text: c.text.clone(),
                            tag: c.tag.clone(),
                            on_select: c.on_select.clone(),
                        })
                        .collect(),
                }),
                EpisodeUnit::Reveal(r) => EventPayload::Reveal(RevealPayload {
                    title: REVEAL_TITLE.to_owned(),
                    content: r.text.clone(),
                    tags: r.tags.clone(),
                    ref_ids: r.ref_ids.clone(),
                }),
                EpisodeUnit::Checkpoint(c) => EventPayload::Checkpoint(CheckpointPayload {
                    title: CHECKPOINT_TITLE.to_owned(),
                    summary: c.text.clone(),
                }),
            };
            Event {
                id: unit.id().to_owned(),
                timestamp: Some(unit.ts().to_owned()),
                payload,
            }
        })
        .collect()
}
