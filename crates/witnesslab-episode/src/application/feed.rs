//! Feed projection: what the viewer sees, with reveal overrides applied.

use serde::Serialize;
use witnesslab_witnessing::reveal::{RevealOverride, RevealRequest, build_reveal};

use crate::domain::events::{Event, EventPayload};
use crate::domain::run::{Answer, EpisodeRunState};

/// One visible event of the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub index: usize,
    pub event: Event,
    pub is_current: bool,
    /// The recorded answer, for prompts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<Answer>,
    /// Replaces the reveal's authored content when it follows an answered
    /// prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reveal_override: Option<RevealOverride>,
}

/// Projects the visible events of `run` into feed items.
#[must_use]
pub fn project_feed(run: &EpisodeRunState) -> Vec<FeedItem> {
    let visible = run.visible_events();
    let episode_id = run.episode_id().unwrap_or_default();

    visible
        .iter()
        .enumerate()
        .map(|(index, event)| {
            let answer = event
                .as_prompt()
                .and_then(|prompt| run.answer(&prompt.prompt_id))
                .cloned();

            let reveal_override = match event.payload {
                EventPayload::Reveal(_) => index
                    .checked_sub(1)
                    .and_then(|previous| visible[previous].as_prompt())
                    .and_then(|prompt| {
                        let answer = run.answer(&prompt.prompt_id)?;
                        Some(build_reveal(&RevealRequest {
                            tag: &answer.tag,
                            episode_id,
                            prompt_id: &prompt.prompt_id,
                            choice_id: &answer.choice_id,
                        }))
                    }),
                _ => None,
            };

            FeedItem {
                index,
                event: event.clone(),
                is_current: index == run.progress_index(),
                answer,
                reveal_override,
            }
        })
        .collect()
}
