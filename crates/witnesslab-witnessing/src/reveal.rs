//! Reveal builder: turns an answered prompt into insight content.
//!
//! Pure lookups over fixed tables. The builder never fails: unknown tags
//! fall back to the raw code and to generic text.

use serde::Serialize;

use crate::taxonomy::WitnessTag;

/// Care note used when neither a per-tag note nor taxonomy text applies.
pub const FALLBACK_CARE_NOTE: &str = "Consider impact before sharing.";

/// Context needed to build a reveal.
#[derive(Debug, Clone, Copy)]
pub struct RevealRequest<'a> {
    /// Tag of the chosen answer.
    pub tag: &'a str,
    pub episode_id: &'a str,
    pub prompt_id: &'a str,
    pub choice_id: &'a str,
}

/// Content that replaces a reveal's authored text for one render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealOverride {
    pub title: String,
    pub body: String,
    pub care_note: String,
}

/// One or two lines of phase-specific context for an episode and tag.
fn episode_context(episode_id: &str, tag: WitnessTag) -> Option<&'static str> {
    use WitnessTag::{
        ChatCommunication, Critique, Emotion, MakingNarratives, SearchingInformation,
        SpatialAttribution,
    };

    match (episode_id, tag) {
        ("episode-001", SearchingInformation) => Some(
            "In the first hours, information is scarce; people coordinate to locate others and verify what is safe.",
        ),
        ("episode-001", SpatialAttribution) => Some(
            "Early on, the channel negotiates what can be shared about places without endangering anyone.",
        ),
        ("episode-001", ChatCommunication) => Some(
            "Chat rules and moderation emerge under pressure—who can speak, what is allowed.",
        ),
        ("episode-001", Emotion) => {
            Some("Emotion runs high even as people seek practical updates.")
        }
        ("episode-002", MakingNarratives) => Some(
            "Stories and interpretations clash; people try to make sense of what happened and who is to blame.",
        ),
        ("episode-002", Critique) => Some(
            "Critique of narratives and of those who stayed or left surfaces in the channel.",
        ),
        ("episode-003", Emotion) => Some(
            "Anger, grief, and language become central; the chat holds both support and conflict.",
        ),
        ("episode-003", Critique) => Some(
            "Governance and norms are debated—who gets to judge, and how the group should respond.",
        ),
        ("episode-003", MakingNarratives) => Some(
            "Narratives about loyalty, identity, and responsibility circulate alongside raw emotion.",
        ),
        _ => None,
    }
}

/// Short caution per tag. `Filler` has none.
fn care_note_for(tag: WitnessTag) -> Option<&'static str> {
    match tag {
        WitnessTag::SearchingInformation => {
            Some("Verify before sharing; uncertainty is normal in crisis.")
        }
        WitnessTag::SpatialAttribution => {
            Some("Locations can put people at risk; avoid reposting exact addresses.")
        }
        WitnessTag::ChatCommunication => Some("Notice who sets rules and who is silenced."),
        WitnessTag::MakingNarratives => {
            Some("Multiple stories can be true; be careful not to amplify one view.")
        }
        WitnessTag::Critique => Some("Critique has a cost; consider who can speak safely."),
        WitnessTag::Emotion => {
            Some("Emotional content is part of witnessing; treat it with care.")
        }
        WitnessTag::Filler => None,
    }
}

/// Text up to and including the first period.
fn first_sentence(text: &str) -> String {
    match text.find('.') {
        Some(end) => text[..=end].to_owned(),
        None => format!("{text}."),
    }
}

/// Builds the insight shown after a choice.
///
/// Title is always `You just performed: {label} ({tag})`. The body prefers
/// episode-specific context, then the taxonomy rationale. The care note
/// prefers the per-tag caution, then the first sentence of the taxonomy's
/// risk text, then [`FALLBACK_CARE_NOTE`].
#[must_use]
pub fn build_reveal(request: &RevealRequest<'_>) -> RevealOverride {
    let tag = WitnessTag::parse(request.tag);
    let entry = tag.map(WitnessTag::entry);

    let label = entry.map_or(request.tag, |e| e.label);
    let title = format!("You just performed: {label} ({})", request.tag);

    let body = tag
        .and_then(|t| episode_context(request.episode_id, t))
        .or(entry.map(|e| e.why_it_matters))
        .unwrap_or_default()
        .to_owned();

    let care_note = tag
        .and_then(care_note_for)
        .map(str::to_owned)
        .or_else(|| entry.map(|e| first_sentence(e.risks_and_care)))
        .unwrap_or_else(|| FALLBACK_CARE_NOTE.to_owned());

    RevealOverride {
        title,
        body,
        care_note,
    }
}
