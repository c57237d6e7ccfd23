//! Canonical authored episode schema.
//!
//! Narrative order is the array order of `events`. The `ts` field on each
//! unit is display text only.

use serde::{Deserialize, Serialize};
use witnesslab_core::error::DomainError;

/// Content sensitivity of an authored unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Safety {
    /// Ordinary content.
    #[default]
    #[serde(rename = "none")]
    Normal,
    /// Content that may be distressing.
    #[serde(rename = "sensitive")]
    Sensitive,
}

/// A chat message unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageUnit {
    pub id: String,
    pub ts: String,
    /// Speaker code (`channel`, `user`, `mod`, `system`, or free text).
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub safety: Safety,
}

/// One selectable answer of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthoredChoice {
    pub id: String,
    pub text: String,
    /// Witnessing tag code this choice performs.
    pub tag: String,
    /// Reserved branching directive. Carried through, never interpreted.
    #[serde(default)]
    pub on_select: String,
}

/// A decision prompt unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptUnit {
    pub id: String,
    pub ts: String,
    pub speaker: String,
    pub question: String,
    pub choices: Vec<AuthoredChoice>,
    #[serde(default)]
    pub safety: Safety,
}

/// A reflective insight unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealUnit {
    pub id: String,
    pub ts: String,
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub safety: Safety,
    /// Bibliography entry ids for inline micro-references.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_ids: Option<Vec<String>>,
}

/// A stage-completion unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckpointUnit {
    pub id: String,
    pub ts: String,
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub safety: Safety,
}

/// One typed narrative unit. Any other `type` tag fails to parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EpisodeUnit {
    Message(MessageUnit),
    Prompt(PromptUnit),
    Reveal(RevealUnit),
    Checkpoint(CheckpointUnit),
}

impl EpisodeUnit {
    /// The unit identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Message(u) => &u.id,
            Self::Prompt(u) => &u.id,
            Self::Reveal(u) => &u.id,
            Self::Checkpoint(u) => &u.id,
        }
    }

    /// The display timestamp.
    #[must_use]
    pub fn ts(&self) -> &str {
        match self {
            Self::Message(u) => &u.ts,
            Self::Prompt(u) => &u.ts,
            Self::Reveal(u) => &u.ts,
            Self::Checkpoint(u) => &u.ts,
        }
    }

    /// The authored type tag.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Message(_) => "message",
            Self::Prompt(_) => "prompt",
            Self::Reveal(_) => "reveal",
            Self::Checkpoint(_) => "checkpoint",
        }
    }
}

/// An authored episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeDocument {
    pub id: String,
    pub title: String,
    pub time_window_label: String,
    #[serde(default)]
    pub phases: Vec<String>,
    pub events: Vec<EpisodeUnit>,
}

/// Root shape of episode files: `{ "episode": { ... } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeFile {
    pub episode: EpisodeDocument,
}

fn malformed(episode_id: &str, reason: impl std::fmt::Display) -> DomainError {
    DomainError::MalformedUnit {
        episode_id: episode_id.to_owned(),
        reason: reason.to_string(),
    }
}

/// Parses a JSON episode file.
///
/// # Errors
///
/// Returns `DomainError::MalformedUnit` if the file does not match the
/// schema, including any unit with an unknown `type` tag.
pub fn parse_json(episode_id: &str, raw: &str) -> Result<EpisodeDocument, DomainError> {
    serde_json::from_str::<EpisodeFile>(raw)
        .map(|file| file.episode)
        .map_err(|e| malformed(episode_id, e))
}

/// Parses a YAML episode file.
///
/// # Errors
///
/// Returns `DomainError::MalformedUnit` if the file does not match the
/// schema, including any unit with an unknown `type` tag.
pub fn parse_yaml(episode_id: &str, raw: &str) -> Result<EpisodeDocument, DomainError> {
    serde_yaml::from_str::<EpisodeFile>(raw)
        .map(|file| file.episode)
        .map_err(|e| malformed(episode_id, e))
}
