//! Canonical feed events.
//!
//! Events are replayed in index order, which is authored order. The
//! `timestamp` is display-only and never consulted for ordering.

use serde::{Deserialize, Serialize};

/// Kind of narrative unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Message,
    Prompt,
    Reveal,
    Checkpoint,
}

/// Narrative phase of a chat message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Shock,
    Negotiation,
    Polyvocal,
    Emotional,
    Routine,
}

/// A chat message as shown in a bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// 1-based position in the episode.
    pub id: usize,
    pub author: String,
    pub timestamp: String,
    pub phase: Phase,
    pub text: String,
    pub reply_to_id: Option<usize>,
}

/// A selectable answer of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptChoice {
    pub id: String,
    pub text: String,
    pub tag: String,
    /// Reserved branching directive, not interpreted at runtime.
    pub on_select: String,
}

/// Payload of a prompt event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPayload {
    pub prompt_id: String,
    pub question: String,
    pub choices: Vec<PromptChoice>,
}

/// Payload of a reveal event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealPayload {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_ids: Option<Vec<String>>,
}

/// Payload of a checkpoint event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointPayload {
    pub title: String,
    pub summary: String,
}

/// Type-specific event content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum EventPayload {
    Message(Message),
    Prompt(PromptPayload),
    Reveal(RevealPayload),
    Checkpoint(CheckpointPayload),
}

/// One event of the feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique within an episode.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(flatten)]
    pub payload: EventPayload,
}

impl Event {
    /// The event's kind.
    #[must_use]
    pub fn event_type(&self) -> EventType {
        match &self.payload {
            EventPayload::Message(_) => EventType::Message,
            EventPayload::Prompt(_) => EventType::Prompt,
            EventPayload::Reveal(_) => EventType::Reveal,
            EventPayload::Checkpoint(_) => EventType::Checkpoint,
        }
    }

    /// The prompt payload, if this is a prompt.
    #[must_use]
    pub fn as_prompt(&self) -> Option<&PromptPayload> {
        match &self.payload {
            EventPayload::Prompt(prompt) => Some(prompt),
            _ => None,
        }
    }

    /// Whether this event marks stage completion.
    #[must_use]
    pub fn is_checkpoint(&self) -> bool {
        matches!(self.payload, EventPayload::Checkpoint(_))
    }
}
