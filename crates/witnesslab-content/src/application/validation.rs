//! Authoring-time validation of episode documents.

use std::collections::HashSet;

use witnesslab_core::error::DomainError;

use crate::domain::document::{EpisodeDocument, EpisodeUnit};

/// Checks the structural invariants the episode engine relies on: at least
/// one unit, unique unit ids, and prompts with at least one uniquely
/// identified choice.
///
/// # Errors
///
/// Returns `DomainError::MalformedUnit` naming the first violation found.
pub fn validate_episode(doc: &EpisodeDocument) -> Result<(), DomainError> {
    let malformed = |reason: String| DomainError::MalformedUnit {
        episode_id: doc.id.clone(),
        reason,
    };

    if doc.events.is_empty() {
        return Err(malformed("episode has no events".to_owned()));
    }

    let mut seen = HashSet::new();
    for unit in &doc.events {
        if !seen.insert(unit.id()) {
            return Err(malformed(format!("duplicate event id {}", unit.id())));
        }
        if let EpisodeUnit::Prompt(prompt) = unit {
            if prompt.choices.is_empty() {
                return Err(malformed(format!("prompt {} has no choices", prompt.id)));
            }
            let mut choice_ids = HashSet::new();
            for choice in &prompt.choices {
                if !choice_ids.insert(choice.id.as_str()) {
                    return Err(malformed(format!(
                        "prompt {} repeats choice id {}",
                        prompt.id, choice.id
                    )));
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::{AuthoredChoice, MessageUnit, PromptUnit, Safety};

    fn message(id: &str) -> EpisodeUnit {
        EpisodeUnit::Message(MessageUnit {
            id: id.to_owned(),
            ts: "08:00".to_owned(),
            speaker: "channel".to_owned(),
            text: "text".to_owned(),
            tags: Vec::new(),
            safety: Safety::Normal,
        })
    }

    fn prompt(id: &str, choice_ids: &[&str]) -> EpisodeUnit {
        EpisodeUnit::Prompt(PromptUnit {
            id: id.to_owned(),
            ts: "08:01".to_owned(),
            speaker: "system".to_owned(),
            question: "What now?".to_owned(),
            choices: choice_ids
                .iter()
                .map(|c| AuthoredChoice {
                    id: (*c).to_owned(),
                    text: (*c).to_owned(),
                    tag: "SI".to_owned(),
                    on_select: String::new(),
                })
                .collect(),
            safety: Safety::Normal,
        })
    }

    fn doc(events: Vec<EpisodeUnit>) -> EpisodeDocument {
        EpisodeDocument {
            id: "episode-t".to_owned(),
            title: "t".to_owned(),
            time_window_label: "t".to_owned(),
            phases: Vec::new(),
            events,
        }
    }

    fn reason_of(result: Result<(), DomainError>) -> String {
        match result.unwrap_err() {
            DomainError::MalformedUnit { reason, .. } => reason,
            other => panic!("expected MalformedUnit, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_episode_passes() {
        assert!(validate_episode(&doc(vec![message("m1"), prompt("p1", &["a", "b"])])).is_ok());
    }

    #[test]
    fn test_empty_episode_is_rejected() {
        assert_eq!(reason_of(validate_episode(&doc(vec![]))), "episode has no events");
    }

    #[test]
    fn test_duplicate_event_ids_are_rejected() {
        let result = validate_episode(&doc(vec![message("m1"), message("m1")]));
        assert_eq!(reason_of(result), "duplicate event id m1");
    }

    #[test]
    fn test_prompt_without_choices_is_rejected() {
        let result = validate_episode(&doc(vec![prompt("p1", &[])]));
        assert_eq!(reason_of(result), "prompt p1 has no choices");
    }

    #[test]
    fn test_repeated_choice_id_is_rejected() {
        let result = validate_episode(&doc(vec![prompt("p1", &["a", "a"])]));
        assert_eq!(reason_of(result), "prompt p1 repeats choice id a");
    }
}
