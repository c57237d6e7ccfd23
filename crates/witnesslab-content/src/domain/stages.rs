//! Stage registry: maps stages to episode files and holds context content.
//!
//! Stages are an ordered, closed list. The next stage is simply the
//! following entry.

use serde::Serialize;
use witnesslab_core::error::DomainError;

/// Identifier of a stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, serde::Deserialize)]
pub enum StageId {
    #[default]
    #[serde(rename = "stage-1")]
    Stage1,
    #[serde(rename = "stage-2")]
    Stage2,
}

impl StageId {
    /// The wire form, e.g. `stage-1`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stage1 => "stage-1",
            Self::Stage2 => "stage-2",
        }
    }

    /// Parses the wire form.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::StageNotFound` for ids outside the registry.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw {
            "stage-1" => Ok(Self::Stage1),
            "stage-2" => Ok(Self::Stage2),
            other => Err(DomainError::StageNotFound(other.to_owned())),
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A suggested reading shown in the context panel.
#[derive(Debug, Serialize)]
pub struct StageReading {
    pub title: &'static str,
    pub note: &'static str,
    pub url: &'static str,
}

/// Supplementary research context for a stage.
#[derive(Debug, Serialize)]
pub struct StageContextContent {
    pub summary: &'static str,
    pub themes: &'static [&'static str],
    pub readings: &'static [StageReading],
    pub citations: &'static [&'static str],
}

/// A stage and the episode it plays.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageDefinition {
    pub id: StageId,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub badge_label: &'static str,
    pub teaser: &'static str,
    /// Episode id handed to the episode loader.
    pub episode_file: &'static str,
    pub context: StageContextContent,
}

const SHARED_READINGS: &[StageReading] = &[
    StageReading {
        title: "Digitally witnessable war (Bareikytė & Makhortykh, 2024)",
        note: "How Telegram witnessing shifts from information search to critique and emotionalization.",
        url: "ADD_URL_HERE",
    },
    StageReading {
        title: "Tactical Tech – Data Detox Kit",
        note: "Practical self-protection habits for digital environments.",
        url: "ADD_URL_HERE",
    },
];

/// All stages, in play order.
pub static STAGES: [StageDefinition; 2] = [
    StageDefinition {
        id: StageId::Stage1,
        title: "Stage 1: Information Scarcity",
        subtitle: "Shock / Pereklychka",
        badge_label: "STAGE 1 — SHOCK / PEREKLYCHKA",
        teaser: "The first hours are about locating people and negotiating what can be shared. Next we look at how narratives form and how the channel debates truth.",
        episode_file: "episode-001",
        context: StageContextContent {
            summary: "In the first hours of a crisis, Telegram channels often enter a phase researchers call pereklychka—a “switch-over” where communication shifts from everyday chatter to survival coordination. Information is scarce: people ask who is safe, where it is dangerous, and what is known. Spatial attribution (SA) appears as people share or withhold locations and warn against posting exact addresses. At the same time, the channel begins to negotiate chat rules and safety (CC): what is safe to post, how to avoid helping adversaries, and how to separate verified information from rumors. Verification under uncertainty becomes a central challenge.",
            themes: &[
                "Searching for information (SI)",
                "Spatial attribution (SA)",
                "Chat rules and safety (CC)",
                "Verification under uncertainty",
            ],
            readings: SHARED_READINGS,
            citations: &[],
        },
    },
    StageDefinition {
        id: StageId::Stage2,
        title: "Stage 2: Narrative Formation & Critique",
        subtitle: "Narratives Form",
        badge_label: "STAGE 2 — NARRATIVE FORMATION & CRITIQUE",
        teaser: "Stories and interpretations clash. The channel debates authenticity, staging, and who gets to judge. Next we explore emotion and governance.",
        episode_file: "episode-002",
        context: StageContextContent {
            summary: "As the crisis unfolds, the channel shifts from immediate coordination to narrative sense-making. People tell stories about what happened, who is to blame, and who stayed or left. Making narratives (MN) shapes how the group understands the situation; at the same time, critique (C) challenges dominant stories and calls out misinformation or staging. Authenticity debates—is this photo real? Is this narrative fair?—mix with polyvocal meaning-making, where multiple interpretations coexist and sometimes polarize. Understanding this stage helps facilitators notice who is centered in the stories and how critique is received.",
            themes: &[
                "Making narratives (MN)",
                "Critique (C)",
                "Authenticity and staging debates",
                "Polyvocality and polarization",
            ],
            readings: SHARED_READINGS,
            citations: &[],
        },
    },
];

/// Zero-based position of a stage in the registry.
#[must_use]
pub fn stage_index(id: StageId) -> usize {
    match id {
        StageId::Stage1 => 0,
        StageId::Stage2 => 1,
    }
}

/// Looks up a stage definition.
#[must_use]
pub fn stage_by_id(id: StageId) -> &'static StageDefinition {
    &STAGES[stage_index(id)]
}

/// The stage following `current`, or `None` if `current` is last.
#[must_use]
pub fn next_stage(current: StageId) -> Option<&'static StageDefinition> {
    STAGES.get(stage_index(current) + 1)
}

/// Number of stages.
#[must_use]
pub fn total_stages() -> usize {
    STAGES.len()
}
