//! Witnessing taxonomy: shared labels and guidance.

use serde::Serialize;

/// A category of witnessing behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum WitnessTag {
    /// Chat communication.
    #[serde(rename = "CC")]
    ChatCommunication,
    /// Spatial attribution.
    #[serde(rename = "SA")]
    SpatialAttribution,
    /// Searching for information.
    #[serde(rename = "SI")]
    SearchingInformation,
    /// Making narratives.
    #[serde(rename = "MN")]
    MakingNarratives,
    /// Critique.
    #[serde(rename = "C")]
    Critique,
    /// Expression of emotion.
    #[serde(rename = "EM")]
    Emotion,
    /// Filler.
    #[serde(rename = "F")]
    Filler,
}

impl WitnessTag {
    /// Every tag, in taxonomy order.
    pub const ALL: [Self; 7] = [
        Self::ChatCommunication,
        Self::SpatialAttribution,
        Self::SearchingInformation,
        Self::MakingNarratives,
        Self::Critique,
        Self::Emotion,
        Self::Filler,
    ];

    /// Parses a short code. Unknown codes yield `None`.
    #[must_use]
    pub fn parse(code: &str) -> Option<Self> {
        match code {
            "CC" => Some(Self::ChatCommunication),
            "SA" => Some(Self::SpatialAttribution),
            "SI" => Some(Self::SearchingInformation),
            "MN" => Some(Self::MakingNarratives),
            "C" => Some(Self::Critique),
            "EM" => Some(Self::Emotion),
            "F" => Some(Self::Filler),
            _ => None,
        }
    }

    /// The short code.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::ChatCommunication => "CC",
            Self::SpatialAttribution => "SA",
            Self::SearchingInformation => "SI",
            Self::MakingNarratives => "MN",
            Self::Critique => "C",
            Self::Emotion => "EM",
            Self::Filler => "F",
        }
    }

    /// The taxonomy entry for this tag.
    #[must_use]
    pub fn entry(self) -> &'static TaxonomyEntry {
        match self {
            Self::ChatCommunication => &TaxonomyEntry {
                label: "Chat communication",
                why_it_matters: "Meta talk about how the channel works—rules, bans, who can speak—shapes what gets said and who feels safe. It reflects how communities self-organize under pressure.",
                risks_and_care: "Moderation and rules can exclude or silence. Note that sharing exact locations or identifying information in chat can be dangerous; many communities explicitly warn against it.",
            },
            Self::SpatialAttribution => &TaxonomyEntry {
                label: "Spatial attribution",
                why_it_matters: "Locations and addresses show how people map risk and help. They reveal what is considered safe to share and how space is understood in the crisis.",
                risks_and_care: "Sharing locations can endanger people. Treat any location data as sensitive; avoid republishing exact addresses. Consider that readers may include bad actors.",
            },
            Self::SearchingInformation => &TaxonomyEntry {
                label: "Searching for information",
                why_it_matters: "Questions and requests for verification show how people cope with information scarcity. They reveal what is unknown and what counts as evidence.",
                risks_and_care: "Unverified claims can spread quickly. Distinguish between asking for information and asserting facts. Be careful not to amplify rumors.",
            },
            Self::MakingNarratives => &TaxonomyEntry {
                label: "Making narratives",
                why_it_matters: "Stories and explanations—who did what, why—shape collective sense-making. They show how causality and blame are assigned in the moment.",
                risks_and_care: "Narratives can be weaponized or oversimplified. Notice who is centered and who is missing. Multiple conflicting narratives are common.",
            },
            Self::Critique => &TaxonomyEntry {
                label: "Critique",
                why_it_matters: "Critique challenges dominant stories, rules, or behavior. It shows how communities debate norms and hold each other accountable.",
                risks_and_care: "Critique can be dismissed or punished. Consider power differences and the cost of speaking up in the channel.",
            },
            Self::Emotion => &TaxonomyEntry {
                label: "Expression of emotion",
                why_it_matters: "Anger, grief, fear, and hope appear alongside practical updates. Emotion is part of how people witness and cope, not a side effect.",
                risks_and_care: "Emotional content can be intense or triggering. Treat it as meaningful testimony; avoid treating it as merely anecdotal or irrational.",
            },
            Self::Filler => &TaxonomyEntry {
                label: "Filler",
                why_it_matters: "Off-topic or low-information messages (jokes, small talk) can signal trust, fatigue, or the need to keep the channel alive as a space.",
                risks_and_care: "Filler is still part of the social context. Don’t strip it out when analyzing without considering what it does for the group.",
            },
        }
    }
}

impl std::fmt::Display for WitnessTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Display text for one tag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonomyEntry {
    pub label: &'static str,
    pub why_it_matters: &'static str,
    pub risks_and_care: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_code_agree_for_every_tag() {
        for tag in WitnessTag::ALL {
            assert_eq!(WitnessTag::parse(tag.code()), Some(tag));
            assert_eq!(serde_json::to_value(tag).unwrap(), tag.code());
        }
    }

    #[test]
    fn test_parse_rejects_unknown_and_lowercase_codes() {
        assert_eq!(WitnessTag::parse("XX"), None);
        assert_eq!(WitnessTag::parse("si"), None);
    }

    #[test]
    fn test_every_entry_has_sentence_terminated_care_text() {
        for tag in WitnessTag::ALL {
            assert!(tag.entry().risks_and_care.contains('.'), "{tag}");
        }
    }

    #[test]
    fn test_entry_text_is_verbatim() {
        assert!(
            WitnessTag::ChatCommunication
                .entry()
                .why_it_matters
                .starts_with("Meta talk about how the channel works—rules, bans, who can speak—shapes")
        );
        assert!(
            WitnessTag::MakingNarratives
                .entry()
                .why_it_matters
                .starts_with("Stories and explanations—who did what, why—shape")
        );
        assert!(
            WitnessTag::Filler
                .entry()
                .risks_and_care
                .contains("Don’t strip it out")
        );
    }
}
