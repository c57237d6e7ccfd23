//! Structured bibliography used by the stage context panel (short form) and
//! the methodology view (full citations).

use serde::Serialize;

use super::stages::StageId;

/// Identifier of a bibliography entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BibliographyEntryId {
    Bareikyte2024,
    Holman2014,
    Figley1995,
    Zuboff2019,
    UnPrivacy,
    TacticalTech,
}

impl BibliographyEntryId {
    /// Parses the wire form used in authored `refIds`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "bareikyte2024" => Some(Self::Bareikyte2024),
            "holman2014" => Some(Self::Holman2014),
            "figley1995" => Some(Self::Figley1995),
            "zuboff2019" => Some(Self::Zuboff2019),
            "unPrivacy" => Some(Self::UnPrivacy),
            "tacticalTech" => Some(Self::TacticalTech),
            _ => None,
        }
    }
}

/// One cited work.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BibliographyEntry {
    pub id: BibliographyEntryId,
    pub title: &'static str,
    /// One or two sentences for the context panel.
    pub summary: &'static str,
    pub url: &'static str,
    /// Short form for hover text, e.g. "Figley, 1995".
    pub short_citation: &'static str,
    /// Full citation for the methodology view.
    pub full_citation: &'static str,
}

static BIBLIOGRAPHY: [BibliographyEntry; 6] = [
    BibliographyEntry {
        id: BibliographyEntryId::Bareikyte2024,
        title: "Digitally witnessable war (Bareikytė & Makhortykh, 2024)",
        summary: "Explores how Telegram channels shift from information search to critique and emotionalization during wartime, and the politics of presence and publicness in the Ukrainian conflict.",
        url: "ADD_URL_HERE",
        short_citation: "Bareikytė & Makhortykh, 2024",
        full_citation: "Bareikytė, T., & Makhortykh, A. (2024). Materiality of Wartime Communication: The Politics of Presence and Publicness in the Ukrainian War on Telegram.",
    },
    BibliographyEntry {
        id: BibliographyEntryId::Holman2014,
        title: "Media exposure and acute stress (Holman et al., 2014)",
        summary: "Documents how repeated exposure to collective trauma via media can produce acute stress and anxiety in people who are not directly at the event.",
        url: "ADD_URL_HERE",
        short_citation: "Holman et al., 2014",
        full_citation: "Holman, E. A., Garfin, D. R., & Silver, R. C. (2014). Media’s role in broadcasting acute stress following the Boston Marathon bombings. Proceedings of the National Academy of Sciences, 111(1), 93–98.",
    },
    BibliographyEntry {
        id: BibliographyEntryId::Figley1995,
        title: "Compassion fatigue (Figley, 1995)",
        summary: "Introduces the concept of compassion fatigue among helpers and caregivers exposed to trauma narratives, with relevance to media and crisis exposure.",
        url: "ADD_URL_HERE",
        short_citation: "Figley, 1995",
        full_citation: "Figley, C. R. (1995). Compassion fatigue: Coping with secondary traumatic stress disorder in those who treat the traumatized. Brunner/Mazel.",
    },
    BibliographyEntry {
        id: BibliographyEntryId::Zuboff2019,
        title: "Surveillance capitalism (Zuboff, 2019)",
        summary: "Frames how behavioral data and digital infrastructure shape attention, prediction, and control—relevant to understanding platform dynamics in crisis communication.",
        url: "ADD_URL_HERE",
        short_citation: "Zuboff, 2019",
        full_citation: "Zuboff, S. (2019). The age of surveillance capitalism: The fight for a human future at the new frontier of power. PublicAffairs.",
    },
    BibliographyEntry {
        id: BibliographyEntryId::UnPrivacy,
        title: "UN Human Rights – Privacy in the digital age",
        summary: "International standards and guidance on the right to privacy in the context of digital surveillance and data collection.",
        url: "ADD_URL_HERE",
        short_citation: "UN Human Rights, Privacy",
        full_citation: "Office of the United Nations High Commissioner for Human Rights. (n.d.). The right to privacy in the digital age.",
    },
    BibliographyEntry {
        id: BibliographyEntryId::TacticalTech,
        title: "Tactical Tech – Data Detox Kit",
        summary: "Practical self-protection habits and guides for digital environments, including privacy and security in messaging and social platforms.",
        url: "ADD_URL_HERE",
        short_citation: "Tactical Tech, Data Detox Kit",
        full_citation: "Tactical Tech. (n.d.). Data Detox Kit. https://datadetoxkit.org/",
    },
];

/// Looks up an entry.
#[must_use]
pub fn entry(id: BibliographyEntryId) -> &'static BibliographyEntry {
    let index = match id {
        BibliographyEntryId::Bareikyte2024 => 0,
        BibliographyEntryId::Holman2014 => 1,
        BibliographyEntryId::Figley1995 => 2,
        BibliographyEntryId::Zuboff2019 => 3,
        BibliographyEntryId::UnPrivacy => 4,
        BibliographyEntryId::TacticalTech => 5,
    };
    &BIBLIOGRAPHY[index]
}

/// Entries shown in a stage's context panel, in reference-number order.
#[must_use]
pub fn stage_references(stage: StageId) -> &'static [BibliographyEntryId] {
    match stage {
        StageId::Stage1 => &[
            BibliographyEntryId::Bareikyte2024,
            BibliographyEntryId::TacticalTech,
            BibliographyEntryId::UnPrivacy,
        ],
        StageId::Stage2 => &[
            BibliographyEntryId::Bareikyte2024,
            BibliographyEntryId::Holman2014,
            BibliographyEntryId::Zuboff2019,
        ],
    }
}

/// Resolved entries for a stage.
#[must_use]
pub fn entries_for_stage(stage: StageId) -> Vec<&'static BibliographyEntry> {
    stage_references(stage).iter().map(|id| entry(*id)).collect()
}

/// 1-based superscript number of `id` within `stage`'s references, or 0 if
/// the stage does not cite it.
#[must_use]
pub fn ref_number(id: BibliographyEntryId, stage: StageId) -> usize {
    stage_references(stage)
        .iter()
        .position(|candidate| *candidate == id)
        .map_or(0, |i| i + 1)
}

/// A themed group of entries for the methodology view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodologyGroup {
    pub id: &'static str,
    pub title: &'static str,
    pub entry_ids: &'static [BibliographyEntryId],
}

/// Methodology groups, in display order.
pub static METHODOLOGY_GROUPS: [MethodologyGroup; 3] = [
    MethodologyGroup {
        id: "wartime-witnessing",
        title: "Wartime Digital Witnessing",
        entry_ids: &[BibliographyEntryId::Bareikyte2024],
    },
    MethodologyGroup {
        id: "emotional-impact",
        title: "Emotional Impact & Media Exposure",
        entry_ids: &[BibliographyEntryId::Holman2014, BibliographyEntryId::Figley1995],
    },
    MethodologyGroup {
        id: "digital-rights",
        title: "Digital Rights & Infrastructure",
        entry_ids: &[
            BibliographyEntryId::Zuboff2019,
            BibliographyEntryId::UnPrivacy,
            BibliographyEntryId::TacticalTech,
        ],
    },
];
