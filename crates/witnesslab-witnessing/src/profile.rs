//! Witnessing profile: running tally of chosen tags.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Count of choices made per tag code. Monotonic within an episode run.
///
/// Keyed by the raw code so authored tags outside the taxonomy are still
/// counted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WitnessingProfile(BTreeMap<String, u32>);

impl WitnessingProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more choice with `tag`.
    pub fn record(&mut self, tag: &str) {
        *self.0.entry(tag.to_owned()).or_insert(0) += 1;
    }

    /// Number of choices recorded with `tag`.
    #[must_use]
    pub fn count(&self, tag: &str) -> u32 {
        self.0.get(tag).copied().unwrap_or(0)
    }

    /// Total number of choices recorded.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.0.values().sum()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(tag, count)` pairs in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(tag, count)| (tag.as_str(), *count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_tag_independently() {
        let mut profile = WitnessingProfile::new();

        profile.record("SI");
        profile.record("SI");
        profile.record("CC");

        assert_eq!(profile.count("SI"), 2);
        assert_eq!(profile.count("CC"), 1);
        assert_eq!(profile.count("EM"), 0);
        assert_eq!(profile.total(), 3);
    }

    #[test]
    fn test_serializes_as_plain_map() {
        let mut profile = WitnessingProfile::new();
        profile.record("SI");

        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json, serde_json::json!({ "SI": 1 }));
        let back: WitnessingProfile = serde_json::from_value(json).unwrap();
        assert_eq!(back, profile);
    }
}
