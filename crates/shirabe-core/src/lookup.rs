use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::dictionary::{DictionaryEntry, DictionaryKind, PitchAccentRecord};

/// Frequency rank of a candidate. Lower known ranks are more common and every
/// known rank orders before `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Known(u32),
    #[default]
    Unknown,
}

impl Frequency {
    pub fn rank(&self) -> Option<u32> {
        match self {
            Frequency::Known(rank) => Some(*rank),
            Frequency::Unknown => None,
        }
    }

    /// Keep the more common of the two
    pub fn best(self, other: Frequency) -> Frequency {
        self.min(other)
    }
}

impl From<Option<u32>> for Frequency {
    fn from(rank: Option<u32>) -> Self {
        rank.map_or(Frequency::Unknown, Frequency::Known)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Known(rank) => write!(f, "{rank}"),
            Frequency::Unknown => write!(f, "-"),
        }
    }
}

/// A dictionary hit for some prefix of the looked up text
#[derive(Debug, Clone)]
pub struct LookupCandidate {
    /// Exact prefix of the input that was matched
    pub matched_surface_text: String,
    /// Key that hit the dictionary
    pub deconjugated_text: String,
    /// Deconjugation steps, oldest first; empty for direct hits
    pub process_path: Vec<String>,
    /// Name of the dictionary the records came from
    pub dictionary: String,
    pub kind: DictionaryKind,
    pub records: Vec<Arc<dyn DictionaryEntry>>,
    pub frequency: Frequency,
    /// Pitch accents of the records' spellings, empty when unknown
    pub pitch_accents: Vec<PitchAccentRecord>,
}

impl LookupCandidate {
    pub fn is_direct(&self) -> bool {
        self.process_path.is_empty()
    }

    pub fn matched_len(&self) -> usize {
        self.matched_surface_text.chars().count()
    }

    /// Human readable deconjugation, e.g. "past → negative"; blank steps are skipped
    pub fn process_description(&self) -> Option<String> {
        let steps: Vec<&str> = self
            .process_path
            .iter()
            .map(String::as_str)
            .filter(|step| !step.is_empty())
            .collect();

        if steps.is_empty() {
            None
        } else {
            Some(steps.join(" → "))
        }
    }
}

/// Longer surface matches first, then more common, otherwise discovery order
pub fn compare_candidates(a: &LookupCandidate, b: &LookupCandidate) -> Ordering {
    b.matched_len()
        .cmp(&a.matched_len())
        .then_with(|| a.frequency.cmp(&b.frequency))
}

/// Sort candidates in place; the sort is stable
pub fn rank_candidates(candidates: &mut [LookupCandidate]) {
    candidates.sort_by(compare_candidates);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(surface: &str, key: &str, frequency: Frequency) -> LookupCandidate {
        LookupCandidate {
            matched_surface_text: surface.to_string(),
            deconjugated_text: key.to_string(),
            process_path: Vec::new(),
            dictionary: "test".to_string(),
            kind: DictionaryKind::Word,
            records: Vec::new(),
            frequency,
            pitch_accents: Vec::new(),
        }
    }

    fn keys(candidates: &[LookupCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.deconjugated_text.as_str()).collect()
    }

    #[test]
    fn longer_match_wins_over_frequency() {
        let mut list = vec![
            candidate("食", "しょく", Frequency::Known(1)),
            candidate("食べる", "たべる", Frequency::Known(5000)),
        ];
        rank_candidates(&mut list);
        assert_eq!(keys(&list), vec!["たべる", "しょく"]);
    }

    #[test]
    fn equal_length_sorts_by_rank() {
        let mut list = vec![
            candidate("見る", "a", Frequency::Known(300)),
            candidate("見る", "b", Frequency::Known(20)),
        ];
        rank_candidates(&mut list);
        assert_eq!(keys(&list), vec!["b", "a"]);
    }

    #[test]
    fn unknown_sorts_after_any_known_rank() {
        let mut list = vec![
            candidate("見る", "unknown", Frequency::Unknown),
            candidate("見る", "max", Frequency::Known(u32::MAX)),
        ];
        rank_candidates(&mut list);
        assert_eq!(keys(&list), vec!["max", "unknown"]);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let mut list = vec![
            candidate("見る", "first", Frequency::Unknown),
            candidate("見る", "second", Frequency::Unknown),
            candidate("見", "short", Frequency::Known(1)),
            candidate("見る", "third", Frequency::Unknown),
        ];
        rank_candidates(&mut list);
        assert_eq!(keys(&list), vec!["first", "second", "third", "short"]);
    }

    #[test]
    fn process_description_skips_blank_steps() {
        let mut c = candidate("食べなかった", "たべる", Frequency::Unknown);
        assert_eq!(c.process_description(), None);

        c.process_path = vec!["past".into(), "negative".into(), String::new()];
        assert_eq!(c.process_description().as_deref(), Some("past → negative"));
    }
}
