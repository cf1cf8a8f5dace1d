use std::fmt;

use serde::Serialize;
use shirabe_core::{DictionaryKind, LookupCandidate};

/// Printable form of a lookup candidate
#[derive(Debug, Serialize)]
pub struct CandidateView {
    pub matched: String,
    pub deconjugated: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub process: Vec<String>,
    pub dictionary: String,
    pub kind: DictionaryKind,
    pub frequency: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pitch_accents: Vec<PitchAccentView>,
    pub entries: Vec<EntryView>,
}

#[derive(Debug, Serialize)]
pub struct PitchAccentView {
    pub spelling: String,
    pub reading: Option<String>,
    pub positions: Vec<u8>,
}

#[derive(Debug, Serialize)]
pub struct EntryView {
    pub headword: String,
    pub readings: Vec<String>,
    pub definitions: Vec<String>,
}

impl From<&LookupCandidate> for CandidateView {
    fn from(candidate: &LookupCandidate) -> Self {
        Self {
            matched: candidate.matched_surface_text.clone(),
            deconjugated: candidate.deconjugated_text.clone(),
            process: candidate
                .process_path
                .iter()
                .filter(|step| !step.is_empty())
                .cloned()
                .collect(),
            dictionary: candidate.dictionary.clone(),
            kind: candidate.kind,
            frequency: candidate.frequency.rank(),
            pitch_accents: candidate
                .pitch_accents
                .iter()
                .map(|accent| PitchAccentView {
                    spelling: accent.spelling.clone(),
                    reading: accent.reading.clone(),
                    positions: accent.positions.clone(),
                })
                .collect(),
            entries: candidate
                .records
                .iter()
                .map(|record| EntryView {
                    headword: record.headword(),
                    readings: record.readings(),
                    definitions: record.definitions().into_iter().map(|d| d.text).collect(),
                })
                .collect(),
        }
    }
}

impl fmt::Display for CandidateView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.matched)?;
        if self.deconjugated != self.matched {
            write!(f, " → {}", self.deconjugated)?;
        }
        if !self.process.is_empty() {
            write!(f, " ({})", self.process.join(" → "))?;
        }
        write!(f, " [{}]", self.dictionary)?;
        if let Some(rank) = self.frequency {
            write!(f, " #{rank}")?;
        }
        writeln!(f)?;

        for accent in &self.pitch_accents {
            let positions: Vec<String> = accent.positions.iter().map(|p| format!("[{p}]")).collect();
            write!(f, "  ♪ {}", accent.spelling)?;
            if let Some(reading) = &accent.reading {
                write!(f, " {reading}")?;
            }
            writeln!(f, " {}", positions.join(""))?;
        }

        for entry in &self.entries {
            write!(f, "  {}", entry.headword)?;
            if !entry.readings.is_empty() {
                write!(f, " 【{}】", entry.readings.join("、"))?;
            }
            writeln!(f)?;
            for (i, definition) in entry.definitions.iter().enumerate() {
                writeln!(f, "    {}. {definition}", i + 1)?;
            }
        }
        Ok(())
    }
}
