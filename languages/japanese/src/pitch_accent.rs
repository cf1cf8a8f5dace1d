use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use shirabe_core::{DictionaryEntry, LoadError, PitchAccentProvider, PitchAccentRecord};

use crate::frequency::term_bank_files;
use crate::kana::katakana_to_hiragana;

/// Small kana share a mora with the kana before them
const SMALL_KANA: &[char] = &[
    'ゃ', 'ゅ', 'ょ', 'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'ゎ', 'ャ', 'ュ', 'ョ', 'ァ', 'ィ', 'ゥ', 'ェ',
    'ォ', 'ヮ',
];

/// Japanese pitch accent provider.
///
/// Records are filed under the hiragana form of their spelling and, when it
/// differs, under the hiragana form of their reading.
#[derive(Debug, Clone, Default)]
pub struct JapanesePitchAccent {
    name: String,
    records: HashMap<String, Vec<PitchAccentRecord>>,
}

// Yomichan term meta rows: [spelling, mode, data]
#[derive(Debug, Deserialize)]
struct PitchRow(String, String, serde_json::Value);

#[derive(Debug, Deserialize)]
struct PitchData {
    #[serde(default)]
    reading: Option<String>,
    pitches: Vec<Pitch>,
}

#[derive(Debug, Deserialize)]
struct Pitch {
    position: u8,
}

impl JapanesePitchAccent {
    /// Create empty pitch accent database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: HashMap::new(),
        }
    }

    pub fn insert(&mut self, spelling: &str, reading: Option<&str>, positions: Vec<u8>) {
        let record = PitchAccentRecord {
            spelling: spelling.to_string(),
            reading: reading.map(str::to_string),
            positions,
        };

        let spelling_key = katakana_to_hiragana(spelling);
        if let Some(reading_key) = reading
            .map(katakana_to_hiragana)
            .filter(|key| *key != spelling_key)
        {
            self.records.entry(reading_key).or_default().push(record.clone());
        }
        self.records.entry(spelling_key).or_default().push(record);
    }

    /// Number of keys with at least one record
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add the `pitch` rows of one Yomichan `term_meta_bank_*.json` file.
    /// Rows of other modes and rows without positions are skipped.
    pub fn extend_from_yomichan_bank(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<PitchRow> =
            serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

        for PitchRow(spelling, mode, data) in rows {
            if mode != "pitch" {
                continue;
            }
            let Ok(data) = serde_json::from_value::<PitchData>(data) else {
                continue;
            };
            let positions: Vec<u8> = data.pitches.iter().map(|p| p.position).collect();
            if positions.is_empty() {
                continue;
            }
            self.insert(&spelling, data.reading.as_deref(), positions);
        }
        Ok(())
    }

    /// Load a Yomichan pitch accent dictionary directory or a single bank file,
    /// named after the file stem
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        tracing::info!("Loading pitch accent dictionary from: {}", path.display());
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut dict = Self::new(name);

        let banks = if path.is_dir() {
            term_bank_files(path)?
        } else {
            vec![path.to_path_buf()]
        };
        for bank in &banks {
            let json = std::fs::read_to_string(bank).map_err(|e| LoadError::from_io(bank, e))?;
            dict.extend_from_yomichan_bank(&json)?;
        }

        tracing::info!("Loaded {} pitch accent keys into {}", dict.len(), dict.name);
        Ok(dict)
    }
}

impl PitchAccentProvider for JapanesePitchAccent {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &str) -> Vec<PitchAccentRecord> {
        self.records.get(key).cloned().unwrap_or_default()
    }
}

/// Pitch accents that belong to `entry`: the record's spelling must be one of
/// the entry's spellings or readings, and its reading (if any) one of the
/// entry's readings.
pub fn entry_pitch_accents(
    provider: &dyn PitchAccentProvider,
    entry: &dyn DictionaryEntry,
) -> Vec<PitchAccentRecord> {
    let mut spellings = vec![entry.headword()];
    spellings.extend(entry.alternative_spellings());
    let readings = entry.readings();

    let keys: IndexSet<String> = spellings
        .iter()
        .chain(&readings)
        .map(|s| katakana_to_hiragana(s))
        .collect();

    let mut found: Vec<PitchAccentRecord> = Vec::new();
    for key in &keys {
        for record in provider.lookup(key) {
            let spelling_fits =
                spellings.contains(&record.spelling) || readings.contains(&record.spelling);
            let reading_fits = record
                .reading
                .as_ref()
                .is_none_or(|r| *r == record.spelling || readings.contains(r));

            if spelling_fits && reading_fits && !found.contains(&record) {
                found.push(record);
            }
        }
    }
    found
}

/// Morae in a kana reading
pub fn mora_count(reading: &str) -> usize {
    reading.chars().filter(|c| !SMALL_KANA.contains(c)).count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    /// No downstep
    Heiban,
    /// Drop after the first mora
    Atamadaka,
    /// Drop inside the word
    Nakadaka,
    /// Drop after the last mora
    Odaka,
}

impl PatternType {
    /// Pattern of a downstep at `position` in `reading`
    pub fn classify(reading: &str, position: u8) -> Self {
        match position {
            0 => PatternType::Heiban,
            1 => PatternType::Atamadaka,
            p if usize::from(p) >= mora_count(reading) => PatternType::Odaka,
            _ => PatternType::Nakadaka,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Heiban => "heiban",
            PatternType::Atamadaka => "atamadaka",
            PatternType::Nakadaka => "nakadaka",
            PatternType::Odaka => "odaka",
        }
    }
}
