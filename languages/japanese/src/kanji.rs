use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use shirabe_core::{
    CharacterDictionary, Definition, DictionaryEntry, DictionaryKind, DictionaryMetadata, LoadError,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KanjiEntry {
    pub character: String,
    pub meanings: Vec<String>,
    pub on_readings: Vec<String>,
    pub kun_readings: Vec<String>,
    pub stroke_count: Option<u32>,
    pub grade: Option<u32>,
    pub frequency: Option<u32>,
}

impl DictionaryEntry for KanjiEntry {
    fn id(&self) -> String {
        self.character.clone()
    }

    fn headword(&self) -> String {
        self.character.clone()
    }

    fn readings(&self) -> Vec<String> {
        self.on_readings
            .iter()
            .chain(&self.kun_readings)
            .cloned()
            .collect()
    }

    fn definitions(&self) -> Vec<Definition> {
        self.meanings
            .iter()
            .map(|text| Definition {
                text: text.clone(),
                part_of_speech: vec![],
                tags: vec![],
            })
            .collect()
    }

    fn frequency(&self) -> Option<u32> {
        self.frequency
    }
}

// Yomichan kanji rows: [character, onyomi, kunyomi, tags, meanings, stats]
#[derive(Debug, Deserialize)]
struct KanjiRow(
    String,
    String,
    String,
    String,
    Vec<String>,
    HashMap<String, String>,
);

/// Single character dictionary keyed by the kanji itself
#[derive(Debug, Default)]
pub struct KanjiDictionary {
    name: String,
    entries: HashMap<String, Arc<KanjiEntry>>,
}

impl KanjiDictionary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: HashMap::new(),
        }
    }

    /// Later entries for the same character replace earlier ones
    pub fn insert(&mut self, entry: KanjiEntry) {
        self.entries.insert(entry.character.clone(), Arc::new(entry));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add the rows of one Yomichan `kanji_bank_*.json` file
    pub fn extend_from_yomichan_bank(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<KanjiRow> =
            serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

        for KanjiRow(character, onyomi, kunyomi, _tags, meanings, stats) in rows {
            let stat = |key: &str| stats.get(key).and_then(|v| v.parse::<u32>().ok());
            self.insert(KanjiEntry {
                on_readings: split_readings(&onyomi),
                kun_readings: split_readings(&kunyomi),
                stroke_count: stat("strokes"),
                grade: stat("grade"),
                frequency: stat("freq"),
                character,
                meanings,
            });
        }
        Ok(())
    }

    /// Load a directory of `kanji_bank_*.json` files or a single bank file
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        tracing::info!("Loading kanji dictionary from: {}", path.display());
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mut dict = Self::new(name);

        let banks: Vec<_> = if path.is_dir() {
            let mut banks: Vec<_> = std::fs::read_dir(path)
                .map_err(|e| LoadError::from_io(path, e))?
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .filter(|p| {
                    p.file_name()
                        .map(|n| n.to_string_lossy())
                        .is_some_and(|n| n.starts_with("kanji_bank_") && n.ends_with(".json"))
                })
                .collect();
            banks.sort();
            banks
        } else {
            vec![path.to_path_buf()]
        };

        for bank in &banks {
            let json = std::fs::read_to_string(bank).map_err(|e| LoadError::from_io(bank, e))?;
            dict.extend_from_yomichan_bank(&json)?;
        }

        tracing::info!("Loaded {} kanji", dict.len());
        Ok(dict)
    }
}

fn split_readings(readings: &str) -> Vec<String> {
    readings.split_whitespace().map(str::to_string).collect()
}

impl CharacterDictionary for KanjiDictionary {
    fn lookup_char(&self, character: &str) -> Option<Arc<dyn DictionaryEntry>> {
        self.entries
            .get(character)
            .map(|e| Arc::clone(e) as Arc<dyn DictionaryEntry>)
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: self.name.clone(),
            version: String::new(),
            language: "ja".to_string(),
            kind: DictionaryKind::Kanji,
            entry_count: self.entries.len(),
        }
    }
}
