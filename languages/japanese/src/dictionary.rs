use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use shirabe_core::{
    Definition, Dictionary, DictionaryEntry, DictionaryKind, DictionaryMetadata, LoadError,
};

use crate::kana::katakana_to_hiragana;

/// JMdict (or JMnedict) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JMdictEntry {
    pub id: String,
    pub kanji: Vec<String>,
    pub readings: Vec<String>,
    pub meanings: Vec<String>,
    /// Part of speech tags for words, name types for names
    pub pos: Vec<String>,
}

impl DictionaryEntry for JMdictEntry {
    fn id(&self) -> String {
        self.id.clone()
    }

    fn headword(&self) -> String {
        self.kanji
            .first()
            .or_else(|| self.readings.first())
            .cloned()
            .unwrap_or_default()
    }

    fn alternative_spellings(&self) -> Vec<String> {
        self.kanji.iter().skip(1).cloned().collect()
    }

    fn readings(&self) -> Vec<String> {
        self.readings.clone()
    }

    fn word_classes(&self) -> Vec<String> {
        self.pos.clone()
    }

    fn definitions(&self) -> Vec<Definition> {
        self.meanings
            .iter()
            .map(|text| Definition {
                text: text.clone(),
                part_of_speech: self.pos.clone(),
                tags: vec![],
            })
            .collect()
    }
}

// JSON structures for parsing jmdict-simplified / jmnedict-simplified format
#[derive(Debug, Deserialize)]
struct JMdictJson {
    #[serde(default)]
    version: String,
    words: Vec<JMdictJsonEntry>,
}

#[derive(Debug, Deserialize)]
struct JMdictJsonEntry {
    id: String,
    #[serde(default)]
    kanji: Vec<TextElement>,
    #[serde(default)]
    kana: Vec<TextElement>,
    #[serde(default)]
    sense: Vec<Sense>,
    #[serde(default)]
    translation: Vec<NameTranslation>,
}

#[derive(Debug, Deserialize)]
struct TextElement {
    text: String,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(rename = "partOfSpeech", default)]
    part_of_speech: Vec<String>,
    gloss: Vec<Gloss>,
}

#[derive(Debug, Deserialize)]
struct NameTranslation {
    #[serde(rename = "type", default)]
    name_type: Vec<String>,
    translation: Vec<Gloss>,
}

#[derive(Debug, Deserialize)]
struct Gloss {
    lang: String,
    text: String,
}

impl JMdictJsonEntry {
    /// English meanings and their classes; both sense and name translations count
    fn meanings_and_pos(&self) -> (Vec<String>, Vec<String>) {
        let mut meanings = Vec::new();
        let mut pos = Vec::new();

        for sense in &self.sense {
            meanings.extend(english(&sense.gloss));
            pos.extend(sense.part_of_speech.iter().cloned());
        }
        for translation in &self.translation {
            meanings.extend(english(&translation.translation));
            pos.extend(translation.name_type.iter().cloned());
        }

        pos.dedup();
        (meanings, pos)
    }
}

fn english(glosses: &[Gloss]) -> impl Iterator<Item = String> + '_ {
    glosses
        .iter()
        .filter(|g| g.lang == "eng")
        .map(|g| g.text.clone())
}

/// JMdict dictionary indexed by the hiragana form of every spelling and reading
#[derive(Debug)]
pub struct JMdict {
    name: String,
    version: String,
    kind: DictionaryKind,
    entries: Vec<Arc<JMdictEntry>>,
    index: HashMap<String, Vec<usize>>,
}

impl JMdict {
    pub fn new(name: impl Into<String>, kind: DictionaryKind) -> Self {
        Self {
            name: name.into(),
            version: String::new(),
            kind,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Build from already parsed entries
    pub fn from_entries(
        name: impl Into<String>,
        kind: DictionaryKind,
        entries: impl IntoIterator<Item = JMdictEntry>,
    ) -> Self {
        let mut dict = Self::new(name, kind);
        for entry in entries {
            dict.insert(entry);
        }
        dict
    }

    /// Load JMdict from JSON string (jmdict-simplified format)
    pub fn from_json(
        name: impl Into<String>,
        kind: DictionaryKind,
        json_str: &str,
    ) -> Result<Self, LoadError> {
        let data: JMdictJson =
            serde_json::from_str(json_str).map_err(|e| LoadError::ParseError(e.to_string()))?;

        let mut dict = Self::new(name, kind);
        dict.version = data.version;

        for json_entry in data.words {
            let (meanings, pos) = json_entry.meanings_and_pos();

            // Skip entries with no English meanings
            if meanings.is_empty() {
                continue;
            }

            dict.insert(JMdictEntry {
                id: json_entry.id,
                kanji: json_entry.kanji.into_iter().map(|k| k.text).collect(),
                readings: json_entry.kana.into_iter().map(|k| k.text).collect(),
                meanings,
                pos,
            });
        }

        Ok(dict)
    }

    fn insert(&mut self, entry: JMdictEntry) {
        let entry_idx = self.entries.len();
        for spelling in entry.kanji.iter().chain(&entry.readings) {
            let slot = self.index.entry(katakana_to_hiragana(spelling)).or_default();
            if slot.last() != Some(&entry_idx) {
                slot.push(entry_idx);
            }
        }
        self.entries.push(Arc::new(entry));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DictionaryKind {
        self.kind
    }

    /// Get the number of entries in the dictionary
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Dictionary for JMdict {
    fn lookup_exact(&self, key: &str) -> Vec<Arc<dyn DictionaryEntry>> {
        let Some(indices) = self.index.get(key) else {
            return Vec::new();
        };

        indices
            .iter()
            .filter_map(|&idx| self.entries.get(idx))
            .map(|e| Arc::clone(e) as Arc<dyn DictionaryEntry>)
            .collect()
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            language: "ja".to_string(),
            kind: self.kind,
            entry_count: self.entries.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORDS: &str = r#"{
        "version": "3.6.1",
        "words": [
            { "id": "1358280",
              "kanji": [{ "text": "食べる" }, { "text": "喰べる" }],
              "kana": [{ "text": "たべる" }],
              "sense": [{ "partOfSpeech": ["v1", "vt"],
                          "gloss": [{ "lang": "eng", "text": "to eat" },
                                    { "lang": "ger", "text": "essen" }] }] },
            { "id": "1049180",
              "kana": [{ "text": "コーヒー" }],
              "sense": [{ "partOfSpeech": ["n"], "gloss": [{ "lang": "eng", "text": "coffee" }] }] },
            { "id": "9",
              "kana": [{ "text": "なし" }],
              "sense": [{ "gloss": [{ "lang": "ger", "text": "nichts" }] }] }
        ]
    }"#;

    const NAMES: &str = r#"{
        "words": [
            { "id": "5000001",
              "kanji": [{ "text": "田中" }],
              "kana": [{ "text": "たなか" }],
              "translation": [{ "type": ["surname"],
                                "translation": [{ "lang": "eng", "text": "Tanaka" }] }] }
        ]
    }"#;

    #[test]
    fn parses_words_and_skips_entries_without_english() {
        let dict = JMdict::from_json("jmdict", DictionaryKind::Word, WORDS).unwrap();
        assert_eq!(dict.entry_count(), 2);
        assert_eq!(dict.metadata().version, "3.6.1");

        let hits = dict.lookup_exact("たべる");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].headword(), "食べる");
        assert_eq!(hits[0].alternative_spellings(), vec!["喰べる"]);
        assert_eq!(hits[0].word_classes(), vec!["v1", "vt"]);
        assert_eq!(hits[0].definitions()[0].text, "to eat");
        assert_eq!(hits[0].definitions().len(), 1);
    }

    #[test]
    fn spellings_are_indexed_in_hiragana() {
        let dict = JMdict::from_json("jmdict", DictionaryKind::Word, WORDS).unwrap();
        assert_eq!(dict.lookup_exact("こーひー").len(), 1);
        assert!(dict.lookup_exact("コーヒー").is_empty());
        assert_eq!(dict.lookup_exact("食べる").len(), 1);
        assert!(dict.lookup_exact("なし").is_empty());
    }

    #[test]
    fn parses_name_translations() {
        let dict = JMdict::from_json("jmnedict", DictionaryKind::Name, NAMES).unwrap();
        let hits = dict.lookup_exact("たなか");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].word_classes(), vec!["surname"]);
        assert_eq!(dict.metadata().kind, DictionaryKind::Name);
    }

    #[test]
    fn entry_with_equal_kanji_and_reading_is_returned_once() {
        let dict = JMdict::from_entries(
            "custom",
            DictionaryKind::Word,
            [JMdictEntry {
                id: "1".to_string(),
                kanji: vec!["ひらがな".to_string()],
                readings: vec!["ヒラガナ".to_string()],
                meanings: vec!["hiragana".to_string()],
                pos: vec![],
            }],
        );
        assert_eq!(dict.lookup_exact("ひらがな").len(), 1);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = JMdict::from_json("bad", DictionaryKind::Word, "{").unwrap_err();
        assert!(matches!(err, LoadError::ParseError(_)));
    }
}
