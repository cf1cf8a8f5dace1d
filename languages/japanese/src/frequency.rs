use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use shirabe_core::{DictionaryEntry, FrequencyProvider, FrequencyRecord, LoadError};

use crate::kana::{is_katakana, katakana_to_hiragana};

/// Japanese word frequency list.
///
/// Records are filed under the hiragana form of their spelling. A record that
/// names a reading is also filed under the reading, and the spelling key then
/// points back at the reading, so both sides can be resolved.
#[derive(Debug, Clone, Default)]
pub struct JapaneseFrequency {
    name: String,
    records: HashMap<String, Vec<FrequencyRecord>>,
}

impl JapaneseFrequency {
    /// Create empty frequency database
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: HashMap::new(),
        }
    }

    pub fn insert(&mut self, spelling: &str, reading: Option<&str>, rank: u32) {
        let spelling_key = katakana_to_hiragana(spelling);

        let Some(reading) = reading else {
            self.push(spelling_key, spelling, rank);
            return;
        };

        self.push(katakana_to_hiragana(reading), spelling, rank);
        if reading != spelling {
            self.push(spelling_key, reading, rank);
        }
    }

    fn push(&mut self, key: String, spelling: &str, rank: u32) {
        self.records.entry(key).or_default().push(FrequencyRecord {
            spelling: spelling.to_string(),
            rank,
        });
    }

    /// Number of keys with at least one record
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse TSV lines of `spelling\trank` or `spelling\treading\trank`.
    /// Blank lines, `#` comments and lines without a numeric rank are skipped.
    pub fn from_tsv(name: impl Into<String>, content: &str) -> Self {
        let mut list = Self::new(name);

        for line in content.lines() {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').map(str::trim).collect();
            match parts.as_slice() {
                [spelling, rank] => {
                    if let Ok(rank) = rank.parse::<u32>() {
                        list.insert(spelling, None, rank);
                    }
                }
                [spelling, reading, rank, ..] => {
                    if let Ok(rank) = rank.parse::<u32>() {
                        list.insert(spelling, Some(reading), rank);
                    }
                }
                _ => {}
            }
        }

        list
    }

    /// Add the rows of one Yomichan `term_meta_bank_*.json` file
    pub fn extend_from_yomichan_bank(&mut self, json: &str) -> Result<(), LoadError> {
        let rows: Vec<MetaRow> =
            serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

        for MetaRow(spelling, mode, value) in rows {
            if mode != "freq" {
                continue;
            }
            if let Some((reading, rank)) = value.resolve() {
                self.insert(&spelling, reading.as_deref(), rank);
            }
        }
        Ok(())
    }

    /// Load a frequency list. A directory is read as a Yomichan frequency
    /// dictionary (every `*term*_bank_*.json` inside), a `.json` file as a single
    /// Yomichan bank, anything else as TSV. The list is named after the file stem.
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        tracing::info!("Loading frequency list from: {}", path.display());
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();

        let list = if path.is_dir() {
            let mut list = Self::new(name);
            for bank in term_bank_files(path)? {
                let json = std::fs::read_to_string(&bank).map_err(|e| LoadError::from_io(&bank, e))?;
                list.extend_from_yomichan_bank(&json)?;
            }
            list
        } else if path.extension().is_some_and(|ext| ext == "json") {
            let json = std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
            let mut list = Self::new(name);
            list.extend_from_yomichan_bank(&json)?;
            list
        } else {
            let content = std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
            Self::from_tsv(name, &content)
        };

        tracing::info!("Loaded {} frequency keys into {}", list.len(), list.name);
        Ok(list)
    }
}

impl FrequencyProvider for JapaneseFrequency {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookup(&self, key: &str) -> Vec<FrequencyRecord> {
        self.records.get(key).cloned().unwrap_or_default()
    }
}

/// Sorted `*term*_bank_*.json` files of a Yomichan dictionary directory
pub(crate) fn term_bank_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let mut banks: Vec<_> = std::fs::read_dir(dir)
        .map_err(|e| LoadError::from_io(dir, e))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| is_term_bank(p))
        .collect();
    banks.sort();

    if banks.is_empty() {
        return Err(LoadError::InvalidFormat(format!(
            "no term banks in {}",
            dir.display()
        )));
    }
    Ok(banks)
}

fn is_term_bank(path: &Path) -> bool {
    let Some(file_name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    file_name.contains("term") && file_name.contains("_bank_") && file_name.ends_with(".json")
}

/// Best rank of `entry` in `provider`.
///
/// The primary spelling's key is tried first, accepting records for the spelling
/// itself or one of its readings. Without a match there, alternative spellings
/// are tried, accepting records for a reading. When the primary key is absent
/// altogether, each reading is tried instead, accepting a katakana reading that
/// names itself or a record for one of the alternative spellings.
pub fn entry_frequency(provider: &dyn FrequencyProvider, entry: &dyn DictionaryEntry) -> Option<u32> {
    let primary = entry.headword();
    let readings = entry.readings();
    let alternatives = entry.alternative_spellings();

    let primary_records = provider.lookup(&katakana_to_hiragana(&primary));

    if !primary_records.is_empty() {
        let best = primary_records
            .iter()
            .filter(|r| r.spelling == primary || readings.contains(&r.spelling))
            .map(|r| r.rank)
            .min();
        if best.is_some() {
            return best;
        }

        return alternatives
            .iter()
            .flat_map(|alt| provider.lookup(&katakana_to_hiragana(alt)))
            .filter(|r| readings.contains(&r.spelling))
            .map(|r| r.rank)
            .min();
    }

    let alternatives = &alternatives;
    readings
        .iter()
        .flat_map(|reading| {
            provider
                .lookup(&katakana_to_hiragana(reading))
                .into_iter()
                .filter(move |r| {
                    (r.spelling == *reading && is_katakana(reading))
                        || alternatives.contains(&r.spelling)
                })
        })
        .map(|r| r.rank)
        .min()
}

// Yomichan term meta rows: [spelling, mode, data]
#[derive(Debug, Deserialize)]
struct MetaRow(String, String, MetaValue);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Rank {
    Number(u32),
    Object { value: u32 },
}

impl Rank {
    fn get(&self) -> u32 {
        match self {
            Rank::Number(n) => *n,
            Rank::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MetaValue {
    Rank(Rank),
    WithReading { reading: String, frequency: Rank },
    Pair(String, u32),
    Text(String),
    Other(serde_json::Value),
}

impl MetaValue {
    fn resolve(self) -> Option<(Option<String>, u32)> {
        match self {
            MetaValue::Rank(rank) => Some((None, rank.get())),
            MetaValue::WithReading { reading, frequency } => Some((Some(reading), frequency.get())),
            MetaValue::Pair(reading, rank) => Some((Some(reading), rank)),
            MetaValue::Text(text) => leading_number(&text).map(|rank| (None, rank)),
            MetaValue::Other(_) => None,
        }
    }
}

/// First run of ASCII digits in `text`, e.g. "1234/5000" gives 1234
fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::dictionary::JMdictEntry;

    fn entry(kanji: &[&str], readings: &[&str]) -> JMdictEntry {
        JMdictEntry {
            id: "1".to_string(),
            kanji: kanji.iter().map(|s| s.to_string()).collect(),
            readings: readings.iter().map(|s| s.to_string()).collect(),
            meanings: vec!["meaning".to_string()],
            pos: vec![],
        }
    }

    #[test]
    fn reading_records_are_filed_both_ways() {
        let mut list = JapaneseFrequency::new("test");
        list.insert("食べる", Some("たべる"), 100);

        assert_eq!(
            list.lookup("たべる"),
            vec![FrequencyRecord { spelling: "食べる".to_string(), rank: 100 }]
        );
        assert_eq!(
            list.lookup("食べる"),
            vec![FrequencyRecord { spelling: "たべる".to_string(), rank: 100 }]
        );
    }

    #[test]
    fn katakana_spelling_is_keyed_in_hiragana() {
        let mut list = JapaneseFrequency::new("test");
        list.insert("コーヒー", None, 7);
        assert_eq!(list.lookup("こーひー")[0].spelling, "コーヒー");
        assert!(list.lookup("コーヒー").is_empty());
    }

    #[test]
    fn tsv_accepts_both_layouts() {
        let list = JapaneseFrequency::from_tsv(
            "tsv",
            "# comment\n食べる\t120\n見る\tみる\t30\nbroken line\n行く\tlots\n",
        );
        assert_eq!(list.lookup("食べる")[0].rank, 120);
        assert_eq!(list.lookup("みる")[0].spelling, "見る");
        assert!(list.lookup("行く").is_empty());
    }

    #[test]
    fn yomichan_bank_value_shapes() {
        let mut list = JapaneseFrequency::new("bank");
        list.extend_from_yomichan_bank(
            r#"[
                ["の", "freq", 1],
                ["日本", "freq", { "value": 67, "displayValue": "67" }],
                ["見る", "freq", { "reading": "みる", "frequency": 86 }],
                ["来る", "freq", { "reading": "くる", "frequency": { "value": 87 } }],
                ["行く", "freq", "93㋕"],
                ["書く", "freq", ["かく", 99]],
                ["箸", "pitch", { "reading": "はし", "pitches": [] }]
            ]"#,
        )
        .unwrap();

        assert_eq!(list.lookup("の")[0].rank, 1);
        assert_eq!(list.lookup("日本")[0].rank, 67);
        assert_eq!(list.lookup("みる")[0].spelling, "見る");
        assert_eq!(list.lookup("くる")[0].rank, 87);
        assert_eq!(list.lookup("行く")[0].rank, 93);
        assert_eq!(list.lookup("かく")[0].rank, 99);
        assert!(list.lookup("箸").is_empty());
    }

    #[test]
    fn entry_frequency_prefers_primary_spelling() {
        let mut list = JapaneseFrequency::new("test");
        list.insert("食べる", Some("たべる"), 100);
        list.insert("食べる", None, 80);

        let food = entry(&["食べる"], &["たべる"]);
        assert_eq!(entry_frequency(&list, &food), Some(80));
    }

    #[test]
    fn entry_frequency_falls_back_to_alternative_spellings() {
        let mut list = JapaneseFrequency::new("test");
        list.insert("会う", Some("あう"), 5);
        list.insert("逢う", Some("あう"), 900);

        // no record for 遭う: the reading is searched for the other spelling
        let meet = entry(&["遭う", "逢う"], &["あう"]);
        assert_eq!(entry_frequency(&list, &meet), Some(900));

        // 遭う is known but only under an unrelated reading
        list.insert("遭う", Some("そうぐう"), 1);
        list.insert("逢う", Some("あう"), 400);
        assert_eq!(entry_frequency(&list, &meet), Some(400));

        let alone = entry(&["遭う"], &["あう"]);
        assert_eq!(entry_frequency(&list, &alone), None);
    }

    #[test]
    fn entry_frequency_uses_readings_when_primary_key_missing() {
        let mut list = JapaneseFrequency::new("test");
        list.insert("コーヒー", None, 7);
        let coffee = entry(&["珈琲"], &["コーヒー"]);
        assert_eq!(entry_frequency(&list, &coffee), Some(7));

        let mut hiragana_only = JapaneseFrequency::new("test");
        hiragana_only.insert("たべる", None, 3);
        let food = entry(&["食べる"], &["たべる"]);
        assert_eq!(entry_frequency(&hiragana_only, &food), None);
    }

    #[test]
    fn loads_tsv_and_bank_files() {
        let dir = tempfile::tempdir().unwrap();

        let tsv = dir.path().join("novels.tsv");
        std::fs::write(&tsv, "見る\t30\n").unwrap();
        let list = JapaneseFrequency::load_from_file(&tsv).unwrap();
        assert_eq!(list.name(), "novels");
        assert_eq!(list.lookup("見る")[0].rank, 30);

        let bank_dir = dir.path().join("jpdb");
        std::fs::create_dir(&bank_dir).unwrap();
        let mut bank = std::fs::File::create(bank_dir.join("term_meta_bank_1.json")).unwrap();
        write!(bank, r#"[["見る", "freq", 12]]"#).unwrap();
        let list = JapaneseFrequency::load_from_file(&bank_dir).unwrap();
        assert_eq!(list.name(), "jpdb");
        assert_eq!(list.lookup("見る")[0].rank, 12);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = JapaneseFrequency::load_from_file(Path::new("/nonexistent/freq.tsv")).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound(_)));
    }
}
