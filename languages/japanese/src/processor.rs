use std::collections::HashSet;
use std::sync::Arc;

use shirabe_config::LookupConfig;
use shirabe_core::{
    CharacterDictionary, Dictionary, DictionaryEntry, DictionaryHandle, DictionaryKind, Form,
    Frequency, FrequencyProvider, LanguageProcessor, LookupCandidate, PitchAccentProvider,
    rank_candidates,
};

use crate::deconjugator::JapaneseDeconjugator;
use crate::frequency::entry_frequency;
use crate::kana::{LONG_VOWEL_MARK, katakana_to_hiragana, long_vowel_mark_to_kana};
use crate::pitch_accent::entry_pitch_accents;
use crate::rules::RuleSet;

pub type WordHandle = Arc<DictionaryHandle<dyn Dictionary>>;
pub type KanjiHandle = Arc<DictionaryHandle<dyn CharacterDictionary>>;
pub type FrequencyHandle = Arc<DictionaryHandle<dyn FrequencyProvider>>;
pub type PitchAccentHandle = Arc<DictionaryHandle<dyn PitchAccentProvider>>;

/// Japanese language processor.
///
/// Holds handles rather than dictionaries so that loading and rebuilding can
/// happen elsewhere; every lookup works on the snapshots that are ready when it
/// starts.
pub struct JapaneseProcessor {
    deconjugator: JapaneseDeconjugator,
    words: Vec<WordHandle>,
    names: Vec<WordHandle>,
    kanji: Option<KanjiHandle>,
    frequency: Option<FrequencyHandle>,
    pitch_accent: Option<PitchAccentHandle>,
    config: LookupConfig,
}

/// A ready dictionary for the duration of one lookup
struct Source {
    name: String,
    kind: DictionaryKind,
    dict: Arc<dyn Dictionary>,
}

impl JapaneseProcessor {
    pub fn new(rules: Arc<RuleSet>, config: LookupConfig) -> Self {
        Self {
            deconjugator: JapaneseDeconjugator::new(rules),
            words: Vec::new(),
            names: Vec::new(),
            kanji: None,
            frequency: None,
            pitch_accent: None,
            config,
        }
    }

    /// Word dictionaries are searched in the order they are added
    pub fn with_word_dictionary(mut self, handle: WordHandle) -> Self {
        self.words.push(handle);
        self
    }

    pub fn with_name_dictionary(mut self, handle: WordHandle) -> Self {
        self.names.push(handle);
        self
    }

    pub fn with_kanji_dictionary(mut self, handle: KanjiHandle) -> Self {
        self.kanji = Some(handle);
        self
    }

    pub fn with_frequency(mut self, handle: FrequencyHandle) -> Self {
        self.frequency = Some(handle);
        self
    }

    pub fn with_pitch_accent(mut self, handle: PitchAccentHandle) -> Self {
        self.pitch_accent = Some(handle);
        self
    }

    pub fn deconjugator(&self) -> &JapaneseDeconjugator {
        &self.deconjugator
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Dictionary matches for prefixes of `text`, longest and most common first
    pub fn lookup_text(&self, text: &str) -> Vec<LookupCandidate> {
        let text: String = text.chars().take(self.config.max_search_length).collect();
        if text.is_empty() {
            return Vec::new();
        }

        let mut candidates = if self.config.kanji_mode {
            self.kanji_candidates(&text)
        } else {
            let found = self.scan_prefixes(&text);
            if found.is_empty() {
                self.kanji_candidates(&text)
            } else {
                found
            }
        };

        self.attach_frequency(&mut candidates);
        self.attach_pitch_accents(&mut candidates);
        rank_candidates(&mut candidates);

        tracing::debug!(text = %text, candidates = candidates.len(), "lookup finished");
        candidates
    }

    fn scan_prefixes(&self, text: &str) -> Vec<LookupCandidate> {
        let words = ready(&self.words);
        let names = if self.config.use_name_dictionary {
            ready(&self.names)
        } else {
            Vec::new()
        };
        if words.is_empty() && names.is_empty() {
            return Vec::new();
        }

        let mut scan = Scan::default();
        let chars: Vec<char> = text.chars().collect();

        for len in (1..=chars.len()).rev() {
            let prefix: String = chars[..len].iter().collect();
            let key = katakana_to_hiragana(&prefix);

            let mut found = false;
            for source in &words {
                found |= scan.direct(source, &prefix, &key);
            }
            for source in &names {
                scan.direct(source, &prefix, &key);
            }

            if scan.deconjugated < self.config.deconjugation_cap {
                for form in self.deconjugator.deconjugate(&key) {
                    if form.is_start() {
                        continue;
                    }
                    let accepted = words
                        .iter()
                        .fold(false, |acc, source| scan.deconjugated_hit(source, &prefix, &form) || acc);
                    if accepted {
                        scan.deconjugated += 1;
                        found = true;
                    }
                }
            }

            if !found && key.contains(LONG_VOWEL_MARK) && !key.starts_with(LONG_VOWEL_MARK) {
                for alternative in long_vowel_mark_to_kana(&key) {
                    if alternative == key {
                        continue;
                    }
                    for source in &words {
                        scan.direct(source, &prefix, &alternative);
                    }
                }
            }
        }

        scan.candidates
    }

    /// Single character lookup in the kanji dictionary
    fn kanji_candidates(&self, text: &str) -> Vec<LookupCandidate> {
        let Some(handle) = &self.kanji else {
            return Vec::new();
        };
        let Some(dict) = handle.snapshot() else {
            return Vec::new();
        };
        let Some(first) = text.chars().next().map(String::from) else {
            return Vec::new();
        };

        dict.lookup_char(&first)
            .map(|entry| LookupCandidate {
                matched_surface_text: first.clone(),
                deconjugated_text: first.clone(),
                process_path: Vec::new(),
                dictionary: handle.name().to_string(),
                kind: handle.kind(),
                records: vec![entry],
                frequency: Frequency::Unknown,
                pitch_accents: Vec::new(),
            })
            .into_iter()
            .collect()
    }

    /// Best rank over every record of a candidate. Word records consult the active
    /// frequency list; every record may carry a rank of its own.
    fn attach_frequency(&self, candidates: &mut [LookupCandidate]) {
        let provider = self.frequency.as_ref().and_then(|handle| handle.snapshot());

        for candidate in candidates.iter_mut() {
            let mut best = Frequency::Unknown;
            for record in &candidate.records {
                best = best.best(record.frequency().into());
                if let (DictionaryKind::Word, Some(provider)) = (candidate.kind, &provider) {
                    best = best.best(entry_frequency(&**provider, &**record).into());
                }
            }
            candidate.frequency = best;
        }
    }

    fn attach_pitch_accents(&self, candidates: &mut [LookupCandidate]) {
        let Some(provider) = self.pitch_accent.as_ref().and_then(|handle| handle.snapshot()) else {
            return;
        };

        for candidate in candidates.iter_mut() {
            if candidate.kind != DictionaryKind::Word {
                continue;
            }
            for record in &candidate.records {
                for accent in entry_pitch_accents(&*provider, &**record) {
                    if !candidate.pitch_accents.contains(&accent) {
                        candidate.pitch_accents.push(accent);
                    }
                }
            }
        }
    }
}

impl LanguageProcessor for JapaneseProcessor {
    fn language_code(&self) -> &str {
        "ja"
    }

    fn normalize(&self, text: &str) -> String {
        katakana_to_hiragana(text)
    }

    fn lookup(&self, text: &str) -> Vec<LookupCandidate> {
        self.lookup_text(text)
    }
}

fn ready(handles: &[WordHandle]) -> Vec<Source> {
    handles
        .iter()
        .filter_map(|handle| {
            handle.snapshot().map(|dict| Source {
                name: handle.name().to_string(),
                kind: handle.kind(),
                dict,
            })
        })
        .collect()
}

/// Records whose word classes fit the form's tag path; records without classes always fit
fn matching_records(records: Vec<Arc<dyn DictionaryEntry>>, tags: &[String]) -> Vec<Arc<dyn DictionaryEntry>> {
    records
        .into_iter()
        .filter(|record| {
            let classes = record.word_classes();
            classes.is_empty() || classes.iter().any(|class| tags.contains(class))
        })
        .collect()
}

/// Accumulated state of one prefix scan
#[derive(Default)]
struct Scan {
    candidates: Vec<LookupCandidate>,
    /// (dictionary, key) pairs already recorded
    seen: HashSet<(String, String)>,
    deconjugated: usize,
}

impl Scan {
    fn direct(&mut self, source: &Source, prefix: &str, key: &str) -> bool {
        if self.seen.contains(&(source.name.clone(), key.to_string())) {
            return false;
        }
        let records = source.dict.lookup_exact(key);
        if records.is_empty() {
            return false;
        }
        self.record(source, prefix, key, Vec::new(), records);
        true
    }

    fn deconjugated_hit(&mut self, source: &Source, prefix: &str, form: &Form) -> bool {
        if self.seen.contains(&(source.name.clone(), form.text.clone())) {
            return false;
        }
        let records = matching_records(source.dict.lookup_exact(&form.text), &form.tags);
        if records.is_empty() {
            return false;
        }
        self.record(source, prefix, &form.text, form.process.clone(), records);
        true
    }

    fn record(
        &mut self,
        source: &Source,
        prefix: &str,
        key: &str,
        process_path: Vec<String>,
        records: Vec<Arc<dyn DictionaryEntry>>,
    ) {
        self.seen.insert((source.name.clone(), key.to_string()));
        self.candidates.push(LookupCandidate {
            matched_surface_text: prefix.to_string(),
            deconjugated_text: key.to_string(),
            process_path,
            dictionary: source.name.clone(),
            kind: source.kind,
            records,
            frequency: Frequency::Unknown,
            pitch_accents: Vec::new(),
        });
    }
}
