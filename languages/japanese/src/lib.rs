pub mod boundary;
pub mod deconjugator;
pub mod dictionary;
pub mod frequency;
pub mod kana;
pub mod kanji;
pub mod loader;
pub mod pitch_accent;
pub mod processor;
pub mod rules;

#[cfg(test)]
mod tests;

pub use boundary::{contains_japanese, find_word_boundary, lookup_span};
pub use deconjugator::JapaneseDeconjugator;
pub use dictionary::{JMdict, JMdictEntry};
pub use frequency::{JapaneseFrequency, entry_frequency};
pub use kana::{hiragana_to_katakana, is_katakana, katakana_to_hiragana, long_vowel_mark_to_kana};
pub use kanji::{KanjiDictionary, KanjiEntry};
pub use loader::JMdictLoader;
pub use pitch_accent::{JapanesePitchAccent, PatternType, entry_pitch_accents};
pub use processor::{
    FrequencyHandle, JapaneseProcessor, KanjiHandle, PitchAccentHandle, WordHandle,
};
pub use rules::{ContextPredicate, Rule, RuleError, RuleSet};
