pub mod deconjugation;
pub mod dictionary;
pub mod error;
pub mod language;
pub mod lookup;
pub mod preprocess;

pub use deconjugation::{Deconjugator, Form};
pub use dictionary::{
    CharacterDictionary, Definition, Dictionary, DictionaryEntry, DictionaryHandle, DictionaryKind,
    DictionaryMetadata, FrequencyProvider, FrequencyRecord, PitchAccentProvider, PitchAccentRecord,
};
pub use error::LoadError;
pub use language::LanguageProcessor;
pub use lookup::{Frequency, LookupCandidate, rank_candidates};
