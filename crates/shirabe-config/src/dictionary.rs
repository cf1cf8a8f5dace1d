use std::env;

use serde::{Deserialize, Serialize};

use crate::env_list;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Deconjugation rule file; the embedded rules are used when unset
    pub rules_path: Option<String>,
    /// Word dictionaries in priority order
    pub word_paths: Vec<String>,
    pub name_paths: Vec<String>,
    pub kanji_path: Option<String>,
    pub frequency_paths: Vec<String>,
    /// Name of the frequency list used for ranking; the first loaded one when unset
    pub active_frequency: Option<String>,
    /// Yomichan pitch accent dictionary directory or bank file
    pub pitch_accent_path: Option<String>,
}

impl DictionaryConfig {
    pub fn from_env() -> Self {
        Self {
            rules_path: env::var("SHIRABE_RULES_PATH").ok(),
            word_paths: env_list("SHIRABE_WORD_DICTIONARIES"),
            name_paths: env_list("SHIRABE_NAME_DICTIONARIES"),
            kanji_path: env::var("SHIRABE_KANJI_DICTIONARY").ok(),
            frequency_paths: env_list("SHIRABE_FREQUENCY_LISTS"),
            active_frequency: env::var("SHIRABE_ACTIVE_FREQUENCY").ok(),
            pitch_accent_path: env::var("SHIRABE_PITCH_ACCENT_DICTIONARY").ok(),
        }
    }
}
