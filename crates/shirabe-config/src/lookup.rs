use serde::{Deserialize, Serialize};

use crate::env_or;

fn default_deconjugation_cap() -> usize {
    3
}

fn default_use_name_dictionary() -> bool {
    true
}

fn default_max_search_length() -> usize {
    37
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LookupConfig {
    /// Deconjugation-derived matches accepted per lookup before deconjugation stops
    #[serde(default = "default_deconjugation_cap")]
    pub deconjugation_cap: usize,
    /// Only look up the first character in the kanji dictionary
    #[serde(default)]
    pub kanji_mode: bool,
    #[serde(default = "default_use_name_dictionary")]
    pub use_name_dictionary: bool,
    /// Characters of input considered per lookup
    #[serde(default = "default_max_search_length")]
    pub max_search_length: usize,
}

impl LookupConfig {
    pub fn from_env() -> Self {
        Self {
            deconjugation_cap: env_or("SHIRABE_DECONJUGATION_CAP", default_deconjugation_cap()),
            kanji_mode: env_or("SHIRABE_KANJI_MODE", false),
            use_name_dictionary: env_or(
                "SHIRABE_USE_NAME_DICTIONARY",
                default_use_name_dictionary(),
            ),
            max_search_length: env_or("SHIRABE_MAX_SEARCH_LENGTH", default_max_search_length()),
        }
    }
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            deconjugation_cap: default_deconjugation_cap(),
            kanji_mode: false,
            use_name_dictionary: default_use_name_dictionary(),
            max_search_length: default_max_search_length(),
        }
    }
}
