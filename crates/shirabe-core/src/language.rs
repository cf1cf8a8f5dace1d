use crate::lookup::LookupCandidate;

/// Text processing and lookup interface for language implementations
pub trait LanguageProcessor: Send + Sync {
    /// Language identifier (ISO 639-1 code: "ja", "zh", "ko", etc.)
    fn language_code(&self) -> &str;

    /// Canonical lookup key for a spelling or reading
    fn normalize(&self, text: &str) -> String;

    /// Look up the longest dictionary matches at the start of `text`, ranked
    fn lookup(&self, text: &str) -> Vec<LookupCandidate>;
}
