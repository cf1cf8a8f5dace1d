use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

/// Optional trait for languages with conjugation/declension
pub trait Deconjugator: Send + Sync {
    /// Every form reachable from `word`, the unchanged start form first
    fn deconjugate(&self, word: &str) -> Vec<Form>;
}

/// One node of a deconjugation search.
///
/// `tags` and `process` are ordered oldest first. `seen_text` records every
/// intermediate text on the path and does not take part in equality.
#[derive(Debug, Clone)]
pub struct Form {
    pub text: String,
    pub original_text: String,
    pub tags: Vec<String>,
    pub seen_text: BTreeSet<String>,
    pub process: Vec<String>,
}

impl Form {
    /// The trivial form a search starts from
    pub fn start(text: &str) -> Self {
        Self {
            text: text.to_string(),
            original_text: text.to_string(),
            tags: Vec::new(),
            seen_text: BTreeSet::new(),
            process: Vec::new(),
        }
    }

    /// True when no rule has been applied on this path
    pub fn is_start(&self) -> bool {
        self.process.is_empty()
    }

    pub fn last_tag(&self) -> Option<&str> {
        self.tags.last().map(String::as_str)
    }

    /// Successor with `text` rewritten and `detail` appended to the process.
    /// Tags are left to the caller.
    pub fn derive(&self, text: String, detail: &str) -> Self {
        let mut seen_text = self.seen_text.clone();
        if seen_text.is_empty() {
            seen_text.insert(self.text.clone());
        }
        seen_text.insert(text.clone());

        let mut process = self.process.clone();
        process.push(detail.to_string());

        Self {
            text,
            original_text: self.original_text.clone(),
            tags: self.tags.clone(),
            seen_text,
            process,
        }
    }
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.original_text == other.original_text
            && self.tags == other.tags
            && self.process == other.process
    }
}

impl Eq for Form {}

impl Hash for Form {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
        self.original_text.hash(state);
        self.tags.hash(state);
        self.process.hash(state);
    }
}
