use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

/// Dictionary lookup operations, keyed by canonical spelling
pub trait Dictionary: Send + Sync {
    /// All entries filed under `key`, empty when there are none
    fn lookup_exact(&self, key: &str) -> Vec<Arc<dyn DictionaryEntry>>;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

/// Single character lookups (kanji dictionaries)
pub trait CharacterDictionary: Send + Sync {
    fn lookup_char(&self, character: &str) -> Option<Arc<dyn DictionaryEntry>>;

    fn metadata(&self) -> DictionaryMetadata;
}

/// Individual dictionary entry
pub trait DictionaryEntry: Send + Sync + fmt::Debug {
    /// Unique entry ID
    fn id(&self) -> String;

    /// Main headword/term
    fn headword(&self) -> String;

    /// Other spellings of the headword
    fn alternative_spellings(&self) -> Vec<String> {
        Vec::new()
    }

    /// All possible readings/pronunciations
    fn readings(&self) -> Vec<String>;

    /// Grammatical classes ("v1", "v5k", "adj-i", ...); empty when the source has none
    fn word_classes(&self) -> Vec<String> {
        Vec::new()
    }

    /// All definitions
    fn definitions(&self) -> Vec<Definition>;

    /// Rank carried by the entry itself (kanji dictionaries ship one)
    fn frequency(&self) -> Option<u32> {
        None
    }
}

/// Optional trait for word frequency data
pub trait FrequencyProvider: Send + Sync {
    /// Name of the frequency list
    fn name(&self) -> &str;

    /// Ranked spellings filed under the canonical `key` (lower = more common)
    fn lookup(&self, key: &str) -> Vec<FrequencyRecord>;
}

/// Pitch accent data keyed like frequency lists
pub trait PitchAccentProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Records filed under the canonical `key`, by spelling or by reading
    fn lookup(&self, key: &str) -> Vec<PitchAccentRecord>;
}

/// Downstep positions of one spelling/reading pair; 0 is flat
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PitchAccentRecord {
    pub spelling: String,
    pub reading: Option<String>,
    pub positions: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyRecord {
    pub spelling: String,
    pub rank: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DictionaryKind {
    Word,
    Name,
    Kanji,
    Frequency,
    PitchAccent,
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub version: String,
    pub language: String,
    pub kind: DictionaryKind,
    pub entry_count: usize,
}

#[derive(Debug, Clone)]
pub struct Definition {
    pub text: String,
    pub part_of_speech: Vec<String>,
    pub tags: Vec<String>,
}

/// Named slot holding the current snapshot of a dictionary.
///
/// Writers build a complete replacement off to the side and `publish` it; readers
/// only ever see whole snapshots. While a rebuild is announced the slot reports
/// nothing so lookups skip it instead of mixing old and new content.
pub struct DictionaryHandle<D: ?Sized> {
    name: String,
    kind: DictionaryKind,
    ready: AtomicBool,
    snapshot: RwLock<Option<Arc<D>>>,
}

impl<D: ?Sized> DictionaryHandle<D> {
    /// Slot that starts ready with `snapshot`
    pub fn new(name: impl Into<String>, kind: DictionaryKind, snapshot: Arc<D>) -> Self {
        Self {
            name: name.into(),
            kind,
            ready: AtomicBool::new(true),
            snapshot: RwLock::new(Some(snapshot)),
        }
    }

    /// Slot with nothing loaded yet
    pub fn pending(name: impl Into<String>, kind: DictionaryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ready: AtomicBool::new(false),
            snapshot: RwLock::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DictionaryKind {
        self.kind
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Current snapshot, `None` while loading or rebuilding
    pub fn snapshot(&self) -> Option<Arc<D>> {
        if !self.is_ready() {
            return None;
        }
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Take the slot out of service until the next `publish`
    pub fn begin_rebuild(&self) {
        self.ready.store(false, Ordering::Release);
        tracing::debug!(dictionary = %self.name, "dictionary rebuild started");
    }

    /// Return the slot to service after a failed rebuild. Stays out of service
    /// when nothing was ever published.
    pub fn abort_rebuild(&self) {
        let has_snapshot = self
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some();
        if has_snapshot {
            self.ready.store(true, Ordering::Release);
            tracing::warn!(dictionary = %self.name, "dictionary rebuild aborted, keeping previous snapshot");
        }
    }

    /// Swap in a fully built snapshot and mark the slot ready
    pub fn publish(&self, snapshot: Arc<D>) {
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
        self.ready.store(true, Ordering::Release);
        tracing::info!(dictionary = %self.name, "dictionary published");
    }
}

impl<D: ?Sized> fmt::Debug for DictionaryHandle<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictionaryHandle")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("ready", &self.is_ready())
            .finish()
    }
}
