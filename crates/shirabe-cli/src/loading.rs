use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use shirabe_config::DictionaryConfig;
use shirabe_core::{
    CharacterDictionary, Dictionary, DictionaryHandle, DictionaryKind, FrequencyProvider, LoadError,
    PitchAccentProvider,
};
use shirabe_lang_japanese::{
    JMdictLoader, JapaneseFrequency, JapanesePitchAccent, JapaneseProcessor, KanjiDictionary, RuleSet,
};
use tokio::task::JoinHandle;

/// Deconjugation rules from `path`, or the embedded set when there is none
pub async fn load_rules(path: Option<PathBuf>) -> anyhow::Result<Arc<RuleSet>> {
    let rules = tokio::task::spawn_blocking(move || match &path {
        Some(path) => RuleSet::load_from_file(path)
            .with_context(|| format!("failed to load deconjugation rules from {}", path.display())),
        None => RuleSet::embedded().context("embedded deconjugation rules are invalid"),
    })
    .await
    .context("rule loading task panicked")??;

    Ok(Arc::new(rules))
}

/// A dictionary file and the handle it is published into
pub struct Slot<D: ?Sized> {
    pub path: PathBuf,
    pub handle: Arc<DictionaryHandle<D>>,
}

impl<D: ?Sized> Slot<D> {
    fn pending(path: &str, kind: DictionaryKind) -> Self {
        let path = PathBuf::from(path);
        Self {
            handle: Arc::new(DictionaryHandle::pending(JMdictLoader::name_for(&path), kind)),
            path,
        }
    }
}

impl<D: ?Sized> Clone for Slot<D> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            handle: Arc::clone(&self.handle),
        }
    }
}

/// Every configured dictionary file with its (initially pending) handle
#[derive(Clone, Default)]
pub struct Dictionaries {
    pub words: Vec<Slot<dyn Dictionary>>,
    pub names: Vec<Slot<dyn Dictionary>>,
    pub kanji: Option<Slot<dyn CharacterDictionary>>,
    pub frequency: Option<Slot<dyn FrequencyProvider>>,
    pub pitch_accent: Option<Slot<dyn PitchAccentProvider>>,
}

impl Dictionaries {
    pub fn pending(config: &DictionaryConfig) -> Self {
        let frequency = active_frequency_path(&config.frequency_paths, config.active_frequency.as_deref())
            .map(|path| Slot::pending(path, DictionaryKind::Frequency));

        Self {
            words: config
                .word_paths
                .iter()
                .map(|path| Slot::pending(path, DictionaryKind::Word))
                .collect(),
            names: config
                .name_paths
                .iter()
                .map(|path| Slot::pending(path, DictionaryKind::Name))
                .collect(),
            kanji: config
                .kanji_path
                .as_deref()
                .map(|path| Slot::pending(path, DictionaryKind::Kanji)),
            frequency,
            pitch_accent: config
                .pitch_accent_path
                .as_deref()
                .map(|path| Slot::pending(path, DictionaryKind::PitchAccent)),
        }
    }

    /// Register every handle with `processor`
    pub fn attach(&self, processor: JapaneseProcessor) -> JapaneseProcessor {
        let mut processor = self
            .words
            .iter()
            .fold(processor, |p, slot| p.with_word_dictionary(Arc::clone(&slot.handle)));
        processor = self
            .names
            .iter()
            .fold(processor, |p, slot| p.with_name_dictionary(Arc::clone(&slot.handle)));
        if let Some(slot) = &self.kanji {
            processor = processor.with_kanji_dictionary(Arc::clone(&slot.handle));
        }
        if let Some(slot) = &self.frequency {
            processor = processor.with_frequency(Arc::clone(&slot.handle));
        }
        if let Some(slot) = &self.pitch_accent {
            processor = processor.with_pitch_accent(Arc::clone(&slot.handle));
        }
        processor
    }

    pub fn is_ready(&self) -> bool {
        self.words.iter().all(|slot| slot.handle.is_ready())
            && self.names.iter().all(|slot| slot.handle.is_ready())
            && self.kanji.iter().all(|slot| slot.handle.is_ready())
            && self.frequency.iter().all(|slot| slot.handle.is_ready())
            && self.pitch_accent.iter().all(|slot| slot.handle.is_ready())
    }
}

/// The frequency list used for ranking: the one named `active` (by file stem),
/// otherwise the first configured list
pub fn active_frequency_path<'a>(paths: &'a [String], active: Option<&str>) -> Option<&'a str> {
    let Some(active) = active else {
        return paths.first().map(String::as_str);
    };

    match paths
        .iter()
        .find(|path| JMdictLoader::name_for(Path::new(path)) == active)
    {
        Some(path) => Some(path.as_str()),
        None => {
            if !paths.is_empty() {
                tracing::warn!("Frequency list '{active}' is not configured, using the first list");
            }
            paths.first().map(String::as_str)
        }
    }
}

/// Load every configured file off the async runtime and publish it into its
/// handle. Files that fail to load are logged and skipped; returns how many
/// were published.
pub async fn load_all(dictionaries: &Dictionaries) -> usize {
    let mut tasks = Vec::new();

    for slot in &dictionaries.words {
        tasks.push(spawn_load(slot.clone(), |path| {
            JMdictLoader::load_from_file(path, DictionaryKind::Word)
                .map(|dict| Arc::new(dict) as Arc<dyn Dictionary>)
        }));
    }
    for slot in &dictionaries.names {
        tasks.push(spawn_load(slot.clone(), |path| {
            JMdictLoader::load_from_file(path, DictionaryKind::Name)
                .map(|dict| Arc::new(dict) as Arc<dyn Dictionary>)
        }));
    }
    if let Some(slot) = &dictionaries.kanji {
        tasks.push(spawn_load(slot.clone(), |path| {
            KanjiDictionary::load_from_file(path).map(|dict| Arc::new(dict) as Arc<dyn CharacterDictionary>)
        }));
    }
    if let Some(slot) = &dictionaries.frequency {
        tasks.push(spawn_load(slot.clone(), |path| {
            JapaneseFrequency::load_from_file(path).map(|list| Arc::new(list) as Arc<dyn FrequencyProvider>)
        }));
    }
    if let Some(slot) = &dictionaries.pitch_accent {
        tasks.push(spawn_load(slot.clone(), |path| {
            JapanesePitchAccent::load_from_file(path)
                .map(|dict| Arc::new(dict) as Arc<dyn PitchAccentProvider>)
        }));
    }

    let mut published = 0;
    for task in tasks {
        match task.await {
            Ok(true) => published += 1,
            Ok(false) => {}
            Err(e) => tracing::error!("dictionary loading task panicked: {e}"),
        }
    }
    published
}

/// Build the dictionary on a blocking thread, then swap it into the handle.
/// A handle that was already serving is taken out of service for the rebuild
/// and goes back to its previous snapshot when the build fails.
fn spawn_load<D, F>(slot: Slot<D>, load: F) -> JoinHandle<bool>
where
    D: ?Sized + Send + Sync + 'static,
    F: FnOnce(&Path) -> Result<Arc<D>, LoadError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        if slot.handle.is_ready() {
            slot.handle.begin_rebuild();
        }

        match load(&slot.path) {
            Ok(dict) => {
                slot.handle.publish(dict);
                true
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {e}", slot.path.display());
                slot.handle.abort_rebuild();
                false
            }
        }
    })
}
