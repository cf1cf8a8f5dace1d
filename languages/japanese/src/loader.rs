use std::path::Path;

use shirabe_core::{DictionaryKind, LoadError};

use crate::dictionary::JMdict;

pub struct JMdictLoader;

impl JMdictLoader {
    /// Load dictionary from file path, named after the file stem
    pub fn load_from_file(path: &Path, kind: DictionaryKind) -> Result<JMdict, LoadError> {
        tracing::info!("Loading {:?} dictionary from file: {}", kind, path.display());
        let json = std::fs::read_to_string(path).map_err(|e| LoadError::from_io(path, e))?;
        let dict = JMdict::from_json(Self::name_for(path), kind, &json)?;
        tracing::info!("Loaded {} dictionary entries from {}", dict.entry_count(), dict.name());
        Ok(dict)
    }

    /// Name a dictionary file is registered under
    pub fn name_for(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string())
    }
}
