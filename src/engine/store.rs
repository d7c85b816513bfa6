use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, ErrorKind};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::warn;

/// A single JSON file holding one serializable value. All mutation happens on
/// the in-memory value; callers invoke `flush` once per logical unit of change.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    data: T,
}

impl<T: Serialize + DeserializeOwned + Default> JsonStore<T> {
    /// Loads the store from its backing file. A missing or empty file is
    /// replaced with the type's default (and written out); a file with
    /// unparsable contents is a fatal initialization error.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => Self::initialize(path),
            Ok(raw) => {
                let data = serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse store file {}", path.display()))?;
                Ok(Self { path, data })
            }
            Err(error) if error.kind() == ErrorKind::NotFound => Self::initialize(path),
            Err(error) => Err(error)
                .with_context(|| format!("failed to read store file {}", path.display())),
        }
    }

    fn initialize(path: PathBuf) -> Result<Self> {
        let store = Self {
            path,
            data: T::default(),
        };
        store.flush()?;
        Ok(store)
    }

    /// Serializes the in-memory value back to the backing file, replacing its
    /// contents wholesale. Writes through a temp file in the same directory so
    /// an interrupted flush never leaves a truncated store behind.
    pub fn flush(&self) -> Result<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create store directory {}", parent.display()))?;

        let temp_file = NamedTempFile::new_in(parent)
            .with_context(|| format!("failed to create temp file in {}", parent.display()))?;
        let writer = BufWriter::new(&temp_file);
        serde_json::to_writer(writer, &self.data)
            .with_context(|| format!("failed to serialize store {}", self.path.display()))?;
        temp_file
            .persist(&self.path)
            .with_context(|| format!("failed to replace store file {}", self.path.display()))?;
        Ok(())
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut T {
        &mut self.data
    }
}

/// Persisted acceptance counts. Increments accumulate instead of overwriting;
/// removal deletes the key outright so a later increment starts over.
#[derive(Debug)]
pub struct HistoryStore {
    store: JsonStore<BTreeMap<String, u64>>,
}

impl HistoryStore {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: JsonStore::load(path)?,
        })
    }

    pub fn increment(&mut self, word: &str, amount: u64) {
        *self.store.data_mut().entry(word.to_owned()).or_insert(0) += amount;
    }

    /// Returns whether the entry existed. Removing an absent word is a no-op.
    pub fn remove(&mut self, word: &str) -> bool {
        self.store.data_mut().remove(word).is_some()
    }

    pub fn count(&self, word: &str) -> u64 {
        self.store.data().get(word).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.store
            .data()
            .iter()
            .map(|(word, count)| (word.as_str(), *count))
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}

/// Persisted set of words excluded from every result list. Append-only and
/// idempotent; consulted only at the final filtering stage of a query.
#[derive(Debug)]
pub struct IgnoreList {
    store: JsonStore<Vec<String>>,
}

impl IgnoreList {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        Ok(Self {
            store: JsonStore::load(path)?,
        })
    }

    /// Returns whether the word was newly added.
    pub fn add(&mut self, word: &str) -> bool {
        if self.contains(word) {
            return false;
        }
        self.store.data_mut().push(word.to_owned());
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.store.data().iter().any(|entry| entry == word)
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}

/// Custom words degrade to an empty mapping when their file is missing or
/// unparsable; unlike the other stores this is never fatal.
pub fn load_custom_words(path: &Path) -> BTreeMap<String, String> {
    match fs::read_to_string(path) {
        Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
        Ok(raw) => match serde_json::from_str(&raw) {
            Ok(words) => words,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    "failed to parse custom words file, using empty set: {error}"
                );
                BTreeMap::new()
            }
        },
        Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
        Err(error) => {
            warn!(
                path = %path.display(),
                "failed to read custom words file, using empty set: {error}"
            );
            BTreeMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_initializes_default_and_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");

        let store: JsonStore<BTreeMap<String, u64>> = JsonStore::load(&path).unwrap();
        assert!(store.data().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn empty_file_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ignore.json");
        fs::write(&path, "").unwrap();

        let store: JsonStore<Vec<String>> = JsonStore::load(&path).unwrap();
        assert!(store.data().is_empty());
    }

    #[test]
    fn unparsable_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "{not json").unwrap();

        let result: Result<JsonStore<BTreeMap<String, u64>>> = JsonStore::load(&path);
        assert!(result.is_err());
    }

    #[test]
    fn flush_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let mut store: JsonStore<BTreeMap<String, u64>> = JsonStore::load(&path).unwrap();
        store.data_mut().insert("hello".to_owned(), 3);
        store.flush().unwrap();

        let reloaded: JsonStore<BTreeMap<String, u64>> = JsonStore::load(&path).unwrap();
        assert_eq!(reloaded.data().get("hello"), Some(&3));
    }

    #[test]
    fn history_increments_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = HistoryStore::load(dir.path().join("history.json")).unwrap();

        history.increment("word", 1);
        history.increment("word", 1);
        assert_eq!(history.count("word"), 2);

        assert!(history.remove("word"));
        assert!(!history.remove("word"));
        assert_eq!(history.count("word"), 0);

        history.increment("word", 1);
        assert_eq!(history.count("word"), 1);
    }

    #[test]
    fn ignore_list_add_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut ignore = IgnoreList::load(dir.path().join("ignore.json")).unwrap();

        assert!(ignore.add("word"));
        assert!(!ignore.add("word"));
        assert!(ignore.contains("word"));

        ignore.flush().unwrap();
        let reloaded = IgnoreList::load(dir.path().join("ignore.json")).unwrap();
        assert!(reloaded.contains("word"));
    }

    #[test]
    fn custom_words_degrade_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("custom-words.json");
        assert!(load_custom_words(&missing).is_empty());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "[1, 2").unwrap();
        assert!(load_custom_words(&broken).is_empty());

        let valid = dir.path().join("custom-words.json");
        fs::write(&valid, r#"{"brb": "be right back"}"#).unwrap();
        let words = load_custom_words(&valid);
        assert_eq!(words.get("brb").map(String::as_str), Some("be right back"));
    }
}
