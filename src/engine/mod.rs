pub mod dictionary;
pub mod fuzzy;
pub mod processor;
pub mod ranking;
pub mod store;

use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::config::PathsConfig;
use processor::SuggestionProcessor;
use ranking::RankingSources;
use store::{HistoryStore, IgnoreList};

/// Owns the loaded dictionaries, the three persistent stores, and the
/// post-processor chain. All store files belong exclusively to this engine;
/// every mutating operation ends with exactly one flush of the store it
/// touched.
pub struct SuggestionEngine {
    dictionaries: BTreeMap<String, Vec<String>>,
    custom_words: BTreeMap<String, String>,
    history: HistoryStore,
    ignore_list: IgnoreList,
    processors: Vec<Box<dyn SuggestionProcessor>>,
    custom_words_file: PathBuf,
    ignore_list_file: PathBuf,
}

impl SuggestionEngine {
    /// Loads dictionaries and stores. Fails only on an existing but
    /// unparsable history or ignore-list file, or an unwritable data
    /// directory. Missing files become empty defaults; a bad custom-words
    /// file degrades to an empty set.
    pub fn new(paths: &PathsConfig) -> Result<Self> {
        let dictionaries = dictionary::load_dictionaries(&paths.dictionaries_dir);
        let custom_words_file = paths.custom_words_file();
        let ignore_list_file = paths.ignore_list_file();

        let custom_words = store::load_custom_words(&custom_words_file);
        let history = HistoryStore::load(paths.history_file())?;
        let ignore_list = IgnoreList::load(&ignore_list_file)?;

        info!(
            dictionaries = dictionaries.len(),
            custom_words = custom_words.len(),
            "suggestion engine loaded"
        );

        Ok(Self {
            dictionaries,
            custom_words,
            history,
            ignore_list,
            processors: Vec::new(),
            custom_words_file,
            ignore_list_file,
        })
    }

    pub fn with_processors(mut self, processors: Vec<Box<dyn SuggestionProcessor>>) -> Self {
        self.processors = processors;
        self
    }

    pub fn dictionary_count(&self) -> usize {
        self.dictionaries.len()
    }

    /// Unknown language tags are silently skipped; request order decides the
    /// order dictionary ranks are merged in.
    fn sources<'a>(&'a self, languages: &[String]) -> RankingSources<'a> {
        let dictionaries = languages
            .iter()
            .filter_map(|tag| self.dictionaries.get(tag))
            .map(Vec::as_slice)
            .collect();
        RankingSources {
            dictionaries,
            custom_words: &self.custom_words,
            history: &self.history,
            ignore: &self.ignore_list,
        }
    }

    pub fn get_suggestions(&self, word: &str, languages: &[String]) -> Vec<String> {
        ranking::ranked(word, &self.sources(languages))
    }

    pub fn get_all_words(&self, languages: &[String]) -> Vec<String> {
        ranking::all_words(&self.sources(languages))
    }

    pub fn get_custom_words_only(&self, word: &str) -> Vec<String> {
        ranking::custom_words_only(word, &self.custom_words, &self.ignore_list)
    }

    pub fn history_increment(&mut self, word: &str) -> Result<()> {
        self.history.increment(word, 1);
        self.history.flush()
    }

    pub fn history_remove(&mut self, word: &str) -> Result<()> {
        self.history.remove(word);
        self.history.flush()
    }

    pub fn add_to_ignore_list(&mut self, word: &str) -> Result<()> {
        self.ignore_list.add(word);
        self.ignore_list.flush()
    }

    /// Re-reads custom words and the ignore list from disk, replacing the
    /// in-memory copies wholesale. Dictionaries are not reloaded.
    pub fn reload_configs(&mut self) -> Result<()> {
        self.custom_words = store::load_custom_words(&self.custom_words_file);
        self.ignore_list = IgnoreList::load(&self.ignore_list_file)?;
        info!(custom_words = self.custom_words.len(), "reloaded configs");
        Ok(())
    }

    /// Expands a custom-word trigger, then runs the post-processor chain.
    pub fn process_suggestion(&self, text: &str) -> String {
        let expanded = self
            .custom_words
            .get(text)
            .cloned()
            .unwrap_or_else(|| text.to_owned());
        processor::apply_chain(&self.processors, expanded)
    }
}
