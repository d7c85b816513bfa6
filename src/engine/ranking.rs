//! Per-query score accumulation and the three query pipelines.

use std::collections::BTreeMap;
use std::collections::HashMap;

use crate::engine::fuzzy;
use crate::engine::store::{HistoryStore, IgnoreList};

/// Transient word -> score accumulator, discarded after each query. Preserves
/// insertion order so equal scores come out in the order words were recorded.
///
/// Two merge strategies exist on purpose: `add` accumulates (the default
/// everywhere), `set` overwrites (history boosts and the custom-words-only
/// path). Do not unify them.
#[derive(Debug, Default)]
pub struct ScoreBoard {
    entries: Vec<(String, f64)>,
    index: HashMap<String, usize>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Additive merge: recording a word twice accumulates both scores.
    pub fn add(&mut self, word: &str, score: f64) {
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].1 += score,
            None => self.push(word, score),
        }
    }

    /// Overwrite merge: the last recorded score wins.
    pub fn set(&mut self, word: &str, score: f64) {
        match self.index.get(word) {
            Some(&slot) => self.entries[slot].1 = score,
            None => self.push(word, score),
        }
    }

    fn push(&mut self, word: &str, score: f64) {
        self.index.insert(word.to_owned(), self.entries.len());
        self.entries.push((word.to_owned(), score));
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    /// Sorts by score descending (stable, so ties keep insertion order) and
    /// drops ignore-listed words. This is the only place the ignore list is
    /// consulted; it never affects score computation.
    pub fn into_ranked(self, ignore: &IgnoreList) -> Vec<String> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
            .into_iter()
            .filter(|(word, _)| !ignore.contains(word))
            .map(|(word, _)| word)
            .collect()
    }
}

/// Read-only view of everything a query ranks over. Dictionaries are already
/// filtered to the requested languages, in request order.
pub struct RankingSources<'a> {
    pub dictionaries: Vec<&'a [String]>,
    pub custom_words: &'a BTreeMap<String, String>,
    pub history: &'a HistoryStore,
    pub ignore: &'a IgnoreList,
}

/// Fuzzy-ranked query: dictionary and custom-word matches contribute their
/// rank index per source (additive across sources), then history boosts apply.
pub fn ranked(query: &str, sources: &RankingSources) -> Vec<String> {
    let sanitized = fuzzy::sanitize(query);
    let mut board = ScoreBoard::new();

    for words in &sources.dictionaries {
        let matches = fuzzy::matches_worst_to_best(&sanitized, words.iter().map(String::as_str));
        for (rank, word) in matches.into_iter().enumerate() {
            board.add(word, rank as f64);
        }
    }

    let triggers = sources.custom_words.keys().map(String::as_str);
    for (rank, word) in fuzzy::matches_worst_to_best(&sanitized, triggers)
        .into_iter()
        .enumerate()
    {
        board.add(word, rank as f64);
    }

    apply_history_boost(&mut board, query, sources.history);
    board.into_ranked(sources.ignore)
}

/// Unfiltered query: every dictionary word scores 0, every custom trigger 0.5
/// so custom words outrank otherwise-equal dictionary words, then history
/// boosts apply (the empty query is contained in every history entry, so all
/// of history participates).
pub fn all_words(sources: &RankingSources) -> Vec<String> {
    let mut board = ScoreBoard::new();

    for words in &sources.dictionaries {
        for word in *words {
            board.add(word, 0.0);
        }
    }
    for trigger in sources.custom_words.keys() {
        board.add(trigger, 0.5);
    }

    apply_history_boost(&mut board, "", sources.history);
    board.into_ranked(sources.ignore)
}

/// Custom-words-only query. Overwrite semantics throughout: containing the
/// query scores 0.5, starting with it is recorded afterwards at 1.0 and wins.
pub fn custom_words_only(
    query: &str,
    custom_words: &BTreeMap<String, String>,
    ignore: &IgnoreList,
) -> Vec<String> {
    let mut board = ScoreBoard::new();

    if query.is_empty() {
        for trigger in custom_words.keys() {
            board.set(trigger, 0.5);
        }
    } else {
        for trigger in custom_words.keys().filter(|t| t.contains(query)) {
            board.set(trigger, 0.5);
        }
        for trigger in custom_words.keys().filter(|t| t.starts_with(query)) {
            board.set(trigger, 1.0);
        }
    }

    board.into_ranked(ignore)
}

/// History pass shared by the ranked and unfiltered pipelines: an entry
/// already on the board with more than one acceptance has its score replaced
/// by the count; an entry off the board whose text contains the raw query is
/// resurrected with the count as its score.
fn apply_history_boost(board: &mut ScoreBoard, query: &str, history: &HistoryStore) {
    for (word, count) in history.iter() {
        if board.contains(word) {
            if count > 1 {
                board.set(word, count as f64);
            }
        } else if word.contains(query) {
            board.add(word, count as f64);
        }
    }
}
