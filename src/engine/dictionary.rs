use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

/// Loads every `<tag>.txt` file in the dictionaries directory into a word
/// list keyed by language tag. Word order follows file order and is visible
/// to callers on score ties. A missing or unreadable directory yields an
/// empty set; dictionaries never reload for the lifetime of the service.
pub fn load_dictionaries(dir: &Path) -> BTreeMap<String, Vec<String>> {
    let mut dictionaries = BTreeMap::new();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(
                dir = %dir.display(),
                "failed to read dictionaries directory, no dictionaries loaded: {error}"
            );
            return dictionaries;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }
        let Some(tag) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        match fs::read_to_string(&path) {
            Ok(raw) => {
                let words: Vec<String> = raw
                    .lines()
                    .map(|line| line.trim_end().to_owned())
                    .filter(|line| !line.is_empty())
                    .collect();
                info!(language = tag, words = words.len(), "loaded dictionary");
                dictionaries.insert(tag.to_owned(), words);
            }
            Err(error) => {
                warn!(path = %path.display(), "failed to read dictionary file: {error}");
            }
        }
    }

    dictionaries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_txt_files_preserving_word_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("English.txt"), "zebra\napple\n\nmango \n").unwrap();
        fs::write(dir.path().join("notes.md"), "not a dictionary").unwrap();

        let dictionaries = load_dictionaries(dir.path());
        assert_eq!(dictionaries.len(), 1);
        assert_eq!(
            dictionaries["English"],
            vec!["zebra".to_owned(), "apple".to_owned(), "mango".to_owned()]
        );
    }

    #[test]
    fn missing_directory_yields_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let dictionaries = load_dictionaries(&dir.path().join("absent"));
        assert!(dictionaries.is_empty());
    }
}
