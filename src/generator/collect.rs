//! Collect every spoken text from the data directory

use crate::error::TippenResult;
use crate::levels::SUCCESS_MESSAGES_FILE;
use crate::utils::audio_file_name;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Unique texts that need a pronunciation clip
#[derive(Debug, Default, Clone)]
pub struct WordList {
    pub words: BTreeSet<String>,
}

impl WordList {
    fn add(&mut self, text: Option<&str>) {
        if let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) {
            self.words.insert(text.to_string());
        }
    }

    fn add_items(&mut self, items: &[Value]) {
        for item in items {
            self.add(item.get("text").and_then(Value::as_str));
        }
    }

    /// Add the texts a single data file contributes
    pub fn add_document(&mut self, file_name: &str, doc: &Value) {
        match doc {
            Value::Array(items) => {
                if file_name != SUCCESS_MESSAGES_FILE {
                    debug!("Legacy level file {}", file_name);
                }
                self.add_items(items);
            }
            Value::Object(map) => {
                let Some(items) = map.get("items").and_then(Value::as_array) else {
                    debug!("Skipping {} (not a level)", file_name);
                    return;
                };
                self.add(map.get("name").and_then(Value::as_str));
                self.add(map.get("description").and_then(Value::as_str));
                self.add_items(items);
            }
            _ => debug!("Skipping {} (unexpected JSON)", file_name),
        }
    }

    /// Map of clip file name to the text it pronounces
    ///
    /// Texts that share a file name keep the first one in sort order.
    pub fn expected_files(&self) -> BTreeMap<String, String> {
        let mut files = BTreeMap::new();
        for word in &self.words {
            let name = audio_file_name(word);
            if name == ".mp3" {
                warn!("⚠️ '{}' has no usable characters for a file name", word);
                continue;
            }
            files.entry(name).or_insert_with(|| word.clone());
        }
        files
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Read every `*.json` file directly inside `data_dir`
pub fn collect_words(data_dir: &Path) -> TippenResult<WordList> {
    let mut list = WordList::default();

    for entry in WalkDir::new(data_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy().to_string();
        let content = std::fs::read_to_string(path)?;
        let doc: Value = serde_json::from_str(&content)?;
        list.add_document(&file_name, &doc);
    }

    debug!("Collected {} unique texts from {}", list.len(), data_dir.display());
    Ok(list)
}
