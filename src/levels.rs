//! Level data
//!
//! Levels are JSON files listed in order by the `levels.json` manifest.
//! A level file is either an object with metadata and `items`, or (legacy)
//! a bare array of word items.

use crate::error::{TippenError, TippenResult};
use crate::keyboard::fold_case;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

pub const MANIFEST_FILE: &str = "levels.json";
pub const SUCCESS_MESSAGES_FILE: &str = "success-messages.json";

/// A word or phrase to type, with decorative icons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordItem {
    pub text: String,
    #[serde(default)]
    pub icons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    #[serde(default = "default_level_name")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub items: Vec<WordItem>,
    /// Keys the level accepts; `None` means the whole keyboard
    #[serde(default)]
    pub enabled_keys: Option<Vec<String>>,
    #[serde(default)]
    pub case_sensitive: bool,
}

fn default_level_name() -> String {
    "Level".to_string()
}

impl Level {
    pub fn from_items(items: Vec<WordItem>) -> Self {
        Self {
            name: default_level_name(),
            description: None,
            items,
            enabled_keys: None,
            case_sensitive: false,
        }
    }

    /// Whether `key` may be pressed in this level. Comparison is case-folded.
    pub fn allows_key(&self, key: char) -> bool {
        match &self.enabled_keys {
            None => true,
            Some(keys) => {
                let folded = fold_case(key);
                keys.iter().any(|k| {
                    let mut chars = k.chars();
                    matches!((chars.next(), chars.next()), (Some(c), None) if fold_case(c) == folded)
                })
            }
        }
    }

    /// Items with a character the level's `enabledKeys` would drop
    pub fn untypeable_items(&self) -> Vec<&str> {
        self.items
            .iter()
            .map(|item| item.text.as_str())
            .filter(|text| text.chars().any(|c| !self.allows_key(c)))
            .collect()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.trim().is_empty())
    }
}

/// On-disk shapes of a level file
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelFile {
    Legacy(Vec<WordItem>),
    Object(Level),
}

/// Message shown (and played) after a level-up
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub text: String,
    #[serde(default = "default_success_icon")]
    pub icon: String,
}

fn default_success_icon() -> String {
    "🎉".to_string()
}

impl SuccessMessage {
    /// Used when no success messages are loaded
    pub fn fallback() -> Self {
        Self {
            text: "Super gemacht!".to_string(),
            icon: default_success_icon(),
        }
    }
}

/// Everything the game loads from the data directory
#[derive(Debug, Clone, Default)]
pub struct GameData {
    pub levels: Vec<Level>,
    pub success_messages: Vec<SuccessMessage>,
}

impl GameData {
    pub fn load(data_dir: &Path) -> TippenResult<Self> {
        let success_messages = load_success_messages(data_dir);
        let levels = load_levels(data_dir)?;
        Ok(Self {
            levels,
            success_messages,
        })
    }
}

/// Parse a single level file in either format
pub fn parse_level(content: &str) -> TippenResult<Level> {
    let level = match serde_json::from_str::<LevelFile>(content)? {
        LevelFile::Legacy(items) => Level::from_items(items),
        LevelFile::Object(level) => level,
    };
    Ok(level)
}

pub fn load_level_file(path: &Path) -> TippenResult<Level> {
    let content = std::fs::read_to_string(path)?;
    parse_level(&content)
}

/// Load all levels named by the manifest, in manifest order.
///
/// Unreadable level files are skipped; having no level at all is an error.
pub fn load_levels(data_dir: &Path) -> TippenResult<Vec<Level>> {
    let manifest_path = data_dir.join(MANIFEST_FILE);
    let manifest = std::fs::read_to_string(&manifest_path).map_err(|e| {
        TippenError::LevelData(format!(
            "Could not load level manifest {}: {}",
            manifest_path.display(),
            e
        ))
    })?;
    let level_files: Vec<String> = serde_json::from_str(&manifest)?;

    let mut levels = Vec::with_capacity(level_files.len());
    for file in &level_files {
        match load_level_file(&data_dir.join(file)) {
            Ok(level) => {
                debug!("Loaded level '{}' ({} items) from {}", level.name, level.items.len(), file);
                for text in level.untypeable_items() {
                    warn!("⚠️ '{}' in {} needs keys outside enabledKeys", text, file);
                }
                levels.push(level);
            }
            Err(e) => warn!("⚠️ Could not load level file {}: {}", file, e),
        }
    }

    if levels.is_empty() {
        return Err(TippenError::LevelData("No level files found".to_string()));
    }

    info!("📚 Loaded {} level files", levels.len());
    Ok(levels)
}

/// Load success messages; a missing or broken file yields none
pub fn load_success_messages(data_dir: &Path) -> Vec<SuccessMessage> {
    let path = data_dir.join(SUCCESS_MESSAGES_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) => {
            warn!("⚠️ Could not load {}: {}", SUCCESS_MESSAGES_FILE, e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Vec<SuccessMessage>>(&content) {
        Ok(messages) => {
            info!("Loaded {} success messages", messages.len());
            messages
        }
        Err(e) => {
            warn!("⚠️ Invalid {}: {}", SUCCESS_MESSAGES_FILE, e);
            Vec::new()
        }
    }
}
