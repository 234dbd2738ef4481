use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Data
    pub data_dir: String,
    pub audio_dir: String,
    pub avatars_dir: String,
    pub avatar: String,

    // Speech
    pub tts_engine: String,
    pub tts_language: String,
    pub speech_rate: f32,
    pub sound_effects: bool,

    // Game
    pub start_level: usize,
    #[serde(default)]
    pub timing: GameTiming,

    // Meta
    pub log_level: String,
}

/// Game pacing constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameTiming {
    /// Progress gained per finished word (percent)
    pub progress_increment: u8,
    /// Pause after the level-up fanfare before the success message
    pub fanfare_ms: u64,
    pub word_complete_delay_ms: u64,
    pub intro_pause_ms: u64,
    pub error_flash_ms: u64,
}

impl Default for GameTiming {
    fn default() -> Self {
        Self {
            progress_increment: 10,
            fanfare_ms: 1000,
            word_complete_delay_ms: 1000,
            intro_pause_ms: 500,
            error_flash_ms: 300,
        }
    }
}

impl GameTiming {
    pub fn fanfare(&self) -> Duration {
        Duration::from_millis(self.fanfare_ms)
    }

    pub fn word_complete_delay(&self) -> Duration {
        Duration::from_millis(self.word_complete_delay_ms)
    }

    pub fn intro_pause(&self) -> Duration {
        Duration::from_millis(self.intro_pause_ms)
    }

    pub fn error_flash(&self) -> Duration {
        Duration::from_millis(self.error_flash_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            audio_dir: "audio".to_string(),
            avatars_dir: "avatars".to_string(),
            avatar: "tiger".to_string(),
            tts_engine: "system".to_string(),
            tts_language: "de".to_string(),
            speech_rate: 0.8,
            sound_effects: true,
            start_level: 0,
            timing: GameTiming::default(),
            log_level: "INFO".to_string(),
        }
    }
}

impl Config {
    /// Load config from the default location, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    /// Load config from `path`, falling back to defaults when it is missing or broken
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                // Graceful degradation: log warning and use defaults
                tracing::warn!("⚠️ Config file corrupted or invalid, using defaults: {}", e);
                // Backup corrupt file for debugging
                let backup_path = path.with_extension("json.corrupt");
                let _ = std::fs::rename(path, &backup_path);
                Ok(Self::default())
            }
        }
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn audio_dir(&self) -> PathBuf {
        PathBuf::from(&self.audio_dir)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn avatars_dir(&self) -> PathBuf {
        PathBuf::from(&self.avatars_dir)
    }
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

/// Directory holding the config file and the game log
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tippen")
}
