#![allow(dead_code)]

pub mod mock_provider;
pub mod mock_voice;

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A throwaway data + audio directory pair
pub struct TestContext {
    pub temp_dir: TempDir,
    pub data_dir: PathBuf,
    pub audio_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("data");
        let audio_dir = temp_dir.path().join("audio");

        fs::create_dir_all(&data_dir).expect("Failed to create data dir");
        fs::create_dir_all(&audio_dir).expect("Failed to create audio dir");

        Self {
            temp_dir,
            data_dir,
            audio_dir,
        }
    }

    /// Two small levels and one success message
    pub fn with_levels() -> Self {
        let ctx = Self::new();
        ctx.write_data("levels.json", r#"["eins.json", "zwei.json"]"#);
        ctx.write_data(
            "eins.json",
            r#"{
                "name": "Grundreihe",
                "description": "Finger auf die Grundreihe",
                "enabledKeys": ["A", "S", "D", "F", "J", "K", "L"],
                "items": [{ "text": "da", "icons": ["👉"] }, { "text": "als" }]
            }"#,
        );
        ctx.write_data("zwei.json", r#"[{ "text": "Bär" }, { "text": "Fuß" }]"#);
        ctx.write_data(
            "success-messages.json",
            r#"[{ "text": "Super gemacht!", "icon": "🎉" }]"#,
        );
        ctx
    }

    pub fn write_data(&self, name: &str, content: &str) {
        fs::write(self.data_dir.join(name), content).expect("Failed to write data file");
    }

    pub fn write_clip(&self, name: &str) {
        fs::write(self.audio_dir.join(name), b"ID3").expect("Failed to write clip");
    }

    pub fn clip_exists(&self, name: &str) -> bool {
        self.audio_dir.join(name).exists()
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}
