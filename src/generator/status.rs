//! Compare expected clips against the audio directory

use crate::error::TippenResult;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Clips present in `audio_dir` (top level only)
pub fn existing_clips(audio_dir: &Path) -> TippenResult<BTreeSet<String>> {
    let mut clips = BTreeSet::new();
    if !audio_dir.exists() {
        return Ok(clips);
    }

    for entry in WalkDir::new(audio_dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".mp3") {
            clips.insert(name.to_string());
        }
    }
    Ok(clips)
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct AudioStatus {
    /// Expected clip files with the text they pronounce
    pub missing: Vec<(String, String)>,
    pub unused: Vec<String>,
}

impl AudioStatus {
    pub fn compare(expected: &BTreeMap<String, String>, existing: &BTreeSet<String>) -> Self {
        let missing = expected
            .iter()
            .filter(|(file, _)| !existing.contains(*file))
            .map(|(file, word)| (file.clone(), word.clone()))
            .collect();
        let unused = existing
            .iter()
            .filter(|file| !expected.contains_key(*file))
            .cloned()
            .collect();
        Self { missing, unused }
    }

    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.unused.is_empty()
    }
}

impl fmt::Display for AudioStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Audio File Status ===")?;
        writeln!(f, "Missing audio files ({}):", self.missing.len())?;
        for (file, word) in &self.missing {
            writeln!(f, "  {}  ({})", file, word)?;
        }
        writeln!(f, "Unused audio files ({}):", self.unused.len())?;
        for file in &self.unused {
            writeln!(f, "  {}", file)?;
        }
        Ok(())
    }
}

/// Delete unused clips; failures are logged and skipped
pub fn remove_unused(audio_dir: &Path, unused: &[String]) -> usize {
    let mut removed = 0;
    for file in unused {
        let path = audio_dir.join(file);
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("🗑️ Removed unused {}", file);
                removed += 1;
            }
            Err(e) => warn!("⚠️ Could not remove {}: {}", path.display(), e),
        }
    }
    removed
}
