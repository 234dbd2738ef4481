//! Speak-then-wait voice
//!
//! Plays the pre-generated clip for a text when one exists and falls back to
//! live TTS otherwise. Every call resolves once speech has ended, was
//! interrupted, or failed; failures are logged rather than surfaced to the
//! game.

use super::SoundEngine;
use crate::tts::TtsEngine;
use crate::utils::audio_file_name;
use anyhow::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Something that can say text out loud and wait for it
#[async_trait]
pub trait Voice: Send + Sync {
    /// Say `text`, preferring its clip and falling back to TTS
    async fn speak(&self, text: &str) -> Result<()>;

    /// Play the clip for `text` if it exists; never uses TTS
    async fn play_clip(&self, text: &str) -> Result<()>;

    /// Interrupt whatever is being said
    fn cancel(&self);
}

#[derive(Debug)]
pub struct Speaker {
    sound: Option<SoundEngine>,
    tts: Arc<dyn TtsEngine>,
    audio_dir: PathBuf,
}

impl Speaker {
    pub fn new(sound: Option<SoundEngine>, tts: Arc<dyn TtsEngine>, audio_dir: &Path) -> Self {
        Self {
            sound,
            tts,
            audio_dir: audio_dir.to_path_buf(),
        }
    }

    /// Where the clip for `text` lives
    pub fn clip_path(&self, text: &str) -> PathBuf {
        self.audio_dir.join(audio_file_name(text))
    }

    async fn try_clip(&self, text: &str) -> bool {
        let Some(sound) = &self.sound else {
            return false;
        };
        let path = self.clip_path(text);
        if !path.exists() {
            debug!("No clip for '{}' at {:?}", text, path);
            return false;
        }
        match sound.play_and_wait(&path).await {
            Ok(()) => true,
            Err(e) => {
                debug!("Clip playback failed for '{}': {}", text, e);
                false
            }
        }
    }
}

#[async_trait]
impl Voice for Speaker {
    async fn speak(&self, text: &str) -> Result<()> {
        self.cancel();

        if self.try_clip(text).await {
            return Ok(());
        }

        if let Err(e) = self.tts.speak(text).await {
            warn!("⚠️ TTS '{}' failed for '{}': {}", self.tts.name(), text, e);
        }
        Ok(())
    }

    async fn play_clip(&self, text: &str) -> Result<()> {
        self.cancel();
        self.try_clip(text).await;
        Ok(())
    }

    fn cancel(&self) {
        if let Some(sound) = &self.sound {
            let _ = sound.stop();
        }
        self.tts.cancel();
    }
}
