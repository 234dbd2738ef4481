//! Mock Voice for Testing
//!
//! Records everything that was said or played for verification.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the narration asked the voice to do
#[derive(Debug, Clone, PartialEq)]
pub enum Utterance {
    Spoken(String),
    Clip(String),
    Cancelled,
}

/// Mock voice that records calls
#[derive(Debug)]
pub struct MockVoice {
    pub log: Arc<Mutex<Vec<Utterance>>>,
    /// How long each utterance "lasts"
    pub duration: Duration,
    /// Simulate failure on every speak
    pub should_fail: Arc<Mutex<bool>>,
}

impl MockVoice {
    pub fn new() -> Self {
        Self::with_duration(Duration::ZERO)
    }

    pub fn with_duration(duration: Duration) -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            duration,
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn get_log(&self) -> Vec<Utterance> {
        self.log.lock().unwrap().clone()
    }

    /// Texts passed to `speak`, in order
    pub fn get_spoken(&self) -> Vec<String> {
        self.get_log()
            .into_iter()
            .filter_map(|u| match u {
                Utterance::Spoken(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn was_spoken(&self, text: &str) -> bool {
        self.get_spoken().iter().any(|s| s == text)
    }
}

impl Default for MockVoice {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl tippen::audio::Voice for MockVoice {
    async fn speak(&self, text: &str) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            return Err(anyhow::anyhow!("Mock voice failure"));
        }
        self.log.lock().unwrap().push(Utterance::Spoken(text.to_string()));
        tokio::time::sleep(self.duration).await;
        Ok(())
    }

    async fn play_clip(&self, text: &str) -> Result<()> {
        self.log.lock().unwrap().push(Utterance::Clip(text.to_string()));
        tokio::time::sleep(self.duration).await;
        Ok(())
    }

    fn cancel(&self) {
        self.log.lock().unwrap().push(Utterance::Cancelled);
    }
}
