//! TTS (Text-to-Speech) Module
//!
//! Live speech used when no pre-generated clip exists for a text.

use crate::config::Config;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

pub mod system;

/// Trait for TTS engines
#[async_trait]
pub trait TtsEngine: Send + Sync + std::fmt::Debug {
    /// Speak the given text, resolving once the utterance has ended
    async fn speak(&self, text: &str) -> Result<()>;

    /// Interrupt an utterance in progress
    fn cancel(&self) {}

    /// Get the engine name
    fn name(&self) -> &str;
}

/// Engine that says nothing, for `tts_engine = "none"`
#[derive(Debug, Default)]
pub struct SilentEngine;

#[async_trait]
impl TtsEngine for SilentEngine {
    async fn speak(&self, _text: &str) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// Factory to create the configured TTS engine
pub fn create_engine(config: &Config) -> Arc<dyn TtsEngine> {
    info!("🛠️ Creating TTS engine: {}", config.tts_engine);
    let engine: Arc<dyn TtsEngine> = match config.tts_engine.as_str() {
        "system" => Arc::new(system::SystemEngine::new(
            &config.tts_language,
            config.speech_rate,
        )),
        "none" | "off" => Arc::new(SilentEngine),
        _ => {
            warn!(
                "  - Unknown engine '{}', falling back to System",
                config.tts_engine
            );
            Arc::new(system::SystemEngine::new(
                &config.tts_language,
                config.speech_rate,
            ))
        }
    };
    info!("✅ TTS engine '{}' initialized", engine.name());
    engine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_selects_engine() {
        let mut config = Config::default();
        assert_eq!(create_engine(&config).name(), "system");

        config.tts_engine = "none".to_string();
        assert_eq!(create_engine(&config).name(), "none");

        config.tts_engine = "bogus".to_string();
        assert_eq!(create_engine(&config).name(), "system");
    }

    #[tokio::test]
    async fn test_silent_engine_resolves() {
        SilentEngine.speak("Hallo").await.expect("silent speak");
    }
}
