//! Generator settings
//!
//! Precedence for every value: command line, then environment, then the
//! `generate-audio.config` JSON file, then built-in defaults.

use crate::error::{TippenError, TippenResult};
use crate::providers::ProviderKind;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

pub const CONFIG_FILE: &str = "generate-audio.config";
pub const DEFAULT_CONCURRENCY: usize = 2;
const JOB_DELAY: Duration = Duration::from_millis(500);

/// Optional settings file next to the data
#[derive(Debug, Default, Deserialize)]
pub struct FileSettings {
    #[serde(rename = "TTS_PROVIDER")]
    pub tts_provider: Option<String>,
    #[serde(rename = "OPENAI_VOICE")]
    pub openai_voice: Option<String>,
    #[serde(rename = "ELEVENLABS_VOICE")]
    pub elevenlabs_voice: Option<String>,
}

impl FileSettings {
    /// Read the settings file; a missing or broken file counts as empty
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(_) => {
                debug!("No generator config at {}", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("⚠️ Ignoring invalid {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn voice_for(&self, kind: ProviderKind) -> Option<&str> {
        match kind {
            ProviderKind::ElevenLabs => self.elevenlabs_voice.as_deref(),
            ProviderKind::OpenAi => self.openai_voice.as_deref(),
        }
    }
}

/// Values given on the command line
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub provider: Option<ProviderKind>,
    pub voice: Option<String>,
    pub concurrency: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub provider: ProviderKind,
    pub voice: String,
    pub api_key: String,
    pub concurrency: usize,
    pub job_delay: Duration,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// `AUDIO_GEN_CONCURRENCY`: anything but a positive integer means the default
pub fn parse_concurrency(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_CONCURRENCY)
}

impl GeneratorSettings {
    /// Resolve settings; `env` looks up environment variables
    pub fn resolve<F>(overrides: &Overrides, env: F, file: &FileSettings) -> TippenResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match overrides.provider {
            Some(kind) => kind,
            None => match non_blank(env("TTS_PROVIDER"))
                .or_else(|| non_blank(file.tts_provider.clone()))
            {
                Some(name) => name.parse()?,
                None => ProviderKind::default(),
            },
        };

        let voice_var = match provider {
            ProviderKind::ElevenLabs => "ELEVENLABS_VOICE",
            ProviderKind::OpenAi => "OPENAI_VOICE",
        };
        let voice = non_blank(overrides.voice.clone())
            .or_else(|| non_blank(env(voice_var)))
            .or_else(|| non_blank(file.voice_for(provider).map(str::to_string)))
            .unwrap_or_else(|| provider.default_voice().to_string());

        let api_key = non_blank(env(provider.api_key_var()))
            .ok_or(TippenError::MissingApiKey(provider.api_key_var()))?;

        let concurrency = overrides
            .concurrency
            .filter(|n| *n > 0)
            .unwrap_or_else(|| parse_concurrency(env("AUDIO_GEN_CONCURRENCY").as_deref()));

        Ok(Self {
            provider,
            voice,
            api_key,
            concurrency,
            job_delay: JOB_DELAY,
        })
    }
}
