//! Remote TTS providers
//!
//! HTTP speech synthesis services used to pre-render pronunciation clips.

use crate::error::{TippenError, TippenResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

pub mod elevenlabs;
pub mod openai;

/// Trait for remote speech synthesis
#[async_trait]
pub trait SpeechProvider: Send + Sync + std::fmt::Debug {
    /// Synthesize `text` and return the MP3 bytes
    async fn synthesize(&self, text: &str) -> TippenResult<Vec<u8>>;

    /// Get the provider name
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    ElevenLabs,
    OpenAi,
}

impl std::str::FromStr for ProviderKind {
    type Err = TippenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "elevenlabs" | "eleven_labs" | "eleven" => Ok(ProviderKind::ElevenLabs),
            "openai" | "open_ai" => Ok(ProviderKind::OpenAi),
            other => Err(TippenError::Config(format!("Unknown TTS provider '{}'", other))),
        }
    }
}

impl ProviderKind {
    pub fn id(&self) -> &'static str {
        match self {
            ProviderKind::ElevenLabs => "elevenlabs",
            ProviderKind::OpenAi => "openai",
        }
    }

    /// Environment variable holding the API key
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::ElevenLabs => "XI_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_voice(&self) -> &'static str {
        match self {
            ProviderKind::ElevenLabs => elevenlabs::DEFAULT_VOICE,
            ProviderKind::OpenAi => openai::DEFAULT_VOICE,
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Factory to create the selected provider
pub fn create_provider(kind: ProviderKind, api_key: String, voice: String) -> Arc<dyn SpeechProvider> {
    info!("🛠️ Using TTS provider {} (voice: {})", kind, voice);
    match kind {
        ProviderKind::ElevenLabs => Arc::new(elevenlabs::ElevenLabsProvider::new(api_key, voice)),
        ProviderKind::OpenAi => Arc::new(openai::OpenAiProvider::new(api_key, voice)),
    }
}

/// Turn a non-success response into a provider error carrying the body
pub(crate) async fn check_response(
    provider: &str,
    response: reqwest::Response,
) -> TippenResult<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TippenError::Provider {
            provider: provider.to_string(),
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.bytes().await?.to_vec())
}
