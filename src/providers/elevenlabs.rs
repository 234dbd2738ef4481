//! ElevenLabs text-to-speech

use super::{check_response, SpeechProvider};
use crate::error::TippenResult;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_VOICE: &str = "NBqeXKdZHweef6y0B67V";
const BASE_URL: &str = "https://api.elevenlabs.io/v1/text-to-speech";
const MODEL: &str = "eleven_multilingual_v2";

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
    lang: &'a str,
}

impl<'a> SpeechRequest<'a> {
    fn german(text: &'a str) -> Self {
        Self {
            text,
            model_id: MODEL,
            voice_settings: VoiceSettings {
                stability: 0.5,
                similarity_boost: 0.75,
            },
            lang: "de",
        }
    }
}

#[derive(Debug)]
pub struct ElevenLabsProvider {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    base_url: String,
}

impl ElevenLabsProvider {
    pub fn new(api_key: String, voice: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/{}", self.base_url, self.voice)
    }
}

#[async_trait]
impl SpeechProvider for ElevenLabsProvider {
    async fn synthesize(&self, text: &str) -> TippenResult<Vec<u8>> {
        debug!("ElevenLabs synthesizing '{}'", text);
        let response = self
            .client
            .post(self.endpoint())
            .header("Accept", "audio/mpeg")
            .header("xi-api-key", &self.api_key)
            .json(&SpeechRequest::german(text))
            .timeout(Duration::from_secs(60))
            .send()
            .await?;

        check_response(self.name(), response).await
    }

    fn name(&self) -> &str {
        "elevenlabs"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = serde_json::to_value(SpeechRequest::german("Bär")).expect("serialize");
        assert_eq!(
            body,
            serde_json::json!({
                "text": "Bär",
                "model_id": "eleven_multilingual_v2",
                "voice_settings": { "stability": 0.5, "similarity_boost": 0.75 },
                "lang": "de"
            })
        );
    }

    #[test]
    fn test_endpoint_includes_voice() {
        let provider = ElevenLabsProvider::new("key".into(), "abc".into())
            .with_base_url("http://localhost:9/v1/text-to-speech/");
        assert_eq!(provider.endpoint(), "http://localhost:9/v1/text-to-speech/abc");
    }
}
