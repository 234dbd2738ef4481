//! OpenAI speech endpoint

use super::{check_response, SpeechProvider};
use crate::error::TippenResult;
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_VOICE: &str = "alloy";
const ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";
const MODEL: &str = "tts-1-hd";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    response_format: &'a str,
}

#[derive(Debug)]
pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    voice: String,
    endpoint: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, voice: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice,
            endpoint: ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    fn request<'a>(&'a self, text: &'a str) -> SpeechRequest<'a> {
        SpeechRequest {
            model: MODEL,
            input: text,
            voice: &self.voice,
            response_format: "mp3",
        }
    }
}

#[async_trait]
impl SpeechProvider for OpenAiProvider {
    async fn synthesize(&self, text: &str) -> TippenResult<Vec<u8>> {
        debug!("OpenAI synthesizing '{}'", text);
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.request(text))
            .timeout(Duration::from_secs(60))
            .send()
            .await?;

        check_response(self.name(), response).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}
