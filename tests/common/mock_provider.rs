//! Mock speech provider for generator tests

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tippen::error::{TippenError, TippenResult};
use tippen::providers::SpeechProvider;

#[derive(Debug, Default)]
pub struct MockProvider {
    pub requested: Arc<Mutex<Vec<String>>>,
    /// Texts that fail with a 500
    pub failing: Vec<String>,
    pub latency: Duration,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn get_requested(&self) -> Vec<String> {
        let mut texts = self.requested.lock().unwrap().clone();
        texts.sort();
        texts
    }

    pub fn peak_concurrency(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpeechProvider for MockProvider {
    async fn synthesize(&self, text: &str) -> TippenResult<Vec<u8>> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.requested.lock().unwrap().push(text.to_string());

        tokio::time::sleep(self.latency).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.iter().any(|f| f == text) {
            return Err(TippenError::Provider {
                provider: "mock".to_string(),
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(format!("ID3 {}", text).into_bytes())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
