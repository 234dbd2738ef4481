//! Audio pre-generation
//!
//! Renders a pronunciation clip for every text the game can speak, using a
//! remote speech provider and a small bounded worker pool.

pub mod collect;
pub mod settings;
pub mod status;

pub use collect::{collect_words, WordList};
pub use settings::{FileSettings, GeneratorSettings, Overrides};
pub use status::{existing_clips, remove_unused, AudioStatus};

use crate::error::TippenResult;
use crate::providers::SpeechProvider;
use futures::stream::{self, StreamExt};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

/// Expected clips and how the audio directory compares to them
#[derive(Debug, Clone)]
pub struct Plan {
    pub expected: BTreeMap<String, String>,
    pub status: AudioStatus,
}

impl Plan {
    pub fn build(data_dir: &Path, audio_dir: &Path) -> TippenResult<Self> {
        let words = collect_words(data_dir)?;
        let expected = words.expected_files();
        let existing = existing_clips(audio_dir)?;
        let status = AudioStatus::compare(&expected, &existing);
        info!(
            "📋 {} texts, {} missing clips, {} unused clips",
            expected.len(),
            status.missing.len(),
            status.unused.len()
        );
        Ok(Self { expected, status })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Generated,
    Skipped,
    Failed(String),
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct GenerationReport {
    pub generated: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl GenerationReport {
    fn record(&mut self, outcome: &JobOutcome) {
        match outcome {
            JobOutcome::Generated => self.generated += 1,
            JobOutcome::Skipped => self.skipped += 1,
            JobOutcome::Failed(_) => self.failed += 1,
        }
    }
}

impl fmt::Display for GenerationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated: {}, skipped: {}, failed: {}",
            self.generated, self.skipped, self.failed
        )
    }
}

pub struct Generator {
    provider: Arc<dyn SpeechProvider>,
    audio_dir: PathBuf,
    concurrency: usize,
    job_delay: Duration,
}

impl Generator {
    pub fn new(provider: Arc<dyn SpeechProvider>, audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            audio_dir: audio_dir.into(),
            concurrency: settings::DEFAULT_CONCURRENCY,
            job_delay: Duration::from_millis(500),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_job_delay(mut self, delay: Duration) -> Self {
        self.job_delay = delay;
        self
    }

    /// Render one clip unless it already exists
    pub async fn generate_one(&self, file: &str, text: &str) -> JobOutcome {
        let path = self.audio_dir.join(file);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            debug!("Skipping {} (exists)", file);
            return JobOutcome::Skipped;
        }

        match self.write_clip(&path, text).await {
            Ok(size) => {
                info!("🔊 Generated {} ({} bytes)", file, size);
                JobOutcome::Generated
            }
            Err(e) => {
                error!("❌ Failed to generate '{}': {}", text, e);
                JobOutcome::Failed(e.to_string())
            }
        }
    }

    async fn write_clip(&self, path: &Path, text: &str) -> TippenResult<usize> {
        let bytes = self.provider.synthesize(text).await?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;
        Ok(bytes.len())
    }

    /// Render every `(file, text)` job with at most `concurrency` in flight
    pub async fn generate_all(&self, jobs: Vec<(String, String)>) -> GenerationReport {
        info!(
            "🚀 Generating {} clips via {} ({} at a time)",
            jobs.len(),
            self.provider.name(),
            self.concurrency
        );

        let outcomes: Vec<JobOutcome> = stream::iter(jobs)
            .map(|(file, text)| async move {
                let outcome = self.generate_one(&file, &text).await;
                tokio::time::sleep(self.job_delay).await;
                outcome
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let mut report = GenerationReport::default();
        for outcome in &outcomes {
            report.record(outcome);
        }
        report
    }

    /// Remove unused clips, then generate the missing ones
    pub async fn run(&self, plan: &Plan) -> GenerationReport {
        let removed = remove_unused(&self.audio_dir, &plan.status.unused);
        if removed > 0 {
            info!("🧹 Removed {} unused clips", removed);
        }
        let report = self.generate_all(plan.status.missing.clone()).await;
        info!("✅ {}", report);
        report
    }
}
