//! Tippen audio generator
//!
//! Pre-renders a pronunciation clip for every word, level name and success
//! message through a remote TTS provider.
//!
//! Run with: cargo run --bin tippen-audio -- --list-missing-unused

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tippen::generator::{settings, FileSettings, Generator, GeneratorSettings, Overrides, Plan};
use tippen::providers::{create_provider, ProviderKind};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Only print missing and unused clips
    #[arg(long, alias = "list-audio-status")]
    list_missing_unused: bool,

    /// Directory with the level files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory the clips are written to
    #[arg(long, default_value = "audio")]
    audio_dir: PathBuf,

    /// TTS provider: elevenlabs or openai
    #[arg(long)]
    provider: Option<ProviderKind>,

    /// Voice id or name for the provider
    #[arg(long)]
    voice: Option<String>,

    /// Requests in flight at once
    #[arg(long)]
    concurrency: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            warn!("⚠️ Could not read .env: {}", e);
        }
    }

    let plan = Plan::build(&args.data_dir, &args.audio_dir)?;

    if args.list_missing_unused {
        print!("{}", plan.status);
        return Ok(());
    }

    let overrides = Overrides {
        provider: args.provider,
        voice: args.voice.clone(),
        concurrency: args.concurrency,
    };
    let file = FileSettings::load(&PathBuf::from(settings::CONFIG_FILE));
    let settings = GeneratorSettings::resolve(&overrides, |key| std::env::var(key).ok(), &file)?;

    let provider = create_provider(settings.provider, settings.api_key, settings.voice);
    let generator = Generator::new(provider, &args.audio_dir)
        .with_concurrency(settings.concurrency)
        .with_job_delay(settings.job_delay);

    let report = generator.run(&plan).await;
    println!("{}", report);
    if report.failed > 0 {
        info!("Re-run to retry the {} failed clips", report.failed);
    }
    Ok(())
}
