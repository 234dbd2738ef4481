//! Tippen - German touch-typing tutor for the terminal

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::fs::File;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tippen::audio::{SoundEngine, Speaker};
use tippen::avatar::AvatarLibrary;
use tippen::config::{self, Config};
use tippen::game::Game;
use tippen::levels::GameData;
use tippen::tts;
use tippen::ui::{self, App};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory with levels.json and the level files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Directory with pre-generated pronunciation clips
    #[arg(long)]
    audio_dir: Option<PathBuf>,

    /// Avatar name under the avatars directory
    #[arg(long)]
    avatar: Option<String>,

    /// Level to start at (1-based)
    #[arg(short, long)]
    level: Option<usize>,

    /// Turn off sound effects
    #[arg(long)]
    mute: bool,

    /// Live TTS engine: system or none
    #[arg(long)]
    tts: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.display().to_string();
        }
        if let Some(dir) = &self.audio_dir {
            config.audio_dir = dir.display().to_string();
        }
        if let Some(avatar) = &self.avatar {
            config.avatar = avatar.clone();
        }
        if let Some(level) = self.level {
            config.start_level = level.saturating_sub(1);
        }
        if self.mute {
            config.sound_effects = false;
        }
        if let Some(engine) = &self.tts {
            config.tts_engine = engine.clone();
        }
    }
}

/// Log to a file; the terminal belongs to the game
fn init_logging(verbose: bool, config: &Config) -> Result<PathBuf> {
    let dir = config::config_dir();
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("tippen.log");
    let file = File::create(&path).with_context(|| format!("Cannot create {}", path.display()))?;

    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_lowercase()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(path)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    args.apply(&mut config);
    let log_path = init_logging(args.verbose, &config)?;

    info!("🐯 Tippen v{} starting...", env!("CARGO_PKG_VERSION"));

    let data = GameData::load(&config.data_dir())
        .with_context(|| format!("Cannot load levels from {}", config.data_dir))?;
    let mut game = Game::new(data, config.timing)?;
    game.set_level(config.start_level);

    let sound = match SoundEngine::new() {
        Ok(engine) => Some(engine),
        Err(e) => {
            warn!("⚠️ Audio unavailable: {}", e);
            None
        }
    };
    let tts = tts::create_engine(&config);
    let speaker = Arc::new(Speaker::new(sound.clone(), tts, &config.audio_dir()));
    let cues = if config.sound_effects { sound } else { None };

    let mut avatars = AvatarLibrary::new(&config.avatars_dir());
    let avatar = avatars.load_or_builtin(&config.avatar);

    let (app, narration) = App::new(game, speaker, cues, avatar, &config);

    let mut stdout = std::io::stdout();
    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide)?;

    let result = ui::run(app, narration, &mut stdout).await;

    execute!(stdout, Clear(ClearType::All), Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    if let Err(e) = &result {
        eprintln!("Tippen stopped: {} (log: {})", e, log_path.display());
    }
    info!("👋 Bye");
    result
}
