//! Talking avatar
//!
//! A sprite sheet plus a small JSON description (frame grid, borders, speed)
//! drives the avatar that "talks" while a level is introduced. Sheets are
//! plain text so the terminal can draw them: each frame is a rectangle of
//! character cells cut out of `talk-animation.txt`.

use crate::error::{TippenError, TippenResult};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const CONFIG_FILE: &str = "talk-animation.json";
const SHEET_FILE: &str = "talk-animation.txt";

const MIN_FRAME_MS: u64 = 16;
const DEFAULT_FRAME_MS: u64 = 100;
const DEFAULT_FRAME_WIDTH: usize = 14;
const DEFAULT_FRAME_HEIGHT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AvatarMode {
    Talk,
    Idle,
    #[default]
    Hidden,
}

/// `talk-animation.json` as written on disk; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawConfig {
    border_top: Option<f64>,
    border_right: Option<f64>,
    border_bottom: Option<f64>,
    border_left: Option<f64>,
    horizontal_frames: Option<f64>,
    vertical_frames: Option<f64>,
    animation_speed: Option<f64>,
    #[serde(rename = "loop")]
    looping: Option<bool>,
    image_info: Option<RawImageInfo>,
    total_frames: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawImageInfo {
    frame_dimensions: Option<RawSize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSize {
    width: Option<f64>,
    height: Option<f64>,
}

/// Normalized animation settings
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarConfig {
    pub border_top: usize,
    pub border_right: usize,
    pub border_bottom: usize,
    pub border_left: usize,
    pub horizontal_frames: usize,
    pub vertical_frames: usize,
    pub frame_duration: Duration,
    pub looping: bool,
    pub frame_width: usize,
    pub frame_height: usize,
    pub total_frames: usize,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default())
    }
}

fn cells(value: Option<f64>) -> Option<usize> {
    value.filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as usize)
}

impl AvatarConfig {
    pub fn parse(json: &str) -> TippenResult<Self> {
        let raw: RawConfig = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    fn from_raw(raw: RawConfig) -> Self {
        let horizontal_frames = cells(raw.horizontal_frames).unwrap_or(1).max(1);
        let vertical_frames = cells(raw.vertical_frames).unwrap_or(1).max(1);
        let speed_ms = cells(raw.animation_speed)
            .map(|v| v as u64)
            .filter(|v| *v > 0)
            .unwrap_or(DEFAULT_FRAME_MS)
            .max(MIN_FRAME_MS);
        let size = raw.image_info.and_then(|i| i.frame_dimensions).unwrap_or_default();
        let total_frames = cells(raw.total_frames)
            .filter(|t| *t > 0)
            .unwrap_or(horizontal_frames * vertical_frames);

        Self {
            border_top: cells(raw.border_top).unwrap_or(0),
            border_right: cells(raw.border_right).unwrap_or(0),
            border_bottom: cells(raw.border_bottom).unwrap_or(0),
            border_left: cells(raw.border_left).unwrap_or(0),
            horizontal_frames,
            vertical_frames,
            frame_duration: Duration::from_millis(speed_ms),
            looping: raw.looping.unwrap_or(true),
            frame_width: cells(size.width).filter(|w| *w > 0).unwrap_or(DEFAULT_FRAME_WIDTH),
            frame_height: cells(size.height).filter(|h| *h > 0).unwrap_or(DEFAULT_FRAME_HEIGHT),
            total_frames,
        }
    }

    /// Top-left cell of `frame` within the sheet
    pub fn frame_offset(&self, frame: usize) -> (usize, usize) {
        let col = frame % self.horizontal_frames;
        let row = frame / self.horizontal_frames;
        (
            self.border_left + col * self.frame_width,
            self.border_top + row * self.frame_height,
        )
    }
}

/// Text sprite sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteSheet {
    lines: Vec<Vec<char>>,
}

/// Mouth shapes of the built-in tiger, one per frame
const TIGER_MOUTHS: [&str; 4] = ["---", "-o-", "(O)", "-o-"];

impl SpriteSheet {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(|l| l.chars().collect()).collect(),
        }
    }

    /// A 2x2 tiger sheet matching `AvatarConfig` defaults
    pub fn builtin() -> Self {
        let frame = |mouth: &str| -> Vec<String> {
            vec![
                "  /\\_____/\\  ".to_string(),
                " (  o   o  ) ".to_string(),
                " (   =^=   ) ".to_string(),
                format!(" (   {}   ) ", mouth),
                "  \\_______/  ".to_string(),
            ]
        };

        let mut lines = Vec::new();
        for pair in TIGER_MOUTHS.chunks(2) {
            let left = frame(pair[0]);
            let right = frame(pair[1]);
            for (l, r) in left.iter().zip(&right) {
                lines.push(format!("{:<width$}{:<width$}", l, r, width = DEFAULT_FRAME_WIDTH));
            }
        }
        Self::parse(&lines.join("\n"))
    }

    /// Cut a `width` x `height` block at `(x, y)`, padding with spaces
    pub fn crop(&self, x: usize, y: usize, width: usize, height: usize) -> Vec<String> {
        (y..y + height)
            .map(|row| {
                let line = self.lines.get(row);
                (x..x + width)
                    .map(|col| line.and_then(|l| l.get(col)).copied().unwrap_or(' '))
                    .collect()
            })
            .collect()
    }
}

/// Config plus sheet for one named avatar
#[derive(Debug, Clone)]
pub struct Avatar {
    pub name: String,
    pub config: AvatarConfig,
    pub sheet: SpriteSheet,
}

impl Avatar {
    pub fn builtin(name: &str) -> Self {
        let config = AvatarConfig {
            horizontal_frames: 2,
            vertical_frames: 2,
            total_frames: TIGER_MOUTHS.len(),
            ..AvatarConfig::default()
        };
        Self {
            name: name.to_string(),
            config,
            sheet: SpriteSheet::builtin(),
        }
    }

    /// Text rows of `frame`
    pub fn render_frame(&self, frame: usize) -> Vec<String> {
        let (x, y) = self.config.frame_offset(frame);
        self.sheet
            .crop(x, y, self.config.frame_width, self.config.frame_height)
    }
}

/// Loads avatars from `<dir>/<name>/` and caches them by name
#[derive(Debug)]
pub struct AvatarLibrary {
    dir: PathBuf,
    cache: HashMap<String, Arc<Avatar>>,
}

impl AvatarLibrary {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            cache: HashMap::new(),
        }
    }

    pub fn load(&mut self, name: &str) -> TippenResult<Arc<Avatar>> {
        if let Some(avatar) = self.cache.get(name) {
            return Ok(avatar.clone());
        }

        let base = self.dir.join(name);
        let config_path = base.join(CONFIG_FILE);
        let json = std::fs::read_to_string(&config_path).map_err(|e| {
            TippenError::Avatar(format!(
                "Failed to load avatar config {}: {}",
                config_path.display(),
                e
            ))
        })?;
        let config = AvatarConfig::parse(&json)?;
        let sheet = SpriteSheet::parse(&std::fs::read_to_string(base.join(SHEET_FILE))?);
        debug!("Loaded avatar '{}' ({} frames)", name, config.total_frames);

        let avatar = Arc::new(Avatar {
            name: name.to_string(),
            config,
            sheet,
        });
        self.cache.insert(name.to_string(), avatar.clone());
        Ok(avatar)
    }

    /// Like `load`, but falls back to the built-in tiger
    pub fn load_or_builtin(&mut self, name: &str) -> Arc<Avatar> {
        match self.load(name) {
            Ok(avatar) => avatar,
            Err(e) => {
                warn!("⚠️ {}; using built-in avatar", e);
                let avatar = Arc::new(Avatar::builtin(name));
                self.cache.insert(name.to_string(), avatar.clone());
                avatar
            }
        }
    }
}

/// Frame clock for the talking animation
#[derive(Debug, Clone)]
pub struct Animator {
    config: AvatarConfig,
    mode: AvatarMode,
    frame: usize,
    accum: Duration,
    running: bool,
}

impl Animator {
    pub fn new(config: AvatarConfig) -> Self {
        Self {
            config,
            mode: AvatarMode::Hidden,
            frame: 0,
            accum: Duration::ZERO,
            running: false,
        }
    }

    pub fn mode(&self) -> AvatarMode {
        self.mode
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    pub fn is_animating(&self) -> bool {
        self.running
    }

    pub fn set_mode(&mut self, mode: AvatarMode) {
        match mode {
            AvatarMode::Talk => self.talk(),
            AvatarMode::Idle => self.idle(),
            AvatarMode::Hidden => self.hide(),
        }
    }

    /// Start talking from frame 0; a running animation is left alone
    pub fn talk(&mut self) {
        self.mode = AvatarMode::Talk;
        if self.running {
            return;
        }
        self.frame = 0;
        self.accum = Duration::ZERO;
        self.running = true;
    }

    /// Stop and show the first frame
    pub fn idle(&mut self) {
        self.mode = AvatarMode::Idle;
        self.stop();
    }

    pub fn hide(&mut self) {
        self.mode = AvatarMode::Hidden;
        self.stop();
    }

    fn stop(&mut self) {
        self.running = false;
        self.frame = 0;
        self.accum = Duration::ZERO;
    }

    /// Advance by `delta`, one frame per frame duration
    pub fn tick(&mut self, delta: Duration) {
        if !self.running {
            return;
        }
        let total = self.config.total_frames.max(1);
        self.accum += delta;
        while self.accum >= self.config.frame_duration {
            self.accum -= self.config.frame_duration;
            self.frame = (self.frame + 1) % total;
            if !self.config.looping && self.frame == total - 1 {
                self.running = false;
                self.accum = Duration::ZERO;
                return;
            }
        }
    }
}
