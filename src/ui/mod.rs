//! Terminal front end
//!
//! Owns the game, turns its `GameEvent`s into sound, speech, narration and
//! timers, and redraws the screen from a single `tokio::select!` loop.

pub mod screens;

use crate::audio::{Cue, SoundEngine, Voice};
use crate::avatar::{Animator, Avatar, AvatarMode};
use crate::config::Config;
use crate::game::{Game, GameEvent};
use crate::levels::SuccessMessage;
use crate::narration::{NarrationEvent, Narrator, Step};
use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use rand::Rng;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Redraw and animation interval
const FRAME: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

/// Transient things on screen besides the game state
#[derive(Debug, Default, Clone)]
pub struct View {
    /// Narration line (level name or description)
    pub caption: Option<String>,
    pub success: Option<SuccessMessage>,
    pub error_until: Option<Instant>,
    /// Highlighted row of the open level picker
    pub picker: Option<usize>,
}

impl View {
    pub fn error_flashing(&self, now: Instant) -> bool {
        self.error_until.is_some_and(|until| now < until)
    }
}

pub struct App<R: Rng> {
    game: Game<R>,
    voice: Arc<dyn Voice>,
    sound: Option<SoundEngine>,
    narrator: Narrator,
    avatar: Arc<Avatar>,
    animator: Animator,
    view: View,
    next_word_at: Option<Instant>,
    word_task: Option<JoinHandle<()>>,
    error_flash: Duration,
}

impl<R: Rng> App<R> {
    /// `sound` is used for cues only; pass `None` to mute them
    pub fn new(
        game: Game<R>,
        voice: Arc<dyn Voice>,
        sound: Option<SoundEngine>,
        avatar: Arc<Avatar>,
        config: &Config,
    ) -> (Self, mpsc::UnboundedReceiver<NarrationEvent>) {
        let (narrator, rx) = Narrator::new(voice.clone());
        let app = Self {
            game,
            voice,
            sound,
            narrator,
            animator: Animator::new(avatar.config.clone()),
            avatar,
            view: View::default(),
            next_word_at: None,
            word_task: None,
            error_flash: config.timing.error_flash(),
        };
        (app, rx)
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn avatar_mode(&self) -> AvatarMode {
        self.animator.mode()
    }

    pub fn next_word_at(&self) -> Option<Instant> {
        self.next_word_at
    }

    /// Text rows of the avatar, or nothing while it is hidden
    pub fn avatar_frame(&self) -> Option<Vec<String>> {
        match self.animator.mode() {
            AvatarMode::Hidden => None,
            _ => Some(self.avatar.render_frame(self.animator.frame())),
        }
    }

    /// Carry out the effects the game asked for
    pub fn apply(&mut self, events: Vec<GameEvent>) {
        for event in events {
            match event {
                GameEvent::SpeakWord(word) => self.speak_word(word),
                GameEvent::Cue(cue) => self.play_cue(cue),
                GameEvent::FlashError => {
                    self.view.error_until = Some(Instant::now() + self.error_flash);
                }
                GameEvent::ScheduleNextWord(delay) => {
                    self.next_word_at = Some(Instant::now() + delay);
                }
                GameEvent::LevelChanged(level) => self.reset_for_level(level),
                GameEvent::Narrate(script) => {
                    let id = self.narrator.start(script);
                    debug!("Narration #{} for level {}", id, self.game.state().level);
                }
            }
        }
    }

    fn speak_word(&mut self, word: String) {
        if let Some(task) = self.word_task.take() {
            task.abort();
        }
        let voice = self.voice.clone();
        self.word_task = Some(tokio::spawn(async move {
            if let Err(e) = voice.speak(&word).await {
                warn!("⚠️ Could not say '{}': {}", word, e);
            }
        }));
    }

    fn play_cue(&self, cue: Cue) {
        if let Some(sound) = &self.sound {
            if let Err(e) = sound.play_cue(cue) {
                debug!("Cue {:?} not played: {}", cue, e);
            }
        }
    }

    /// Drop everything that belonged to the previous level
    fn reset_for_level(&mut self, level: usize) {
        info!("🔁 Switched to level {}", level + 1);
        self.next_word_at = None;
        if let Some(task) = self.word_task.take() {
            task.abort();
        }
        self.narrator.abort();
        self.voice.cancel();
        self.view = View::default();
        self.animator.hide();
    }

    /// Keys while the level picker is open; Esc closes it
    fn on_picker_key(&mut self, selected: usize, code: KeyCode) -> Vec<GameEvent> {
        let last = self.game.levels().len().saturating_sub(1);
        match code {
            KeyCode::Up => self.view.picker = Some(selected.saturating_sub(1)),
            KeyCode::Down => self.view.picker = Some((selected + 1).min(last)),
            KeyCode::Esc | KeyCode::F(5) => self.view.picker = None,
            KeyCode::Enter => {
                self.view.picker = None;
                return self.game.set_level(selected);
            }
            _ => {}
        }
        Vec::new()
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.kind == KeyEventKind::Release {
            return Control::Continue;
        }
        let modified = key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);

        if let Some(selected) = self.view.picker {
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                return Control::Quit;
            }
            let events = self.on_picker_key(selected, key.code);
            self.apply(events);
            return Control::Continue;
        }

        let events = match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Control::Quit
            }
            KeyCode::Enter | KeyCode::Char(' ') if !self.game.state().started => self.game.start(),
            KeyCode::Enter => {
                self.next_word_at = None;
                self.game.next_word()
            }
            KeyCode::F(2) => self.game.level_down(),
            KeyCode::F(3) => self.game.level_up(false),
            KeyCode::F(5) if self.game.state().started => {
                self.view.picker = Some(self.game.state().level);
                Vec::new()
            }
            KeyCode::Char(c) if !modified => self.game.handle_key(c),
            _ => Vec::new(),
        };
        self.apply(events);
        Control::Continue
    }

    /// Render a narration step; events of aborted scripts are dropped
    pub fn on_narration(&mut self, event: NarrationEvent) {
        if event.script_id() != self.narrator.current_id() {
            debug!("Dropping stale narration event {:?}", event);
            return;
        }
        match event {
            NarrationEvent::Step { step, .. } => match step {
                Step::ShowText(text) => self.view.caption = Some(text),
                Step::ClearText => self.view.caption = None,
                Step::Avatar(mode) => self.animator.set_mode(mode),
                Step::ShowSuccess(message) => self.view.success = Some(message),
                Step::ClearSuccess => self.view.success = None,
                Step::Speak(_) | Step::PlayClip(_) | Step::Pause(_) => {}
            },
            NarrationEvent::Finished { .. } => {
                let events = self.game.intro_finished();
                self.apply(events);
            }
        }
    }

    /// The scheduled next word is due
    pub fn on_next_word_due(&mut self) {
        self.next_word_at = None;
        let events = self.game.next_word();
        self.apply(events);
    }

    pub fn tick(&mut self, delta: Duration) {
        self.animator.tick(delta);
        if self
            .view
            .error_until
            .is_some_and(|until| Instant::now() >= until)
        {
            self.view.error_until = None;
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

/// Run the game until the player quits; the terminal must be in raw mode
pub async fn run<R: Rng, W: Write>(
    mut app: App<R>,
    mut narration: mpsc::UnboundedReceiver<NarrationEvent>,
    out: &mut W,
) -> anyhow::Result<()> {
    let mut input = EventStream::new();
    let mut ticker = tokio::time::interval(FRAME);
    let mut last_tick = Instant::now();

    loop {
        screens::draw(out, &app)?;

        tokio::select! {
            maybe_event = input.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if app.on_key(key) == Control::Quit {
                        info!("👋 Quit requested");
                        break;
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => break,
            },
            Some(event) = narration.recv() => app.on_narration(event),
            _ = sleep_until(app.next_word_at()) => app.on_next_word_due(),
            _ = ticker.tick() => {
                let now = Instant::now();
                app.tick(now - last_tick);
                last_tick = now;
            }
        }
    }
    Ok(())
}
