//! Narration scripts
//!
//! Level intros and level-up celebrations are short scripts: show a line,
//! let the avatar talk while it is spoken, pause, move on. A `Narrator` runs
//! one script at a time on the runtime, awaiting every utterance before the
//! next step, and reports visible steps back to the UI.

use crate::audio::Voice;
use crate::avatar::AvatarMode;
use crate::config::GameTiming;
use crate::levels::{Level, SuccessMessage};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    ShowText(String),
    ClearText,
    Avatar(AvatarMode),
    /// Speak and wait, falling back to TTS
    Speak(String),
    /// Play the pre-generated clip only
    PlayClip(String),
    Pause(Duration),
    ShowSuccess(SuccessMessage),
    ClearSuccess,
}

impl Step {
    /// Steps the UI has to render
    pub fn is_visible(&self) -> bool {
        matches!(
            self,
            Step::ShowText(_)
                | Step::ClearText
                | Step::Avatar(_)
                | Step::ShowSuccess(_)
                | Step::ClearSuccess
        )
    }
}

pub type Script = Vec<Step>;

/// Announce the level name and description with the avatar talking
pub fn level_intro_script(level: &Level, timing: &GameTiming) -> Script {
    let mut script = vec![Step::Avatar(AvatarMode::Talk)];

    script.extend([
        Step::ShowText(level.name.clone()),
        Step::Speak(level.name.clone()),
        Step::Avatar(AvatarMode::Idle),
        Step::Pause(timing.intro_pause()),
    ]);

    if let Some(description) = level.description() {
        script.extend([
            Step::ShowText(description.to_string()),
            Step::Avatar(AvatarMode::Talk),
            Step::Speak(description.to_string()),
            Step::Avatar(AvatarMode::Idle),
            Step::Pause(timing.intro_pause()),
        ]);
    }

    script.extend([Step::ClearText, Step::Avatar(AvatarMode::Hidden)]);
    script
}

/// Let the fanfare ring, celebrate, then introduce the new level
pub fn level_up_script(message: &SuccessMessage, level: &Level, timing: &GameTiming) -> Script {
    let mut script = vec![
        Step::Pause(timing.fanfare()),
        Step::ShowSuccess(message.clone()),
        Step::PlayClip(message.text.clone()),
        Step::Pause(timing.intro_pause()),
        Step::ClearSuccess,
    ];
    script.extend(level_intro_script(level, timing));
    script
}

/// Progress of the running script
#[derive(Debug, Clone, PartialEq)]
pub enum NarrationEvent {
    Step { script: u64, step: Step },
    Finished { script: u64 },
}

impl NarrationEvent {
    pub fn script_id(&self) -> u64 {
        match self {
            NarrationEvent::Step { script, .. } | NarrationEvent::Finished { script } => *script,
        }
    }
}

/// Runs narration scripts one at a time
pub struct Narrator {
    voice: Arc<dyn Voice>,
    events: mpsc::UnboundedSender<NarrationEvent>,
    current: Option<JoinHandle<()>>,
    next_id: u64,
}

impl Narrator {
    pub fn new(voice: Arc<dyn Voice>) -> (Self, mpsc::UnboundedReceiver<NarrationEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let narrator = Self {
            voice,
            events,
            current: None,
            next_id: 0,
        };
        (narrator, rx)
    }

    /// Id of the most recently started script; events of older ones are stale
    pub fn current_id(&self) -> u64 {
        self.next_id
    }

    pub fn is_running(&self) -> bool {
        self.current.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Abort the running script (and its speech) and start `script`
    pub fn start(&mut self, script: Script) -> u64 {
        self.abort();
        self.next_id += 1;
        let id = self.next_id;
        debug!("🎬 Starting narration #{} ({} steps)", id, script.len());

        let voice = self.voice.clone();
        let events = self.events.clone();
        self.current = Some(tokio::spawn(run_script(id, script, voice, events)));
        id
    }

    pub fn abort(&mut self) {
        if let Some(handle) = self.current.take() {
            if !handle.is_finished() {
                handle.abort();
                self.voice.cancel();
            }
        }
    }
}

impl Drop for Narrator {
    fn drop(&mut self) {
        self.abort();
    }
}

/// Execute `script` in order, awaiting speech and pauses
pub async fn run_script(
    id: u64,
    script: Script,
    voice: Arc<dyn Voice>,
    events: mpsc::UnboundedSender<NarrationEvent>,
) {
    for step in script {
        match &step {
            Step::Speak(text) => {
                if let Err(e) = voice.speak(text).await {
                    warn!("⚠️ Narration could not speak '{}': {}", text, e);
                }
            }
            Step::PlayClip(text) => {
                if let Err(e) = voice.play_clip(text).await {
                    warn!("⚠️ Narration could not play clip '{}': {}", text, e);
                }
            }
            Step::Pause(duration) => tokio::time::sleep(*duration).await,
            _ => {}
        }

        if step.is_visible() && events.send(NarrationEvent::Step { script: id, step }).is_err() {
            return;
        }
    }
    let _ = events.send(NarrationEvent::Finished { script: id });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(description: Option<&str>) -> Level {
        Level {
            name: "Grundreihe".to_string(),
            description: description.map(str::to_string),
            ..Level::from_items(Vec::new())
        }
    }

    #[test]
    fn test_intro_without_description() {
        let timing = GameTiming::default();
        let script = level_intro_script(&level(None), &timing);
        let spoken: Vec<_> = script
            .iter()
            .filter_map(|s| match s {
                Step::Speak(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(spoken, vec!["Grundreihe"]);
        assert_eq!(script.last(), Some(&Step::Avatar(AvatarMode::Hidden)));
    }

    #[test]
    fn test_intro_speaks_description_after_pause() {
        let timing = GameTiming::default();
        let script = level_intro_script(&level(Some("Nur A bis L")), &timing);
        let pause_at = script
            .iter()
            .position(|s| *s == Step::Pause(timing.intro_pause()))
            .expect("pause after name");
        let description_at = script
            .iter()
            .position(|s| *s == Step::Speak("Nur A bis L".to_string()))
            .expect("description spoken");
        assert!(pause_at < description_at);
        assert_eq!(
            script.iter().filter(|s| matches!(s, Step::Pause(_))).count(),
            2
        );
    }

    #[test]
    fn test_level_up_plays_clip_then_intro() {
        let timing = GameTiming::default();
        let message = SuccessMessage::fallback();
        let script = level_up_script(&message, &level(None), &timing);

        assert_eq!(script[0], Step::Pause(timing.fanfare()));
        assert_eq!(script[1], Step::ShowSuccess(message.clone()));
        assert_eq!(script[2], Step::PlayClip("Super gemacht!".to_string()));
        assert!(script.contains(&Step::Speak("Grundreihe".to_string())));
        assert!(!script.contains(&Step::Speak("Super gemacht!".to_string())));
    }

    #[test]
    fn test_visible_steps() {
        assert!(Step::ShowText("x".to_string()).is_visible());
        assert!(!Step::Speak("x".to_string()).is_visible());
        assert!(!Step::Pause(Duration::ZERO).is_visible());
    }
}
