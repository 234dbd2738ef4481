//! Game engine
//!
//! A keystroke-driven state machine over the loaded levels. It never sleeps,
//! plays sound or draws: every operation returns the effects the front end
//! has to carry out (`GameEvent`), which keeps the rules testable.

mod state;

pub use state::GameState;

use crate::audio::Cue;
use crate::config::GameTiming;
use crate::error::{TippenError, TippenResult};
use crate::keyboard::fold_case;
use crate::levels::{GameData, Level, SuccessMessage};
use crate::narration::{self, Script};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::{debug, info};

/// Effects requested by the game
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Say the new word without blocking input
    SpeakWord(String),
    Cue(Cue),
    FlashError,
    /// Call `next_word` after the delay
    ScheduleNextWord(Duration),
    /// Level switched; pending timers and speech are stale
    LevelChanged(usize),
    /// Run this script, then call `intro_finished`
    Narrate(Script),
}

pub struct Game<R: Rng = StdRng> {
    data: GameData,
    timing: GameTiming,
    state: GameState,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(data: GameData, timing: GameTiming) -> TippenResult<Self> {
        Self::with_rng(data, timing, StdRng::from_entropy())
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(data: GameData, timing: GameTiming, rng: R) -> TippenResult<Self> {
        if data.levels.is_empty() {
            return Err(TippenError::LevelData("No levels loaded".to_string()));
        }
        Ok(Self {
            data,
            timing,
            state: GameState::default(),
            rng,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn levels(&self) -> &[Level] {
        &self.data.levels
    }

    pub fn current_level(&self) -> &Level {
        // level index is kept in range by every setter
        &self.data.levels[self.state.level]
    }

    fn last_level(&self) -> usize {
        self.data.levels.len() - 1
    }

    /// The word as shown: upper-cased unless the level is case sensitive
    pub fn display_word(&self) -> String {
        if self.current_level().case_sensitive {
            self.state.current_word.clone()
        } else {
            self.state.current_word.chars().map(fold_case).collect()
        }
    }

    /// Key the player should press next, as labelled on the keyboard
    pub fn next_key(&self) -> Option<char> {
        self.state.expected_char().map(fold_case)
    }

    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.state.started {
            return Vec::new();
        }
        self.state.started = true;
        info!("🎮 Game started at level {}", self.state.level);
        self.begin_intro(None)
    }

    fn begin_intro(&mut self, success: Option<SuccessMessage>) -> Vec<GameEvent> {
        self.state.intro_playing = true;
        let level = self.current_level();
        let script = match success {
            Some(message) => narration::level_up_script(&message, level, &self.timing),
            None => narration::level_intro_script(level, &self.timing),
        };
        vec![GameEvent::Narrate(script)]
    }

    /// The intro script ran to completion
    pub fn intro_finished(&mut self) -> Vec<GameEvent> {
        self.state.intro_playing = false;
        self.next_word()
    }

    /// Pick an unused word of the current level at random
    pub fn next_word(&mut self) -> Vec<GameEvent> {
        if self.state.intro_playing || !self.state.started {
            return Vec::new();
        }
        let count = self.current_level().items.len();
        if count == 0 {
            return Vec::new();
        }
        if self.state.used_words.len() >= count {
            self.state.used_words.clear();
        }

        let available: Vec<usize> = (0..count)
            .filter(|i| !self.state.used_words.contains(i))
            .collect();
        let Some(&index) = available.choose(&mut self.rng) else {
            return Vec::new();
        };
        self.state.used_words.push(index);

        let item = self.current_level().items[index].clone();
        debug!("Next word: '{}'", item.text);
        self.state.current_word = item.text;
        self.state.current_icons = item.icons;
        self.state.current_index = 0;

        vec![GameEvent::SpeakWord(self.state.current_word.clone())]
    }

    /// Validate one typed key against the expected char
    pub fn handle_key(&mut self, key: char) -> Vec<GameEvent> {
        if !self.state.started || self.state.intro_playing {
            return Vec::new();
        }
        let Some(expected) = self.state.expected_char() else {
            return Vec::new();
        };

        let level = self.current_level();
        if !level.allows_key(key) {
            return Vec::new();
        }
        let matches = if level.case_sensitive {
            key == expected
        } else {
            fold_case(key) == fold_case(expected)
        };

        if matches {
            self.state.correct_count += 1;
            self.state.current_index += 1;
            if self.state.has_pending_char() {
                vec![GameEvent::Cue(Cue::KeyOk)]
            } else {
                self.complete_word()
            }
        } else {
            self.state.error_count += 1;
            vec![GameEvent::Cue(Cue::Error), GameEvent::FlashError]
        }
    }

    fn complete_word(&mut self) -> Vec<GameEvent> {
        let progress = self.state.progress as u16 + self.timing.progress_increment as u16;
        if progress >= 100 {
            self.state.progress = 100;
            return self.level_up(true);
        }
        self.state.progress = progress as u8;
        vec![
            GameEvent::Cue(Cue::WordComplete),
            GameEvent::ScheduleNextWord(self.timing.word_complete_delay()),
        ]
    }

    fn pick_success_message(&mut self) -> SuccessMessage {
        self.data
            .success_messages
            .choose(&mut self.rng)
            .cloned()
            .unwrap_or_else(SuccessMessage::fallback)
    }

    /// Advance a level (clamped at the last); optionally celebrate first
    pub fn level_up(&mut self, show_success: bool) -> Vec<GameEvent> {
        if !self.state.started {
            return Vec::new();
        }
        let level = (self.state.level + 1).min(self.last_level());
        let mut events = vec![GameEvent::Cue(Cue::Fanfare)];
        events.extend(self.switch_level(level));

        let message = show_success.then(|| self.pick_success_message());
        events.extend(self.begin_intro(message));
        events
    }

    /// Go back a level (clamped at 0)
    pub fn level_down(&mut self) -> Vec<GameEvent> {
        if !self.state.started {
            return Vec::new();
        }
        let level = self.state.level.saturating_sub(1);
        let mut events = self.switch_level(level);
        events.extend(self.begin_intro(None));
        events
    }

    /// Jump to `level` (clamped). Before the game starts this only selects
    /// the level the intro will announce.
    pub fn set_level(&mut self, level: usize) -> Vec<GameEvent> {
        let level = level.min(self.last_level());
        let mut events = self.switch_level(level);
        if self.state.started {
            events.extend(self.begin_intro(None));
        }
        events
    }

    fn switch_level(&mut self, level: usize) -> Vec<GameEvent> {
        info!("📈 Level {} -> {}", self.state.level, level);
        self.state.level = level;
        self.state.reset_level_progress();
        vec![GameEvent::LevelChanged(level)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::levels::WordItem;

    fn item(text: &str) -> WordItem {
        WordItem {
            text: text.to_string(),
            icons: vec!["🐯".to_string()],
        }
    }

    fn data() -> GameData {
        GameData {
            levels: vec![
                Level {
                    name: "Eins".to_string(),
                    ..Level::from_items(vec![item("ab"), item("cd"), item("ef")])
                },
                Level {
                    name: "Zwei".to_string(),
                    case_sensitive: true,
                    enabled_keys: Some(vec!["H".into(), "a".into(), "U".into(), "s".into()]),
                    ..Level::from_items(vec![item("Haus")])
                },
            ],
            success_messages: vec![],
        }
    }

    fn started_game() -> Game<StdRng> {
        let mut game =
            Game::with_rng(data(), GameTiming::default(), StdRng::seed_from_u64(7)).expect("game");
        let events = game.start();
        assert!(matches!(events.as_slice(), [GameEvent::Narrate(_)]));
        game.intro_finished();
        game
    }

    fn type_word(game: &mut Game<StdRng>) -> Vec<GameEvent> {
        let word: Vec<char> = game.state().current_word.chars().collect();
        let mut last = Vec::new();
        for c in word {
            last = game.handle_key(c);
        }
        last
    }

    #[test]
    fn test_level_change_clears_word_in_progress() {
        let mut game = started_game();
        let first = game.state().current_word.chars().next().expect("word loaded");
        game.handle_key(first);
        assert_eq!(game.state().current_index, 1);

        game.level_up(false);
        assert!(game.state().intro_playing);
        assert_eq!(game.display_word(), "");
        assert_eq!(game.next_key(), None);
        assert!(game.state().current_icons.is_empty());
        assert_eq!(game.state().current_index, 0);
        assert!(game.handle_key('h').is_empty());
    }

    #[test]
    fn test_requires_levels() {
        assert!(Game::new(GameData::default(), GameTiming::default()).is_err());
    }

    #[test]
    fn test_keys_ignored_before_start_and_during_intro() {
        let mut game =
            Game::with_rng(data(), GameTiming::default(), StdRng::seed_from_u64(1)).expect("game");
        assert!(game.handle_key('a').is_empty());

        game.start();
        assert!(game.state().intro_playing);
        assert!(game.next_word().is_empty());
        assert!(game.handle_key('a').is_empty());
        assert_eq!(game.state().error_count, 0);
    }

    #[test]
    fn test_start_twice_is_noop() {
        let mut game = started_game();
        assert!(game.start().is_empty());
    }

    #[test]
    fn test_intro_finished_speaks_first_word() {
        let mut game =
            Game::with_rng(data(), GameTiming::default(), StdRng::seed_from_u64(3)).expect("game");
        game.start();
        let events = game.intro_finished();
        let word = game.state().current_word.clone();
        assert_eq!(events, vec![GameEvent::SpeakWord(word)]);
        assert_eq!(game.state().current_icons, vec!["🐯".to_string()]);
    }

    #[test]
    fn test_correct_and_wrong_keys() {
        let mut game = started_game();
        let expected = game.state().expected_char().expect("word loaded");

        assert_eq!(game.handle_key('z'), vec![GameEvent::Cue(Cue::Error), GameEvent::FlashError]);
        assert_eq!(game.state().error_count, 1);
        assert_eq!(game.state().current_index, 0);

        // case-insensitive level accepts the upper-case key
        assert_eq!(game.handle_key(fold_case(expected)), vec![GameEvent::Cue(Cue::KeyOk)]);
        assert_eq!(game.state().correct_count, 1);
        assert_eq!(game.state().current_index, 1);
    }

    #[test]
    fn test_word_completion_schedules_next_word() {
        let mut game = started_game();
        let events = type_word(&mut game);
        assert_eq!(
            events,
            vec![
                GameEvent::Cue(Cue::WordComplete),
                GameEvent::ScheduleNextWord(Duration::from_millis(1000)),
            ]
        );
        assert_eq!(game.state().progress, 10);

        // index never runs past the word
        assert!(game.handle_key('x').is_empty());
        assert_eq!(game.state().current_index, game.state().word_len());
    }

    #[test]
    fn test_words_not_repeated_until_level_exhausted() {
        let mut game = started_game();
        let mut seen = vec![game.state().current_word.clone()];
        for _ in 0..2 {
            game.next_word();
            seen.push(game.state().current_word.clone());
        }
        seen.sort();
        assert_eq!(seen, vec!["ab", "cd", "ef"]);

        // fourth pick starts a fresh round
        game.next_word();
        assert_eq!(game.state().used_words.len(), 1);
    }

    #[test]
    fn test_level_up_after_ten_words() {
        let mut game = started_game();
        for _ in 0..9 {
            type_word(&mut game);
            game.next_word();
        }
        assert_eq!(game.state().progress, 90);

        let events = type_word(&mut game);
        assert_eq!(events[0], GameEvent::Cue(Cue::Fanfare));
        assert_eq!(events[1], GameEvent::LevelChanged(1));
        match &events[2] {
            GameEvent::Narrate(script) => {
                assert!(script.contains(&narration::Step::ShowSuccess(SuccessMessage::fallback())));
            }
            other => panic!("expected narration, got {:?}", other),
        }
        assert_eq!(game.state().level, 1);
        assert_eq!(game.state().progress, 0);
        assert!(game.state().used_words.is_empty());
        assert!(game.state().intro_playing);
    }

    #[test]
    fn test_level_bounds_clamped() {
        let mut game = started_game();
        game.level_down();
        assert_eq!(game.state().level, 0);

        game.level_up(false);
        game.level_up(false);
        assert_eq!(game.state().level, 1);

        game.set_level(99);
        assert_eq!(game.state().level, 1);
    }

    #[test]
    fn test_manual_level_up_has_no_success_message() {
        let mut game = started_game();
        let events = game.level_up(false);
        let GameEvent::Narrate(script) = &events[2] else {
            panic!("expected narration");
        };
        assert!(!script
            .iter()
            .any(|s| matches!(s, narration::Step::ShowSuccess(_))));
    }

    #[test]
    fn test_set_level_before_start_is_silent() {
        let mut game =
            Game::with_rng(data(), GameTiming::default(), StdRng::seed_from_u64(1)).expect("game");
        assert_eq!(game.set_level(1), vec![GameEvent::LevelChanged(1)]);
        assert!(!game.state().intro_playing);
        assert!(game.level_up(true).is_empty());
    }

    #[test]
    fn test_case_sensitive_level_with_enabled_keys() {
        let mut game = started_game();
        game.set_level(1);
        game.intro_finished();
        assert_eq!(game.state().current_word, "Haus");
        assert_eq!(game.display_word(), "Haus");
        assert_eq!(game.next_key(), Some('H'));

        // disabled key is ignored entirely
        assert!(game.handle_key('x').is_empty());
        assert_eq!(game.state().error_count, 0);

        // wrong case counts as an error
        assert_eq!(game.handle_key('h'), vec![GameEvent::Cue(Cue::Error), GameEvent::FlashError]);
        assert_eq!(game.handle_key('H'), vec![GameEvent::Cue(Cue::KeyOk)]);
    }

    #[test]
    fn test_display_word_upper_cased() {
        let game = started_game();
        assert_eq!(game.display_word(), game.state().current_word.to_uppercase());
    }

    #[test]
    fn test_success_message_picked_from_data() {
        let mut data = data();
        data.success_messages = vec![SuccessMessage {
            text: "Klasse!".to_string(),
            icon: "⭐".to_string(),
        }];
        let mut game =
            Game::with_rng(data, GameTiming::default(), StdRng::seed_from_u64(9)).expect("game");
        game.start();
        game.intro_finished();
        let events = game.level_up(true);
        let GameEvent::Narrate(script) = &events[2] else {
            panic!("expected narration");
        };
        assert!(script.contains(&narration::Step::PlayClip("Klasse!".to_string())));
    }
}
