/// In-memory progress of a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameState {
    pub current_word: String,
    pub current_icons: Vec<String>,
    /// Position of the next expected char in `current_word` (in chars)
    pub current_index: usize,
    pub correct_count: u32,
    pub error_count: u32,
    pub level: usize,
    /// 0..=100
    pub progress: u8,
    /// Indices of items already asked in this round of the level
    pub used_words: Vec<usize>,
    pub intro_playing: bool,
    pub started: bool,
}

impl GameState {
    pub fn word_len(&self) -> usize {
        self.current_word.chars().count()
    }

    /// A word is loaded and not yet fully typed
    pub fn has_pending_char(&self) -> bool {
        self.current_index < self.word_len()
    }

    pub fn expected_char(&self) -> Option<char> {
        self.current_word.chars().nth(self.current_index)
    }

    /// Back to the start of a level's word rotation
    pub(crate) fn reset_level_progress(&mut self) {
        self.progress = 0;
        self.used_words.clear();
        self.clear_word();
    }

    /// No word on screen until the next one is picked
    pub(crate) fn clear_word(&mut self) {
        self.current_word.clear();
        self.current_icons.clear();
        self.current_index = 0;
    }
}
