//! Audio output
//!
//! Speech clip playback, feedback tones and the speak-then-wait voice used
//! by the narration pipeline.

pub mod engine;
pub mod speaker;
pub mod tone;

pub use engine::SoundEngine;
pub use speaker::{Speaker, Voice};
pub use tone::{Cue, ScheduledTone, Tone, Waveform};
