//! Synthesized feedback tones
//!
//! Short enveloped oscillator notes played as keystroke, error, word and
//! level-up cues.

use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

const SAMPLE_RATE: u32 = 44_100;
const PEAK_VOLUME: f32 = 0.25;
const ATTACK: f32 = 0.05;

const C5: f32 = 523.25;
const E5: f32 = 659.25;
const G5: f32 = 783.99;
const C6: f32 = 1046.50;
const E6: f32 = 1318.51;
const G6: f32 = 1567.98;
const E3: f32 = 164.81;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

/// Sound cues the game asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    KeyOk,
    Error,
    WordComplete,
    Fanfare,
}

/// One note of a cue, starting `offset` after the cue fires
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledTone {
    pub offset: Duration,
    pub frequency: f32,
    pub duration: Duration,
    pub waveform: Waveform,
}

fn note(offset_ms: u64, frequency: f32, duration_ms: u64, waveform: Waveform) -> ScheduledTone {
    ScheduledTone {
        offset: Duration::from_millis(offset_ms),
        frequency,
        duration: Duration::from_millis(duration_ms),
        waveform,
    }
}

impl Cue {
    pub fn schedule(&self) -> Vec<ScheduledTone> {
        use Waveform::{Sine, Triangle};

        match self {
            Cue::KeyOk => vec![note(0, G5, 150, Triangle)],
            Cue::Error => vec![note(0, E3, 250, Sine)],
            Cue::WordComplete => vec![
                note(0, C5, 100, Sine),
                note(150, E5, 100, Sine),
                note(300, G5, 100, Sine),
                note(450, C6, 300, Sine),
            ],
            Cue::Fanfare => vec![
                note(0, C5, 100, Triangle),
                note(120, G5, 100, Triangle),
                note(240, C6, 250, Triangle),
                note(550, E6, 400, Triangle),
                note(550, G6, 400, Triangle),
            ],
        }
    }
}

/// Mono oscillator with a linear attack/decay envelope
#[derive(Debug, Clone)]
pub struct Tone {
    frequency: f32,
    waveform: Waveform,
    duration: Duration,
    position: u64,
    total_samples: u64,
}

impl Tone {
    pub fn new(frequency: f32, duration: Duration, waveform: Waveform) -> Self {
        let total_samples = (duration.as_secs_f32() * SAMPLE_RATE as f32).round() as u64;
        Self {
            frequency,
            waveform,
            duration,
            position: 0,
            total_samples,
        }
    }

    pub fn from_scheduled(tone: &ScheduledTone) -> Self {
        Self::new(tone.frequency, tone.duration, tone.waveform)
    }

    /// Envelope gain `t` seconds into the note
    pub fn envelope(&self, t: f32) -> f32 {
        let length = self.duration.as_secs_f32();
        let attack = ATTACK.min(length);
        if t < attack {
            return PEAK_VOLUME * t / attack;
        }
        let decay = length - attack;
        if decay <= 0.0 {
            return 0.0;
        }
        (PEAK_VOLUME * (1.0 - (t - attack) / decay)).max(0.0)
    }

    fn oscillator(&self, t: f32) -> f32 {
        let phase = (self.frequency * t).fract();
        match self.waveform {
            Waveform::Sine => (2.0 * PI * phase).sin(),
            Waveform::Triangle => 1.0 - 4.0 * (phase - 0.5).abs(),
        }
    }
}

impl Iterator for Tone {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.position >= self.total_samples {
            return None;
        }
        let t = self.position as f32 / SAMPLE_RATE as f32;
        self.position += 1;
        Some(self.oscillator(t) * self.envelope(t))
    }
}

impl Source for Tone {
    fn current_frame_len(&self) -> Option<usize> {
        Some((self.total_samples - self.position) as usize)
    }

    fn channels(&self) -> u16 {
        1
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let tone = Tone::new(440.0, Duration::from_millis(250), Waveform::Sine);
        assert_eq!(tone.envelope(0.0), 0.0);
        assert!((tone.envelope(0.05) - PEAK_VOLUME).abs() < 1e-4);
        assert!(tone.envelope(0.15) < PEAK_VOLUME);
        assert!(tone.envelope(0.25).abs() < 1e-4);
    }

    #[test]
    fn test_sample_count_and_bounds() {
        let tone = Tone::new(783.99, Duration::from_millis(150), Waveform::Triangle);
        let samples: Vec<f32> = tone.collect();
        assert_eq!(samples.len(), (0.15 * SAMPLE_RATE as f32).round() as usize);
        assert!(samples.iter().all(|s| s.abs() <= PEAK_VOLUME + 1e-4));
        assert!(samples.iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn test_word_complete_arpeggio() {
        let schedule = Cue::WordComplete.schedule();
        let offsets: Vec<u128> = schedule.iter().map(|t| t.offset.as_millis()).collect();
        assert_eq!(offsets, vec![0, 150, 300, 450]);
        assert_eq!(schedule[3].duration, Duration::from_millis(300));
    }

    #[test]
    fn test_fanfare_ends_with_chord() {
        let schedule = Cue::Fanfare.schedule();
        let last_two = &schedule[schedule.len() - 2..];
        assert!(last_two.iter().all(|t| t.offset == Duration::from_millis(550)));
        assert!(schedule.iter().all(|t| t.waveform == Waveform::Triangle));
    }

    #[test]
    fn test_error_is_low_sine() {
        let schedule = Cue::Error.schedule();
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].waveform, Waveform::Sine);
        assert!(schedule[0].frequency < 200.0);
    }
}
