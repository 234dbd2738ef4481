//! Sound Engine for speech clips and feedback tones
//!
//! Uses a channel-based architecture to handle rodio's non-Send stream.
//! The engine spawns a dedicated audio thread that owns the playback infrastructure.

use super::tone::{Cue, Tone};
use anyhow::anyhow;
use rodio::Source;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

/// How often the audio thread checks whether the current clip has ended
const POLL_INTERVAL: Duration = Duration::from_millis(20);

type Done = oneshot::Sender<anyhow::Result<()>>;

/// Commands sent to the audio thread
enum AudioCommand {
    /// Play a clip, replacing whatever is playing, and report when it ends
    PlayWait(PathBuf, Done),
    /// Fire-and-forget feedback tones, mixed over the voice
    PlayCue(Cue),
    Stop,
}

/// Thread-safe handle to the sound engine
#[derive(Clone)]
pub struct SoundEngine {
    sender: mpsc::Sender<AudioCommand>,
}

impl std::fmt::Debug for SoundEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundEngine").finish()
    }
}

impl SoundEngine {
    pub fn new() -> anyhow::Result<Self> {
        let (sender, receiver) = mpsc::channel::<AudioCommand>();

        // Spawn dedicated audio thread
        thread::Builder::new()
            .name("tippen-audio".to_string())
            .spawn(move || {
                Self::audio_thread(receiver);
            })?;

        Ok(Self { sender })
    }

    fn audio_thread(receiver: mpsc::Receiver<AudioCommand>) {
        use rodio::OutputStream;

        // Initialize audio output on this thread
        let (stream, stream_handle) = match OutputStream::try_default() {
            Ok(s) => s,
            Err(e) => {
                warn!("🔇 Failed to initialize audio output: {}", e);
                Self::drain_without_output(receiver);
                return;
            }
        };

        // Keep stream alive
        let _stream = stream;
        let mut sink = match rodio::Sink::try_new(&stream_handle) {
            Ok(s) => s,
            Err(e) => {
                error!("❌ Failed to create audio sink: {}", e);
                Self::drain_without_output(receiver);
                return;
            }
        };
        let mut waiter: Option<Done> = None;

        info!("🔊 Audio thread started");

        loop {
            match receiver.recv_timeout(POLL_INTERVAL) {
                Ok(AudioCommand::PlayWait(path, done)) => {
                    debug!("🔊 Playing clip: {:?}", path);
                    sink.stop();
                    if let Ok(new_sink) = rodio::Sink::try_new(&stream_handle) {
                        sink = new_sink;
                    }
                    if let Some(previous) = waiter.take() {
                        let _ = previous.send(Ok(()));
                    }
                    match Self::queue_file(&sink, &path) {
                        Ok(()) => waiter = Some(done),
                        Err(e) => {
                            error!("❌ Audio playback failed for {:?}: {}", path, e);
                            let _ = done.send(Err(e));
                        }
                    }
                }
                Ok(AudioCommand::PlayCue(cue)) => {
                    for scheduled in cue.schedule() {
                        let source = Tone::from_scheduled(&scheduled).delay(scheduled.offset);
                        if let Err(e) = stream_handle.play_raw(source) {
                            warn!("⚠️ Failed to play {:?} cue: {}", cue, e);
                            break;
                        }
                    }
                }
                Ok(AudioCommand::Stop) => {
                    debug!("🛑 Stopping playback");
                    sink.stop();
                    // Re-create sink after stop as it becomes unusable if we want to play again
                    if let Ok(new_sink) = rodio::Sink::try_new(&stream_handle) {
                        sink = new_sink;
                    }
                    if let Some(previous) = waiter.take() {
                        let _ = previous.send(Ok(()));
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if sink.empty() {
                if let Some(done) = waiter.take() {
                    let _ = done.send(Ok(()));
                }
            }
        }

        info!("🔇 Audio thread stopped");
    }

    /// Without an output device every clip fails so callers can fall back to TTS
    fn drain_without_output(receiver: mpsc::Receiver<AudioCommand>) {
        while let Ok(cmd) = receiver.recv() {
            if let AudioCommand::PlayWait(path, done) = cmd {
                let _ = done.send(Err(anyhow!("No audio output for {:?}", path)));
            }
        }
    }

    fn queue_file(sink: &rodio::Sink, path: &Path) -> anyhow::Result<()> {
        use rodio::Decoder;
        use std::fs::File;
        use std::io::BufReader;

        if !path.exists() {
            anyhow::bail!("Audio file not found: {:?}", path);
        }

        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file))?;

        sink.append(source);
        Ok(())
    }

    /// Play a clip and wait until it ends or is interrupted
    pub async fn play_and_wait<P: Into<PathBuf>>(&self, path: P) -> anyhow::Result<()> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(AudioCommand::PlayWait(path.into(), tx))
            .map_err(|e| anyhow!("Audio thread disconnected: {}", e))?;

        rx.await
            .map_err(|e| anyhow!("Audio thread dropped playback: {}", e))?
    }

    /// Play a feedback cue
    pub fn play_cue(&self, cue: Cue) -> anyhow::Result<()> {
        self.sender
            .send(AudioCommand::PlayCue(cue))
            .map_err(|e| anyhow!("Audio thread disconnected: {}", e))
    }

    /// Stop the current clip; its waiter resolves immediately
    pub fn stop(&self) -> anyhow::Result<()> {
        self.sender
            .send(AudioCommand::Stop)
            .map_err(|e| anyhow!("Audio thread disconnected: {}", e))
    }
}
