//! System fallback TTS engine
//!
//! Drives espeak-ng or speech-dispatcher as a child process and waits for it
//! to finish speaking.

use super::TtsEngine;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::process::Command;
use tokio::sync::Notify;
use tracing::debug;

/// espeak-ng's default speed in words per minute
const ESPEAK_BASE_WPM: f32 = 175.0;

/// Cancels whatever speech-dispatcher is saying for every client
const SPD_CANCEL_ARGS: &[&str] = &["-C"];

#[derive(Debug)]
pub struct SystemEngine {
    language: String,
    rate: f32,
    cancelled: Notify,
    /// Set once spd-say was used; its speech outlives the killed client
    used_speechd: AtomicBool,
}

impl SystemEngine {
    pub fn new(language: &str, rate: f32) -> Self {
        Self {
            language: language.to_string(),
            rate,
            cancelled: Notify::new(),
            used_speechd: AtomicBool::new(false),
        }
    }

    /// Arguments for `espeak-ng`
    pub fn espeak_args(&self, text: &str) -> Vec<String> {
        let wpm = (ESPEAK_BASE_WPM * self.rate).round().clamp(80.0, 450.0) as u32;
        vec![
            "-v".to_string(),
            self.language.clone(),
            "-s".to_string(),
            wpm.to_string(),
            "--".to_string(),
            text.to_string(),
        ]
    }

    /// Arguments for `spd-say`, which rates speech from -100 to 100
    pub fn spd_say_args(&self, text: &str) -> Vec<String> {
        let rate = ((self.rate - 1.0) * 100.0).round().clamp(-100.0, 100.0) as i32;
        vec![
            "--wait".to_string(),
            "-l".to_string(),
            self.language.clone(),
            "-r".to_string(),
            rate.to_string(),
            "--".to_string(),
            text.to_string(),
        ]
    }

    /// Arguments for stopping speech-dispatcher, if it was ever used
    pub fn speechd_cancel_args(&self) -> Option<&'static [&'static str]> {
        self.used_speechd
            .load(Ordering::Relaxed)
            .then_some(SPD_CANCEL_ARGS)
    }

    fn stop_speechd(&self) {
        let Some(args) = self.speechd_cancel_args() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = Command::new("spd-say").args(args).status().await {
                        debug!("spd-say -C failed: {}", e);
                    }
                });
            }
            Err(_) => {
                if let Err(e) = std::process::Command::new("spd-say").args(args).status() {
                    debug!("spd-say -C failed: {}", e);
                }
            }
        }
    }

    async fn run(&self, program: &str, args: Vec<String>) -> Result<bool> {
        let mut child = match Command::new(program).args(&args).kill_on_drop(true).spawn() {
            Ok(child) => child,
            Err(e) => {
                debug!("{} unavailable: {}", program, e);
                return Ok(false);
            }
        };
        if program == "spd-say" {
            self.used_speechd.store(true, Ordering::Relaxed);
        }

        tokio::select! {
            status = child.wait() => {
                let status = status?;
                debug!("{} finished with {}", program, status);
            }
            _ = self.cancelled.notified() => {
                debug!("{} interrupted", program);
                let _ = child.start_kill();
            }
        }
        Ok(true)
    }
}

#[async_trait]
impl TtsEngine for SystemEngine {
    async fn speak(&self, text: &str) -> Result<()> {
        debug!("System speaking: {}", text);

        // Try espeak-ng, then speech-dispatcher
        if self.run("espeak-ng", self.espeak_args(text)).await? {
            return Ok(());
        }

        if self.run("spd-say", self.spd_say_args(text)).await? {
            return Ok(());
        }

        Err(anyhow::anyhow!(
            "No system TTS command found (tried espeak-ng, spd-say)"
        ))
    }

    fn cancel(&self) {
        self.cancelled.notify_waiters();
        self.stop_speechd();
    }

    fn name(&self) -> &str {
        "system"
    }
}
