//! Tippen Library
//!
//! Core modules for the Tippen typing tutor and its audio generator.

pub mod audio;
pub mod avatar;
pub mod config;
pub mod error;
pub mod game;
pub mod generator;
pub mod keyboard;
pub mod levels;
pub mod narration;
pub mod providers;
pub mod tts;
pub mod ui;
pub mod utils;
