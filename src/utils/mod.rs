//! Utility modules

pub mod filename;

pub use filename::{audio_file_name, normalize_filename};
