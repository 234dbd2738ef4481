//! Tippen Error Types
//!
//! Centralized error handling for the library crate.

use thiserror::Error;

/// Central error type for Tippen
#[derive(Error, Debug)]
pub enum TippenError {
    #[error("Level data error: {0}")]
    LevelData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TTS provider '{provider}' failed with status {status}: {body}")]
    Provider {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("Missing API key: {0} is not set")]
    MissingApiKey(&'static str),

    #[error("Avatar error: {0}")]
    Avatar(String),

    #[error("Lock poisoned: {0}")]
    Lock(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for Tippen operations
pub type TippenResult<T> = Result<T, TippenError>;

/// Helper to convert Mutex poison errors
impl<T> From<std::sync::PoisonError<T>> for TippenError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        TippenError::Lock(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_message() {
        let err = TippenError::Provider {
            provider: "openai".to_string(),
            status: 429,
            body: "rate limited".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "TTS provider 'openai' failed with status 429: rate limited"
        );
    }

    #[test]
    fn test_poison_conversion() {
        let lock = std::sync::Mutex::new(0);
        let _ = std::panic::catch_unwind(|| {
            let _guard = lock.lock().unwrap();
            panic!("poison");
        });
        let err: TippenError = lock.lock().unwrap_err().into();
        assert!(matches!(err, TippenError::Lock(_)));
    }
}
