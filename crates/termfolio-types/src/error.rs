//! Error types for termfolio.

use std::io;

/// The deliberate, user-triggered crash of a terminal session.
///
/// Kept as its own type so an error surface can tell it apart from genuine
/// failures (by matching [`TermfolioError::Crash`] or by downcasting).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("intentional crash: `{phrase}` took the system down")]
pub struct IntentionalCrash {
    /// The command line that triggered the crash.
    pub phrase: String,
}

/// Errors produced by termfolio.
#[derive(Debug, thiserror::Error)]
pub enum TermfolioError {
    #[error("config error: {0}")]
    Config(String),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Crash(#[from] IntentionalCrash),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TermfolioError {
    /// Whether this is the intentional crash rather than a real failure.
    pub fn is_intentional_crash(&self) -> bool {
        matches!(self, Self::Crash(_))
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TermfolioError>;
