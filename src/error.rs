//! Error types for the session crate

use thiserror::Error;

/// Errors that can occur wiring a session together
#[derive(Error, Debug)]
pub enum SessionError {
    /// Position string could not be parsed or set up
    #[error("invalid FEN: {message}")]
    InvalidFen { message: String },

    /// Settings file I/O error
    #[error("settings I/O error: {0}")]
    SettingsIo(#[from] std::io::Error),

    /// Settings serialization/deserialization error
    #[error("settings serialization error: {0}")]
    SettingsSerialization(#[from] serde_json::Error),
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
