//! Error types for the core reducer
//!
//! Malformed input is rejected with a typed error and the state is left
//! unchanged; no partial updates.

/// Errors that can occur while reducing move or evaluation input
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Move data was malformed (e.g. missing piece kind)
    #[error("invalid move data: {message}")]
    InvalidMoveData { message: String },

    /// Evaluation reply was malformed or out of range (e.g. mate in 0)
    #[error("invalid evaluation: {message}")]
    InvalidEvaluation { message: String },
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
