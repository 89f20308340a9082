//! Error types for the evaluation backends
//!
//! None of these are fatal to a session: a failed or malformed reply is
//! logged and the intensity state is simply left unchanged.

/// Errors that can occur while requesting or parsing an evaluation
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    /// Cloud evaluation request failed (network, HTTP status)
    #[error("cloud evaluation request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Engine process could not be spawned or its pipes broke
    #[error("engine process error: {0}")]
    Process(#[from] std::io::Error),

    /// Engine sent something outside the line protocol
    #[error("engine protocol error: {message}")]
    Protocol { message: String },

    /// Reply arrived but carried no usable score
    #[error("malformed evaluation reply: {message}")]
    MalformedReply { message: String },
}

/// Result type alias for evaluator operations
pub type EvalResult<T> = Result<T, EvalError>;
