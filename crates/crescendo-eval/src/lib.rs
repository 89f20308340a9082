//! Asynchronous position evaluation
//!
//! Two interchangeable backends behind one trait, an HTTP cloud-eval
//! lookup and a local UCI engine process, plus the generation-counter
//! dispatcher that keeps racy replies from touching superseded positions.
//!
//! Requests are keyed by a board-position string (FEN); replies carry
//! either a centipawn score or a mate-in-N count. A non-responding backend
//! simply never delivers: no timeouts are imposed and nothing blocks.

use async_trait::async_trait;
use crescendo_core::EvalScore;

pub mod cloud;
pub mod dispatcher;
pub mod error;
pub mod uci;

pub use cloud::CloudEvalClient;
pub use dispatcher::{EvalDispatcher, EvalReply};
pub use error::{EvalError, EvalResult};
pub use uci::UciEngine;

/// A position evaluation backend
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Evaluate the position given as a FEN string
    async fn evaluate(&self, fen: &str) -> EvalResult<EvalScore>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}
