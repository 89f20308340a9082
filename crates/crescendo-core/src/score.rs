//! Evaluation score type shared with the evaluator backends

use serde::{Deserialize, Serialize};

/// Engine evaluation score.
///
/// Centipawns: positive favors the side to move.
/// Mate: forced mate in N ply; the sign indicates the winning side.
/// Exactly one of the two is present per evaluator reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvalScore {
    Centipawns(i32),
    MateIn(i32),
}

impl std::fmt::Display for EvalScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalScore::Centipawns(cp) => write!(f, "{:+.2}", f64::from(*cp) / 100.0),
            EvalScore::MateIn(m) if *m >= 0 => write!(f, "+M{}", m),
            EvalScore::MateIn(m) => write!(f, "-M{}", m.abs()),
        }
    }
}
