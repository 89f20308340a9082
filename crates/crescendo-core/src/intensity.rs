//! Intensity engine
//!
//! A bounded scalar summarizing how dramatic the current game moment is.
//! Two input paths update the same state: the synchronous move-driven path
//! and the asynchronous evaluation-driven path. Both clamp the result to
//! `[MIN_INTENSITY, MAX_INTENSITY]` after every transition.
//!
//! # Scoring policy
//!
//! The source material disagreed on the exact bonuses; this crate fixes one
//! policy and keeps it:
//!
//! - checkmate jumps straight to [`MAX_INTENSITY`] and arms a spike;
//! - check adds the mover's value plus [`CHECK_BONUS`] (any capture on the
//!   same move is ignored, the check branch wins);
//! - a capture adds the mover's value plus [`CAPTURE_BONUS`] plus half the
//!   victim's value;
//! - everything else (quiet moves, castles, non-capturing promotions)
//!   decays toward the phase baseline by [`QUIET_DECAY_STEP`];
//! - evaluation replies overwrite the current value: `|cp| / 9` for
//!   centipawn scores, `MAX / N` for a forced mate in N ply.
//!
//! Capturing a piece worth at least [`SPIKE_VICTIM_VALUE`] (or delivering
//! checkmate) arms a spike: until [`SPIKE_DURATION`] elapses, quiet-move
//! decay is suppressed, after which decay resumes stepwise toward the
//! baseline rather than jumping.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::features::{MoveFeatures, MoveKind};
use crate::phase::GamePhase;
use crate::pieces::PieceKind;

/// Lower intensity bound
pub const MIN_INTENSITY: f32 = 1.0;
/// Upper intensity bound
pub const MAX_INTENSITY: f32 = 10.0;
/// Added when the move gives check (and is not mate)
pub const CHECK_BONUS: f32 = 5.0;
/// Added when the move captures (and does not give check)
pub const CAPTURE_BONUS: f32 = 2.0;
/// Step a quiet move decays toward the baseline
pub const QUIET_DECAY_STEP: f32 = 0.5;
/// Centipawns per intensity point on the evaluation path
pub const CENTIPAWNS_PER_POINT: f32 = 9.0;
/// How long a spike holds the current value against quiet decay
pub const SPIKE_DURATION: Duration = Duration::from_secs(6);
/// Victim value that arms a spike when captured
pub const SPIKE_VICTIM_VALUE: f32 = 5.0;
/// How much an undone move pulls the intensity back down
pub const UNDO_STEP: f32 = 0.5;

/// Running intensity state, owned by [`IntensityEngine`]
#[derive(Debug, Clone, Copy)]
pub struct IntensityState {
    /// Current intensity, always within `[MIN_INTENSITY, MAX_INTENSITY]`
    pub current: f32,
    /// Slowly-drifting floor derived from the game phase
    pub baseline: f32,
    /// While set and in the future, quiet decay is suppressed
    pub spike_deadline: Option<Instant>,
}

impl Default for IntensityState {
    fn default() -> Self {
        Self {
            current: MIN_INTENSITY,
            baseline: GamePhase::Opening.baseline(),
            spike_deadline: None,
        }
    }
}

/// Reduces move features and evaluation scores into intensity
///
/// Created at game start, mutated on every move/evaluation event, reset on
/// new-game. Never persisted.
#[derive(Debug, Default)]
pub struct IntensityEngine {
    state: IntensityState,
    half_moves: u32,
}

impl IntensityEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current intensity value
    pub fn current(&self) -> f32 {
        self.state.current
    }

    /// Current baseline floor
    pub fn baseline(&self) -> f32 {
        self.state.baseline
    }

    /// Half-moves reduced since the last reset
    pub fn half_moves(&self) -> u32 {
        self.half_moves
    }

    /// Current game phase
    pub fn phase(&self) -> GamePhase {
        GamePhase::from_half_moves(self.half_moves)
    }

    /// Snapshot of the running state
    pub fn state(&self) -> &IntensityState {
        &self.state
    }

    /// Move-driven update, stamped with the wall clock
    pub fn apply_move(&mut self, features: &MoveFeatures) -> f32 {
        self.apply_move_at(features, Instant::now())
    }

    /// Move-driven update at an explicit instant
    pub fn apply_move_at(&mut self, features: &MoveFeatures, now: Instant) -> f32 {
        self.half_moves += 1;
        self.state.baseline = self.phase().baseline();

        let before = self.state.current;
        let mover = features.mover.value();
        let next = match features.kind {
            MoveKind::Checkmate => {
                self.arm_spike(now);
                MAX_INTENSITY
            }
            MoveKind::Check { victim } => {
                self.maybe_arm_spike(victim, now);
                before + mover + CHECK_BONUS
            }
            MoveKind::Capture { victim } => {
                self.maybe_arm_spike(Some(victim), now);
                before + mover + CAPTURE_BONUS + victim.value() / 2.0
            }
            MoveKind::EnPassant => {
                before + mover + CAPTURE_BONUS + PieceKind::Pawn.value() / 2.0
            }
            MoveKind::Promotion {
                victim: Some(victim),
                ..
            } => {
                self.maybe_arm_spike(Some(victim), now);
                before + mover + CAPTURE_BONUS + victim.value() / 2.0
            }
            MoveKind::Promotion { victim: None, .. }
            | MoveKind::Castle { .. }
            | MoveKind::Quiet => self.decayed(now),
        };

        self.state.current = clamp(next);
        debug!(
            san = %features.san,
            before,
            current = self.state.current,
            baseline = self.state.baseline,
            "intensity updated from move"
        );
        self.state.current
    }

    /// Evaluation-driven update (asynchronous input path)
    ///
    /// Overwrites the current value; a malformed reply (mate in 0) is
    /// rejected and the state is left untouched. Staleness is the
    /// dispatcher's concern; replies reaching this method are current.
    pub fn apply_evaluation(&mut self, score: crate::score::EvalScore) -> CoreResult<f32> {
        let next = match score {
            crate::score::EvalScore::Centipawns(cp) => {
                cp.unsigned_abs() as f32 / CENTIPAWNS_PER_POINT
            }
            crate::score::EvalScore::MateIn(0) => {
                return Err(CoreError::InvalidEvaluation {
                    message: "mate in 0".into(),
                })
            }
            crate::score::EvalScore::MateIn(n) => MAX_INTENSITY / n.unsigned_abs() as f32,
        };
        self.state.current = clamp(next);
        debug!(%score, current = self.state.current, "intensity updated from evaluation");
        Ok(self.state.current)
    }

    /// Roll one half-move back (undo)
    ///
    /// Pulls the intensity down one step; the exact pre-move value is not
    /// reconstructed.
    pub fn rewind_half_move(&mut self) {
        self.half_moves = self.half_moves.saturating_sub(1);
        self.state.baseline = self.phase().baseline();
        self.state.current = clamp(self.state.current - UNDO_STEP);
    }

    /// Reset to initial values for a new game
    pub fn reset(&mut self) {
        self.state = IntensityState::default();
        self.half_moves = 0;
    }

    fn decayed(&mut self, now: Instant) -> f32 {
        if let Some(deadline) = self.state.spike_deadline {
            if now < deadline {
                return self.state.current;
            }
            self.state.spike_deadline = None;
        }
        if self.state.current > self.state.baseline {
            (self.state.current - QUIET_DECAY_STEP).max(self.state.baseline)
        } else {
            // Never rises on a quiet move, even when below the baseline.
            self.state.current
        }
    }

    fn maybe_arm_spike(&mut self, victim: Option<PieceKind>, now: Instant) {
        if victim.map_or(false, |v| v.value() >= SPIKE_VICTIM_VALUE) {
            self.arm_spike(now);
        }
    }

    fn arm_spike(&mut self, now: Instant) {
        self.state.spike_deadline = Some(now + SPIKE_DURATION);
    }
}

fn clamp(value: f32) -> f32 {
    value.clamp(MIN_INTENSITY, MAX_INTENSITY)
}
