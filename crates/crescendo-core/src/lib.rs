//! Core reducer for the adaptive chess music session
//!
//! Pure, synchronous building blocks with no I/O:
//!
//! - [`features`]: move feature extraction into a tagged [`features::MoveKind`]
//! - [`intensity`]: the bounded intensity engine with spike-and-decay
//! - [`tracks`]: intensity-to-track mapping with hysteresis
//! - [`effects`]: one-shot effect dispatch
//! - [`phase`]: game phase and intensity baseline
//!
//! The session crate feeds completed moves and evaluator replies in; the
//! evaluation path's staleness handling lives with the evaluator, not here.

pub mod effects;
pub mod error;
pub mod features;
pub mod intensity;
pub mod phase;
pub mod pieces;
pub mod score;
pub mod tracks;

pub use effects::{triggers_for, EffectTrigger};
pub use error::{CoreError, CoreResult};
pub use features::{extract, GameFlags, MoveFeatures, MoveKind, RawMove};
pub use intensity::{IntensityEngine, IntensityState, MAX_INTENSITY, MIN_INTENSITY};
pub use phase::GamePhase;
pub use pieces::{CastleSide, PieceKind};
pub use score::EvalScore;
pub use tracks::{default_playlist, MusicState, TrackInfo, TrackSelector};
