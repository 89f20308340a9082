//! Move feature extraction
//!
//! Turns a completed move plus the resulting game-state flags into a
//! [`MoveFeatures`] record. The scoring category is decided exactly once
//! here, as a [`MoveKind`] tagged union; downstream consumers match on it
//! exhaustively instead of probing optional fields.
//!
//! Extraction is deterministic and has no side effects. Malformed input is
//! rejected with [`CoreError::InvalidMoveData`](crate::error::CoreError)
//! and nothing downstream observes it.

use crate::error::{CoreError, CoreResult};
use crate::pieces::{CastleSide, PieceKind};

/// Minimum value an attacked piece must have to count as a fork target
pub const FORK_VALUE_THRESHOLD: f32 = 3.0;

/// Game-state flags observed after the move was applied by the rules engine
#[derive(Debug, Clone, Copy, Default)]
pub struct GameFlags {
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

/// A completed move as reported by the rules-engine adapter
///
/// This is the loosely-shaped boundary record: optional fields may be
/// inconsistent if the producer misbehaves, which is exactly what
/// [`extract`] validates before anything else consumes the move.
#[derive(Debug, Clone, Default)]
pub struct RawMove {
    /// Kind of the piece that moved; `None` is malformed input
    pub piece: Option<PieceKind>,
    /// Kind of the captured piece, if any
    pub captured: Option<PieceKind>,
    /// Whether the move captured (must agree with `captured`)
    pub is_capture: bool,
    /// Whether the capture was en passant
    pub is_en_passant: bool,
    /// Promotion target, if the move promoted
    pub promotion: Option<PieceKind>,
    /// Castling side, if the move castled
    pub castle: Option<CastleSide>,
    /// Standard algebraic notation of the move
    pub san: String,
    /// Opponent pieces attacked by the moved piece from its destination
    /// square, in the post-move position
    pub threatened: Vec<PieceKind>,
}

/// Scoring category of a move, decided once at extraction time
///
/// Priority when categories overlap:
/// checkmate > check > en passant > promotion > castle > capture > quiet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveKind {
    Quiet,
    Capture { victim: PieceKind },
    Check { victim: Option<PieceKind> },
    Checkmate,
    Castle { side: CastleSide },
    Promotion { to: PieceKind, victim: Option<PieceKind> },
    EnPassant,
}

/// Structured feature set for one completed move
///
/// `kind` drives the continuous intensity signal; the discrete event
/// fields (`is_en_passant`, `promotion`, `castle`, `fork_count`) drive the
/// one-shot effect dispatcher independently of `kind`, so a promotion that
/// also gives check still registers as a promotion event.
#[derive(Debug, Clone)]
pub struct MoveFeatures {
    pub mover: PieceKind,
    pub kind: MoveKind,
    pub san: String,
    pub gives_check: bool,
    pub is_en_passant: bool,
    pub promotion: Option<PieceKind>,
    pub castle: Option<CastleSide>,
    /// Number of fork targets (attacked opponent pieces worth at least
    /// [`FORK_VALUE_THRESHOLD`])
    pub fork_count: u32,
}

impl MoveFeatures {
    /// Whether the moved piece forked two or more valuable opponent pieces
    pub fn is_fork(&self) -> bool {
        self.fork_count >= 2
    }
}

/// Extract a feature record from a completed move
///
/// Rejects malformed input (`InvalidMoveData`) without partial effects:
/// a missing piece kind, a capture flag without a victim, or a promotion
/// flag without a target.
pub fn extract(raw: &RawMove, flags: &GameFlags) -> CoreResult<MoveFeatures> {
    let mover = raw.piece.ok_or_else(|| CoreError::InvalidMoveData {
        message: "missing piece kind".into(),
    })?;

    if raw.is_capture && raw.captured.is_none() {
        return Err(CoreError::InvalidMoveData {
            message: format!("capture without a victim kind ({})", raw.san),
        });
    }
    if !raw.is_capture && raw.captured.is_some() {
        return Err(CoreError::InvalidMoveData {
            message: format!("victim kind on a non-capture ({})", raw.san),
        });
    }
    if let Some(to) = raw.promotion {
        if matches!(to, PieceKind::Pawn | PieceKind::King) {
            return Err(CoreError::InvalidMoveData {
                message: format!("illegal promotion target {:?}", to),
            });
        }
    }

    let kind = if flags.is_checkmate {
        MoveKind::Checkmate
    } else if flags.is_check {
        MoveKind::Check {
            victim: raw.captured,
        }
    } else if raw.is_en_passant {
        MoveKind::EnPassant
    } else if let Some(to) = raw.promotion {
        MoveKind::Promotion {
            to,
            victim: raw.captured,
        }
    } else if let Some(side) = raw.castle {
        MoveKind::Castle { side }
    } else if let Some(victim) = raw.captured {
        MoveKind::Capture { victim }
    } else {
        MoveKind::Quiet
    };

    let fork_count = raw
        .threatened
        .iter()
        .filter(|kind| kind.value() >= FORK_VALUE_THRESHOLD)
        .count() as u32;

    Ok(MoveFeatures {
        mover,
        kind,
        san: raw.san.clone(),
        gives_check: flags.is_check || flags.is_checkmate,
        is_en_passant: raw.is_en_passant,
        promotion: raw.promotion,
        castle: raw.castle,
        fork_count,
    })
}
