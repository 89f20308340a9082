//! Piece kinds and their feature weights
//!
//! The weights are the standard relative piece values. The king weight is
//! used only for feature scoring (fork threats, mover value), never for
//! material counting.

use serde::{Deserialize, Serialize};

/// The six chess piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Feature weight of this piece kind
    ///
    /// pawn=1, knight=3, bishop=3, rook=5, queen=9, king=10.
    pub fn value(self) -> f32 {
        match self {
            PieceKind::Pawn => 1.0,
            PieceKind::Knight => 3.0,
            PieceKind::Bishop => 3.0,
            PieceKind::Rook => 5.0,
            PieceKind::Queen => 9.0,
            PieceKind::King => 10.0,
        }
    }

    /// Lowercase algebraic letter for logs and status lines
    pub fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

/// Which side a castling move goes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CastleSide {
    King,
    Queen,
}
