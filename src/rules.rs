//! Game-rules adapter
//!
//! All chess legality lives in `shakmaty`; this adapter resolves a
//! drag-and-drop square pair into a legal move (or rejects it so the UI
//! snaps the piece back), reports the resulting game-state flags, and
//! describes the completed move as a [`RawMove`] for feature extraction.
//! It also computes the post-move threat list the fork detector needs,
//! since only the rules layer can see the board.

use crescendo_core::{CastleSide, GameFlags, PieceKind, RawMove};
use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{
    attacks, CastlingMode, Chess, Color, EnPassantMode, File, Move, Position, Role, Square,
};
use tracing::debug;

use crate::error::{SessionError, SessionResult};

/// Owns the authoritative position and its undo history
#[derive(Debug, Clone, Default)]
pub struct RulesAdapter {
    pos: Chess,
    history: Vec<Chess>,
}

impl RulesAdapter {
    /// Standard starting position
    pub fn new() -> Self {
        Self::default()
    }

    /// Set up from a FEN string
    pub fn from_fen(fen: &str) -> SessionResult<Self> {
        let parsed: Fen = fen.parse().map_err(|e| SessionError::InvalidFen {
            message: format!("{e}"),
        })?;
        let pos = parsed
            .into_position(CastlingMode::Standard)
            .map_err(|e| SessionError::InvalidFen {
                message: format!("{e}"),
            })?;
        Ok(Self {
            pos,
            history: Vec::new(),
        })
    }

    /// Resolve a square pair to a legal move and play it
    ///
    /// Returns `None` when no legal move matches; the UI must snap the
    /// piece back. A promotion with no explicit target promotes to a
    /// queen. Castling is accepted as the king's two-square hop onto its
    /// target square (or onto the rook, Chess960-style).
    pub fn try_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Role>,
    ) -> Option<RawMove> {
        let candidate = self.find_move(from, to, promotion)?;
        let san = SanPlus::from_move(self.pos.clone(), &candidate).to_string();
        let mover = self.pos.turn();

        let next = match self.pos.clone().play(&candidate) {
            Ok(next) => next,
            Err(error) => {
                // find_move only yields legal moves; treat this as illegal.
                debug!(?error, "legal move refused by rules engine");
                return None;
            }
        };

        let raw = RawMove {
            piece: Some(role_to_kind(candidate.role())),
            captured: candidate.capture().map(role_to_kind),
            is_capture: candidate.is_capture(),
            is_en_passant: candidate.is_en_passant(),
            promotion: candidate.promotion().map(role_to_kind),
            castle: castle_side(&candidate),
            san,
            threatened: threats_from(&next, &candidate, mover),
        };

        self.history.push(std::mem::replace(&mut self.pos, next));
        Some(raw)
    }

    /// Game-state flags for the current (post-move) position
    pub fn flags(&self) -> GameFlags {
        GameFlags {
            is_check: self.pos.is_check(),
            is_checkmate: self.pos.is_checkmate(),
            is_stalemate: self.pos.is_stalemate(),
        }
    }

    pub fn is_check(&self) -> bool {
        self.pos.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.pos.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.pos.is_stalemate()
    }

    pub fn is_game_over(&self) -> bool {
        self.pos.is_game_over()
    }

    /// Side to move
    pub fn turn(&self) -> Color {
        self.pos.turn()
    }

    /// Current position as a FEN string
    pub fn current_fen(&self) -> String {
        Fen::from_position(self.pos.clone(), EnPassantMode::Legal).to_string()
    }

    /// Destination squares of all legal moves from one square
    pub fn legal_targets(&self, from: Square) -> Vec<Square> {
        self.pos
            .legal_moves()
            .iter()
            .filter_map(|m| match m {
                Move::Castle { king, rook } if *king == from => {
                    Some(castle_king_target(*king, *rook))
                }
                _ if m.from() == Some(from) => Some(m.to()),
                _ => None,
            })
            .collect()
    }

    /// Half-moves played since the start (or the set-up position)
    pub fn ply(&self) -> usize {
        self.history.len()
    }

    /// Roll back one half-move; returns false at the initial position
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(previous) => {
                self.pos = previous;
                true
            }
            None => false,
        }
    }

    /// Back to the standard starting position
    pub fn reset(&mut self) {
        self.pos = Chess::default();
        self.history.clear();
    }

    fn find_move(&self, from: Square, to: Square, promotion: Option<Role>) -> Option<Move> {
        self.pos
            .legal_moves()
            .iter()
            .find(|m| match m {
                Move::Castle { king, rook } => {
                    *king == from && (to == *rook || to == castle_king_target(*king, *rook))
                }
                _ => {
                    m.from() == Some(from)
                        && m.to() == to
                        && promotion_matches(m.promotion(), promotion)
                }
            })
            .cloned()
    }
}

fn promotion_matches(actual: Option<Role>, requested: Option<Role>) -> bool {
    match (actual, requested) {
        (None, None) => true,
        (None, Some(_)) => false,
        (Some(actual), Some(requested)) => actual == requested,
        // Dropping a pawn on the last rank without picking a piece
        // promotes to a queen.
        (Some(actual), None) => actual == Role::Queen,
    }
}

fn castle_side(m: &Move) -> Option<CastleSide> {
    match m {
        Move::Castle { king, rook } => {
            if u32::from(rook.file()) > u32::from(king.file()) {
                Some(CastleSide::King)
            } else {
                Some(CastleSide::Queen)
            }
        }
        _ => None,
    }
}

fn castle_king_target(king: Square, rook: Square) -> Square {
    let file = if u32::from(rook.file()) > u32::from(king.file()) {
        File::G
    } else {
        File::C
    };
    Square::from_coords(file, king.rank())
}

/// Opponent pieces the moved piece attacks from its destination square
fn threats_from(next: &Chess, m: &Move, mover: Color) -> Vec<PieceKind> {
    let to = match m {
        // The castled king threatens nothing new worth scoring.
        Move::Castle { .. } => return Vec::new(),
        _ => m.to(),
    };
    let role = m.promotion().unwrap_or_else(|| m.role());
    let piece = shakmaty::Piece { color: mover, role };

    let board = next.board();
    let reach = attacks::attacks(to, piece, board.occupied());
    (reach & board.by_color(mover.other()))
        .into_iter()
        .filter_map(|sq| board.piece_at(sq).map(|victim| role_to_kind(victim.role)))
        .collect()
}

fn role_to_kind(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    fn play(adapter: &mut RulesAdapter, from: &str, to: &str) -> RawMove {
        adapter
            .try_move(sq(from), sq(to), None)
            .unwrap_or_else(|| panic!("{from}{to} should be legal"))
    }

    #[test]
    fn test_opening_pawn_push_is_quiet() {
        let mut adapter = RulesAdapter::new();
        let raw = play(&mut adapter, "e2", "e4");

        assert_eq!(raw.piece, Some(PieceKind::Pawn));
        assert!(!raw.is_capture);
        assert_eq!(raw.san, "e4");
        assert_eq!(adapter.turn(), Color::Black);
        assert_eq!(adapter.ply(), 1);
    }

    #[test]
    fn test_illegal_move_leaves_position_unchanged() {
        let mut adapter = RulesAdapter::new();
        let fen_before = adapter.current_fen();

        assert!(adapter.try_move(sq("e2"), sq("e5"), None).is_none());
        assert_eq!(adapter.current_fen(), fen_before);
        assert_eq!(adapter.turn(), Color::White);
    }

    #[test]
    fn test_scholars_mate_reports_checkmate() {
        let mut adapter = RulesAdapter::new();
        for (from, to) in [
            ("e2", "e4"),
            ("e7", "e5"),
            ("f1", "c4"),
            ("b8", "c6"),
            ("d1", "h5"),
            ("g8", "f6"),
        ] {
            play(&mut adapter, from, to);
        }
        let raw = play(&mut adapter, "h5", "f7");

        assert_eq!(raw.captured, Some(PieceKind::Pawn));
        assert!(raw.is_capture);
        let flags = adapter.flags();
        assert!(flags.is_checkmate);
        assert!(adapter.is_game_over());
    }

    #[test]
    fn test_kingside_castle_resolves_from_king_hop() {
        let mut adapter = RulesAdapter::new();
        for (from, to) in [
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("b8", "c6"),
            ("f1", "c4"),
            ("g8", "f6"),
        ] {
            play(&mut adapter, from, to);
        }
        let raw = play(&mut adapter, "e1", "g1");

        assert_eq!(raw.castle, Some(CastleSide::King));
        assert_eq!(raw.piece, Some(PieceKind::King));
        assert!(!raw.is_capture);
        assert_eq!(raw.san, "O-O");
    }

    #[test]
    fn test_en_passant_is_flagged() {
        let mut adapter = RulesAdapter::new();
        for (from, to) in [("e2", "e4"), ("a7", "a6"), ("e4", "e5"), ("d7", "d5")] {
            play(&mut adapter, from, to);
        }
        let raw = play(&mut adapter, "e5", "d6");

        assert!(raw.is_en_passant);
        assert!(raw.is_capture);
        assert_eq!(raw.captured, Some(PieceKind::Pawn));
    }

    #[test]
    fn test_promotion_defaults_to_queen() {
        let mut adapter = RulesAdapter::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let raw = play(&mut adapter, "a7", "a8");
        assert_eq!(raw.promotion, Some(PieceKind::Queen));
    }

    #[test]
    fn test_underpromotion_is_honored() {
        let mut adapter = RulesAdapter::from_fen("8/P6k/8/8/8/8/8/K7 w - - 0 1").unwrap();
        let raw = adapter
            .try_move(sq("a7"), sq("a8"), Some(Role::Knight))
            .unwrap();
        assert_eq!(raw.promotion, Some(PieceKind::Knight));
    }

    #[test]
    fn test_royal_fork_threats_are_reported() {
        // Nc7+ forks the king on e8 and the rook on a8.
        let mut adapter = RulesAdapter::from_fen("r3k3/8/2N5/8/8/8/8/4K3 w - - 0 1").unwrap();
        let raw = play(&mut adapter, "c6", "c7");

        assert!(raw.threatened.contains(&PieceKind::King));
        assert!(raw.threatened.contains(&PieceKind::Rook));
        assert!(adapter.is_check());
    }

    #[test]
    fn test_undo_restores_previous_position() {
        let mut adapter = RulesAdapter::new();
        let fen_before = adapter.current_fen();
        play(&mut adapter, "e2", "e4");

        assert!(adapter.undo());
        assert_eq!(adapter.current_fen(), fen_before);
        assert!(!adapter.undo());
    }

    #[test]
    fn test_legal_targets_include_castle_square() {
        let mut adapter = RulesAdapter::new();
        for (from, to) in [
            ("e2", "e4"),
            ("e7", "e5"),
            ("g1", "f3"),
            ("b8", "c6"),
            ("f1", "c4"),
            ("g8", "f6"),
        ] {
            play(&mut adapter, from, to);
        }
        let targets = adapter.legal_targets(sq("e1"));
        assert!(targets.contains(&sq("g1")));
        assert!(targets.contains(&sq("e2")));
    }

    #[test]
    fn test_from_fen_rejects_garbage() {
        assert!(RulesAdapter::from_fen("not a position").is_err());
    }
}
