//! Per-colour view over a `Position`: the legality filter and the
//! check / checkmate / stalemate queries.

use tracing::warn;

use crate::engine::board::Position;
use crate::engine::moves::{Move, MoveStatus, MoveTransition};
use crate::engine::types::{Color, Piece};

/// One side of a position.
#[derive(Clone, Copy, Debug)]
pub struct Player<'a> {
    position: &'a Position,
    color: Color,
}

impl<'a> Player<'a> {
    pub fn new(position: &'a Position, color: Color) -> Self {
        Player { position, color }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn position(&self) -> &'a Position {
        self.position
    }

    pub fn opponent(&self) -> Player<'a> {
        Player::new(self.position, !self.color)
    }

    pub fn king(&self) -> Piece {
        self.position.king(self.color)
    }

    pub fn active_pieces(&self) -> &'a [Piece] {
        self.position.pieces(self.color)
    }

    pub fn pseudo_legal_moves(&self) -> &'a [Move] {
        self.position.pseudo_legal_moves(self.color)
    }

    /// Pseudo-legal moves that keep the king safe. Cached on the position.
    pub fn legal_moves(&self) -> &'a [Move] {
        self.position.legal_moves(self.color)
    }

    /// Whether any opponent move captures on the king's square.
    pub fn is_in_check(&self) -> bool {
        let king = self.king().coordinate;
        self.opponent()
            .pseudo_legal_moves()
            .iter()
            .any(|m| m.destination().flip() == king)
    }

    pub fn is_in_checkmate(&self) -> bool {
        self.is_in_check() && self.legal_moves().is_empty()
    }

    pub fn is_in_stalemate(&self) -> bool {
        !self.is_in_check() && self.legal_moves().is_empty()
    }

    /// Try to play `mv` for this side.
    ///
    /// The move must be one of this side's pseudo-legal moves. It is first
    /// probed on its own board, then committed across boards; if either
    /// leaves the king attacked the attempt is rejected and the transition
    /// carries the unchanged position.
    pub fn make_move(&self, mv: &Move) -> MoveTransition<'a> {
        if !self.pseudo_legal_moves().contains(mv) {
            return MoveTransition::rejected(self.position, *mv, MoveStatus::IllegalMove);
        }

        match mv.execute_in_place(self.position) {
            Ok(probe) if Player::new(&probe, self.color).is_in_check() => {
                return MoveTransition::rejected(self.position, *mv, MoveStatus::LeavesKingInCheck);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(mv = %mv, error = %e, "probe rebuild failed");
                return MoveTransition::rejected(self.position, *mv, MoveStatus::IllegalMove);
            }
        }

        match mv.execute(self.position) {
            Ok(next) if Player::new(&next, self.color).is_in_check() => {
                MoveTransition::rejected(self.position, *mv, MoveStatus::LeavesKingInCheck)
            }
            Ok(next) => MoveTransition::done(next, *mv),
            Err(e) => {
                warn!(mv = %mv, error = %e, "move rebuild failed");
                MoveTransition::rejected(self.position, *mv, MoveStatus::IllegalMove)
            }
        }
    }

    pub(crate) fn filter_legal_moves(&self) -> Vec<Move> {
        self.pseudo_legal_moves()
            .iter()
            .filter(|m| self.make_move(m).status.is_done())
            .copied()
            .collect()
    }
}
