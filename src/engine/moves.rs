//! Move representation and application.
//!
//! A move always lands on the board opposite the one the piece stands on.
//! Applying a move never touches the source `Position`; it stages a fresh
//! `Builder` and builds a new one.

use std::borrow::Cow;
use std::fmt;

use crate::engine::board::Position;
use crate::engine::types::{ChessError, Coordinate, Piece};

// =========================================================================
// Move variants
// =========================================================================

/// A quiet relocation to an empty square.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SimpleMove {
    pub piece: Piece,
    pub destination: Coordinate,
}

impl SimpleMove {
    pub fn new(piece: Piece, destination: Coordinate) -> Self {
        SimpleMove { piece, destination }
    }
}

/// A capture. The captured piece stands on `destination.flip()`, i.e. on the
/// mover's own board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AttackMove {
    pub piece: Piece,
    pub destination: Coordinate,
    pub captured: Piece,
}

impl AttackMove {
    pub fn new(piece: Piece, destination: Coordinate, captured: Piece) -> Self {
        AttackMove {
            piece,
            destination,
            captured,
        }
    }
}

/// A pawn reaching the far rank, by push or by capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PromotionMove {
    Push(SimpleMove),
    Capture(AttackMove),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Simple(SimpleMove),
    Attack(AttackMove),
    Promotion(PromotionMove),
}

impl Move {
    /// The piece as it stands before the move.
    pub fn piece(&self) -> Piece {
        match self {
            Move::Simple(m) | Move::Promotion(PromotionMove::Push(m)) => m.piece,
            Move::Attack(m) | Move::Promotion(PromotionMove::Capture(m)) => m.piece,
        }
    }

    pub fn source(&self) -> Coordinate {
        self.piece().coordinate
    }

    /// Landing square, always on the other board from `source()`.
    pub fn destination(&self) -> Coordinate {
        match self {
            Move::Simple(m) | Move::Promotion(PromotionMove::Push(m)) => m.destination,
            Move::Attack(m) | Move::Promotion(PromotionMove::Capture(m)) => m.destination,
        }
    }

    pub fn captured(&self) -> Option<Piece> {
        match self {
            Move::Attack(m) | Move::Promotion(PromotionMove::Capture(m)) => Some(m.captured),
            _ => None,
        }
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured().is_some()
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        matches!(self, Move::Promotion(_))
    }

    /// Heuristic used to order moves in search: the mover's square bonus,
    /// plus the full value of anything captured, doubled for promotions.
    pub fn ordering_value(&self) -> i32 {
        let base = self.piece().square_value();
        match self {
            Move::Simple(_) => base,
            Move::Attack(m) => base + m.captured.material_value(),
            Move::Promotion(PromotionMove::Push(_)) => base * 2,
            Move::Promotion(PromotionMove::Capture(m)) => (base + m.captured.material_value()) * 2,
        }
    }

    /// The piece that ends up on `landing` once the move is played.
    pub fn landed_piece(&self, landing: Coordinate) -> Piece {
        match self {
            Move::Promotion(_) => self.piece().promoted_at(landing),
            _ => self.piece().moved_to(landing),
        }
    }

    /// Play the move, relocating the piece to the other board.
    pub fn execute(&self, position: &Position) -> Result<Position, ChessError> {
        self.execute_at(position, self.destination())
    }

    /// Play the move on the piece's own board without relocating it. Used to
    /// probe whether the move would expose the king before committing it.
    pub fn execute_in_place(&self, position: &Position) -> Result<Position, ChessError> {
        self.execute_at(position, self.destination().flip())
    }

    fn execute_at(&self, position: &Position, landing: Coordinate) -> Result<Position, ChessError> {
        let mover = self.piece();
        let mut builder = position.to_builder();
        builder.clear(mover.coordinate);
        if let Some(captured) = self.captured() {
            builder.clear(captured.coordinate);
        }
        builder.set_piece(self.landed_piece(landing));
        builder.set_next_move_maker(mover.color);
        builder.build()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let piece = self.piece();
        let sep = if self.is_capture() { 'x' } else { '-' };
        write!(
            f,
            "{}{}{}{}",
            piece.kind.symbol(),
            piece.coordinate,
            sep,
            self.destination()
        )?;
        if self.is_promotion() {
            write!(f, "=Q")?;
        }
        Ok(())
    }
}

// =========================================================================
// MoveStatus / MoveTransition
// =========================================================================

/// Outcome of trying to play a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveStatus {
    Done,
    IllegalMove,
    LeavesKingInCheck,
}

impl MoveStatus {
    #[inline]
    pub fn is_done(self) -> bool {
        self == MoveStatus::Done
    }
}

/// The position after a move attempt. Unless the status is `Done`, this
/// borrows the unchanged position the move was tried on.
#[derive(Clone, Debug)]
pub struct MoveTransition<'a> {
    pub position: Cow<'a, Position>,
    pub mv: Move,
    pub status: MoveStatus,
}

impl<'a> MoveTransition<'a> {
    pub(crate) fn rejected(position: &'a Position, mv: Move, status: MoveStatus) -> Self {
        MoveTransition {
            position: Cow::Borrowed(position),
            mv,
            status,
        }
    }

    pub(crate) fn done(position: Position, mv: Move) -> Self {
        MoveTransition {
            position: Cow::Owned(position),
            mv,
            status: MoveStatus::Done,
        }
    }

    /// The resulting position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn into_position(self) -> Position {
        self.position.into_owned()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{BoardId, Color, PieceKind};

    fn at(board: BoardId, index: u8) -> Coordinate {
        Coordinate::new(board, index)
    }

    fn kings_only() -> crate::engine::board::Builder {
        let mut b = Position::builder();
        b.set_piece(Piece::king(Color::White, at(BoardId::One, 60)))
            .set_piece(Piece::king(Color::Black, at(BoardId::One, 4)))
            .set_to_move(Color::White);
        b
    }

    #[test]
    fn accessors_on_simple_move() {
        let knight = Piece::knight(Color::White, at(BoardId::One, 57));
        let mv = Move::Simple(SimpleMove::new(knight, at(BoardId::Two, 40)));
        assert_eq!(mv.piece(), knight);
        assert_eq!(mv.source(), at(BoardId::One, 57));
        assert_eq!(mv.destination(), at(BoardId::Two, 40));
        assert_eq!(mv.captured(), None);
        assert!(!mv.is_capture());
        assert!(!mv.is_promotion());
    }

    #[test]
    fn ordering_value_simple_is_square_bonus() {
        let knight = Piece::knight(Color::White, at(BoardId::One, 57));
        let mv = Move::Simple(SimpleMove::new(knight, at(BoardId::Two, 40)));
        assert_eq!(mv.ordering_value(), -40);
    }

    #[test]
    fn ordering_value_adds_captured_value() {
        let rook = Piece::rook(Color::White, at(BoardId::One, 32));
        let queen = Piece::queen(Color::Black, at(BoardId::One, 35));
        let mv = Move::Attack(AttackMove::new(rook, at(BoardId::Two, 35), queen));
        assert_eq!(mv.ordering_value(), rook.square_value() + queen.material_value());
    }

    #[test]
    fn ordering_value_doubles_for_promotion() {
        let pawn = Piece::new(
            PieceKind::Pawn { has_moved: true },
            Color::White,
            at(BoardId::One, 8),
        );
        let push = SimpleMove::new(pawn, at(BoardId::Two, 0));
        let mv = Move::Promotion(PromotionMove::Push(push));
        assert_eq!(mv.ordering_value(), pawn.square_value() * 2);
        assert_eq!(mv.ordering_value(), 100);
    }

    #[test]
    fn execute_relocates_to_other_board() {
        let mut b = kings_only();
        let knight = Piece::knight(Color::White, at(BoardId::One, 57));
        b.set_piece(knight);
        let pos = b.build().unwrap();

        let mv = Move::Simple(SimpleMove::new(knight, at(BoardId::Two, 40)));
        let next = mv.execute(&pos).unwrap();
        assert_eq!(next.piece_at(at(BoardId::One, 57)), None);
        let landed = next.piece_at(at(BoardId::Two, 40)).unwrap();
        assert_eq!(landed.kind, PieceKind::Knight);
        assert_eq!(landed.coordinate, at(BoardId::Two, 40));
        assert_eq!(next.current_color(), Color::Black);
        // The source position is untouched.
        assert_eq!(pos.piece_at(at(BoardId::One, 57)), Some(knight));
    }

    #[test]
    fn execute_in_place_keeps_origin_board() {
        let mut b = kings_only();
        let knight = Piece::knight(Color::White, at(BoardId::One, 57));
        b.set_piece(knight);
        let pos = b.build().unwrap();

        let mv = Move::Simple(SimpleMove::new(knight, at(BoardId::Two, 40)));
        let probe = mv.execute_in_place(&pos).unwrap();
        assert!(probe.piece_at(at(BoardId::One, 40)).is_some());
        assert!(probe.piece_at(at(BoardId::Two, 40)).is_none());
    }

    #[test]
    fn execute_capture_removes_victim() {
        let mut b = kings_only();
        let rook = Piece::rook(Color::White, at(BoardId::One, 32));
        let queen = Piece::queen(Color::Black, at(BoardId::One, 35));
        b.set_piece(rook).set_piece(queen);
        let pos = b.build().unwrap();

        let mv = Move::Attack(AttackMove::new(rook, at(BoardId::Two, 35), queen));
        let next = mv.execute(&pos).unwrap();
        assert_eq!(next.piece_at(at(BoardId::One, 35)), None);
        assert_eq!(
            next.piece_at(at(BoardId::Two, 35)).map(|p| p.kind),
            Some(PieceKind::Rook)
        );
        assert_eq!(next.pieces(Color::Black).len(), 1);
    }

    #[test]
    fn execute_is_deterministic() {
        let pos = Position::create_standard();
        let knight = pos.piece_at(at(BoardId::One, 57)).unwrap();
        let mv = Move::Simple(SimpleMove::new(knight, at(BoardId::Two, 40)));
        assert_eq!(mv.execute(&pos).unwrap(), mv.execute(&pos).unwrap());
    }

    #[test]
    fn display_includes_boards_and_promotion() {
        let pawn = Piece::pawn(Color::White, at(BoardId::One, 8));
        let mv = Move::Promotion(PromotionMove::Push(SimpleMove::new(
            pawn,
            at(BoardId::Two, 0),
        )));
        assert_eq!(mv.to_string(), "P1(a7)-2(a8)=Q");
    }

    #[test]
    fn transition_status_helpers() {
        assert!(MoveStatus::Done.is_done());
        assert!(!MoveStatus::IllegalMove.is_done());
        assert!(!MoveStatus::LeavesKingInCheck.is_done());
    }
}
