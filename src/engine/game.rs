//! Stateful game controller wrapping Position.
//!
//! `Game` owns the authoritative position, the move history and an undo
//! stack, and classifies the side to move as active, in check, mated or
//! stalemated. It is also where announced moves from a referee are matched
//! against the legal move list.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::engine::board::Position;
use crate::engine::moves::Move;
use crate::engine::types::{
    BoardId, ChessError, Color, Coordinate, GameStatus, algebraic_to_index,
};

// =========================================================================
// Announcement
// =========================================================================

/// Outbound description of a move: who moved what, from which board and
/// square, to which square (on the other board).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Announcement {
    pub color: Color,
    pub piece: char,
    pub board: u8,
    pub source: String,
    pub destination: String,
}

impl Announcement {
    pub fn for_move(mv: &Move) -> Self {
        let piece = mv.piece();
        Announcement {
            color: piece.color,
            piece: piece.kind.symbol(),
            board: piece.coordinate.board.number(),
            source: piece.coordinate.to_algebraic(),
            destination: mv.destination().to_algebraic(),
        }
    }
}

impl fmt::Display for Announcement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} moves {} from {} {} to {}",
            self.color, self.piece, self.board, self.source, self.destination
        )
    }
}

/// Find the side to move's legal move matching an announcement and play it.
///
/// `piece` is matched case-insensitively against the piece letter; the
/// destination is taken to be on the board opposite `board`.
pub fn apply_announced_move(
    position: &Position,
    piece: char,
    board: BoardId,
    source: &str,
    destination: &str,
) -> Result<Position, ChessError> {
    let mv = find_announced_move(position, piece, board, source, destination)?;
    let transition = position.current_player().make_move(&mv);
    if !transition.status.is_done() {
        return Err(ChessError::IllegalMove(format!(
            "{mv}: {:?}",
            transition.status
        )));
    }
    Ok(transition.into_position())
}

fn find_announced_move(
    position: &Position,
    piece: char,
    board: BoardId,
    source: &str,
    destination: &str,
) -> Result<Move, ChessError> {
    let from = algebraic_to_index(source)
        .ok_or_else(|| ChessError::InvalidSquare(source.to_string()))?;
    let to = algebraic_to_index(destination)
        .ok_or_else(|| ChessError::InvalidSquare(destination.to_string()))?;
    let from = Coordinate::new(board, from);
    let to = Coordinate::new(board.other(), to);
    let symbol = piece.to_ascii_uppercase();

    position
        .current_player()
        .legal_moves()
        .iter()
        .find(|m| m.piece().kind.symbol() == symbol && m.source() == from && m.destination() == to)
        .copied()
        .ok_or_else(|| ChessError::MoveNotFound {
            piece: symbol,
            board,
            from: source.to_string(),
            to: destination.to_string(),
        })
}

// =========================================================================
// MoveRecord
// =========================================================================

/// A recorded move in the game history.
#[derive(Clone, Debug)]
pub struct MoveRecord {
    /// The move that was played.
    pub mv: Move,
    /// How the move was announced.
    pub announcement: Announcement,
    /// What game status resulted from this move.
    pub status_after: GameStatus,
}

// =========================================================================
// Game
// =========================================================================

/// An Alice chess game with history, undo, and status tracking.
#[derive(Clone, Debug)]
pub struct Game {
    position: Position,
    move_history: Vec<MoveRecord>,
    /// Positions before each played move, most recent last.
    previous_positions: Vec<Position>,

    status: GameStatus,

    // Metadata
    pub id: String,
    pub created_at: DateTime<Utc>,
}

impl Game {
    // -----------------------------------------------------------------
    // Constructors
    // -----------------------------------------------------------------

    /// Create a new game from the standard starting position.
    pub fn new() -> Self {
        Self::from_position(Position::create_standard())
    }

    /// Start a game from an arbitrary position.
    pub fn from_position(position: Position) -> Self {
        let mut game = Self {
            position,
            move_history: Vec::new(),
            previous_positions: Vec::new(),
            status: GameStatus::Active,
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
        };
        game.status = game.compute_status();
        game
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    /// Current board position.
    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Current game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Side to move.
    pub fn side_to_move(&self) -> Color {
        self.position.current_color()
    }

    /// Completed move history.
    pub fn move_history(&self) -> &[MoveRecord] {
        &self.move_history
    }

    /// All legal moves in the current position.
    pub fn legal_moves(&self) -> Vec<Move> {
        self.position.current_player().legal_moves().to_vec()
    }

    /// Legal moves from a specific square.
    pub fn legal_moves_from(&self, from: Coordinate) -> Vec<Move> {
        crate::engine::movegen::legal_moves_from(&self.position, from)
    }

    /// Whether the game is over.
    pub fn is_game_over(&self) -> bool {
        self.status.is_game_over()
    }

    // -----------------------------------------------------------------
    // Make move
    // -----------------------------------------------------------------

    /// Play a move and return its announcement.
    ///
    /// Returns `ChessError::GameOver` if the game is already finished, or
    /// `ChessError::IllegalMove` if the move is not legal here.
    pub fn make_move(&mut self, mv: Move) -> Result<Announcement, ChessError> {
        if self.status.is_game_over() {
            return Err(ChessError::GameOver(self.status.to_string()));
        }

        let transition = self.position.current_player().make_move(&mv);
        if !transition.status.is_done() {
            return Err(ChessError::IllegalMove(format!(
                "{mv}: {:?}",
                transition.status
            )));
        }
        let next = transition.into_position();

        let announcement = Announcement::for_move(&mv);
        let previous = std::mem::replace(&mut self.position, next);
        self.previous_positions.push(previous);
        self.status = self.compute_status();

        info!(game = %self.id, %announcement, status = %self.status, "move played");

        self.move_history.push(MoveRecord {
            mv,
            announcement: announcement.clone(),
            status_after: self.status,
        });

        Ok(announcement)
    }

    /// Play a move described by an inbound announcement.
    pub fn apply_announced(
        &mut self,
        piece: char,
        board: BoardId,
        source: &str,
        destination: &str,
    ) -> Result<Announcement, ChessError> {
        let mv = find_announced_move(&self.position, piece, board, source, destination)?;
        self.make_move(mv)
    }

    // -----------------------------------------------------------------
    // Undo move
    // -----------------------------------------------------------------

    /// Undo the last move. Returns the move that was undone.
    pub fn undo_move(&mut self) -> Result<Move, ChessError> {
        let previous = self
            .previous_positions
            .pop()
            .ok_or(ChessError::NothingToUndo)?;
        let record = self.move_history.pop().ok_or(ChessError::NothingToUndo)?;
        self.position = previous;
        self.status = self.compute_status();
        Ok(record.mv)
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        let player = self.position.current_player();
        let in_check = player.is_in_check();

        if player.legal_moves().is_empty() {
            if in_check {
                GameStatus::Checkmate
            } else {
                GameStatus::Stalemate
            }
        } else if in_check {
            GameStatus::Check
        } else {
            GameStatus::Active
        }
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::types::{Piece, PieceKind};

    fn at(board: BoardId, index: u8) -> Coordinate {
        Coordinate::new(board, index)
    }

    fn play(g: &mut Game, piece: char, board: BoardId, from: &str, to: &str) {
        g.apply_announced(piece, board, from, to).unwrap();
    }

    // -----------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------

    #[test]
    fn new_game_is_active() {
        let g = Game::new();
        assert_eq!(g.status(), GameStatus::Active);
        assert!(!g.is_game_over());
        assert_eq!(g.side_to_move(), Color::White);
        assert_eq!(g.legal_moves().len(), 20);
        assert!(!g.id.is_empty());
    }

    #[test]
    fn from_checkmated_position() {
        let mut b = Position::builder();
        b.set_piece(Piece::king(Color::Black, at(BoardId::One, 0)))
            .set_piece(Piece::rook(Color::White, at(BoardId::One, 7)))
            .set_piece(Piece::knight(Color::White, at(BoardId::Two, 8)))
            .set_piece(Piece::knight(Color::White, at(BoardId::Two, 9)))
            .set_piece(Piece::king(Color::White, at(BoardId::One, 60)))
            .set_to_move(Color::Black);
        let g = Game::from_position(b.build().unwrap());
        assert_eq!(g.status(), GameStatus::Checkmate);
        assert!(g.is_game_over());
    }

    // -----------------------------------------------------------------
    // Making moves
    // -----------------------------------------------------------------

    #[test]
    fn make_move_knight_to_board_two() {
        let mut g = Game::new();
        let mv = g
            .legal_moves_from(at(BoardId::One, 57))
            .into_iter()
            .find(|m| m.destination() == at(BoardId::Two, 40))
            .unwrap();
        let announcement = g.make_move(mv).unwrap();
        assert_eq!(announcement.to_string(), "white moves N from 1 b1 to a3");
        assert_eq!(g.side_to_move(), Color::Black);
        assert_eq!(g.move_history().len(), 1);
        assert_eq!(g.move_history()[0].status_after, GameStatus::Active);
    }

    #[test]
    fn make_illegal_move_errors() {
        let mut g = Game::new();
        let rook = g.position().piece_at(at(BoardId::One, 56)).unwrap();
        let mv = Move::Simple(crate::engine::moves::SimpleMove::new(
            rook,
            at(BoardId::Two, 40),
        ));
        assert!(matches!(g.make_move(mv), Err(ChessError::IllegalMove(_))));
        assert_eq!(g.move_history().len(), 0);
    }

    #[test]
    fn make_move_on_finished_game_errors() {
        let mut b = Position::builder();
        b.set_piece(Piece::king(Color::Black, at(BoardId::One, 0)))
            .set_piece(Piece::knight(Color::White, at(BoardId::Two, 8)))
            .set_piece(Piece::knight(Color::White, at(BoardId::Two, 9)))
            .set_piece(Piece::bishop(Color::White, at(BoardId::Two, 1)))
            .set_piece(Piece::king(Color::White, at(BoardId::One, 63)))
            .set_to_move(Color::Black);
        let mut g = Game::from_position(b.build().unwrap());
        assert_eq!(g.status(), GameStatus::Stalemate);

        let king = g.position().king(Color::Black);
        let mv = Move::Simple(crate::engine::moves::SimpleMove::new(
            king,
            at(BoardId::Two, 1),
        ));
        assert!(matches!(g.make_move(mv), Err(ChessError::GameOver(_))));
    }

    // -----------------------------------------------------------------
    // Announced moves
    // -----------------------------------------------------------------

    #[test]
    fn announced_pawn_double_push() {
        let mut g = Game::new();
        play(&mut g, 'P', BoardId::One, "e2", "e4");
        let pawn = g.position().piece_at(at(BoardId::Two, 36)).unwrap();
        assert_eq!(pawn.kind, PieceKind::Pawn { has_moved: true });
        assert!(g.position().piece_at(at(BoardId::One, 52)).is_none());
    }

    #[test]
    fn announced_piece_letter_is_case_insensitive() {
        let pos = Position::create_standard();
        let next = apply_announced_move(&pos, 'n', BoardId::One, "g1", "f3").unwrap();
        assert_eq!(
            next.piece_at(at(BoardId::Two, 45)).map(|p| p.kind),
            Some(PieceKind::Knight)
        );
    }

    #[test]
    fn announced_move_not_found() {
        let pos = Position::create_standard();
        let err = apply_announced_move(&pos, 'N', BoardId::One, "b1", "b3").unwrap_err();
        assert!(matches!(err, ChessError::MoveNotFound { .. }));
        // Right squares, wrong board.
        let err = apply_announced_move(&pos, 'N', BoardId::Two, "b1", "a3").unwrap_err();
        assert!(matches!(err, ChessError::MoveNotFound { .. }));
    }

    #[test]
    fn announced_move_bad_square() {
        let pos = Position::create_standard();
        let err = apply_announced_move(&pos, 'P', BoardId::One, "e9", "e4").unwrap_err();
        assert!(matches!(err, ChessError::InvalidSquare(s) if s == "e9"));
    }

    #[test]
    fn announcement_serializes() {
        let pos = Position::create_standard();
        let mv = crate::engine::movegen::legal_moves_from(&pos, at(BoardId::One, 57))
            .into_iter()
            .find(|m| m.destination().index == 40)
            .unwrap();
        let json = serde_json::to_value(Announcement::for_move(&mv)).unwrap();
        assert_eq!(json["color"], "white");
        assert_eq!(json["piece"], "N");
        assert_eq!(json["board"], 1);
        assert_eq!(json["source"], "b1");
        assert_eq!(json["destination"], "a3");
    }

    // -----------------------------------------------------------------
    // Undo
    // -----------------------------------------------------------------

    #[test]
    fn undo_single_move() {
        let mut g = Game::new();
        let original = g.position().clone();
        play(&mut g, 'P', BoardId::One, "e2", "e4");
        let undone = g.undo_move().unwrap();
        assert_eq!(undone.source(), at(BoardId::One, 52));
        assert_eq!(*g.position(), original);
        assert_eq!(g.move_history().len(), 0);
        assert_eq!(g.side_to_move(), Color::White);
    }

    #[test]
    fn undo_nothing_errors() {
        let mut g = Game::new();
        assert!(matches!(g.undo_move(), Err(ChessError::NothingToUndo)));
    }

    // -----------------------------------------------------------------
    // Status detection
    // -----------------------------------------------------------------

    #[test]
    fn check_status_after_move() {
        // The rook lands on a4 of board one and eyes the king up the a-file.
        let mut b = Position::builder();
        b.set_piece(Piece::king(Color::White, at(BoardId::One, 63)))
            .set_piece(Piece::king(Color::Black, at(BoardId::One, 0)))
            .set_piece(Piece::rook(Color::White, at(BoardId::Two, 33)))
            .set_to_move(Color::White);
        let mut g = Game::from_position(b.build().unwrap());
        g.apply_announced('R', BoardId::Two, "b4", "a4").unwrap();
        assert_eq!(g.status(), GameStatus::Check);
        assert_eq!(g.move_history()[0].status_after, GameStatus::Check);
    }
}
