//! Dual-board Alice chess position.
//!
//! `Position` holds the occupancy of both boards, whose turn it is, and the
//! derived piece lists and pseudo-legal move lists for each colour. A
//! `Position` is immutable once built; every change goes through `Builder`.
//! Legality-filtered move lists are computed lazily and cached per colour.

use std::fmt;
use std::sync::OnceLock;

use crate::engine::movegen;
use crate::engine::moves::Move;
use crate::engine::player::Player;
use crate::engine::types::{BoardId, ChessError, Color, Coordinate, NUM_TILES, Piece, PieceKind};

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// What stands on a single square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Empty,
    Occupied(Piece),
}

impl Tile {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Tile::Empty)
    }

    #[inline]
    pub fn piece(&self) -> Option<Piece> {
        match self {
            Tile::Empty => None,
            Tile::Occupied(p) => Some(*p),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tile::Empty => f.pad("-"),
            Tile::Occupied(p) => f.pad(&p.to_char().to_string()),
        }
    }
}

type Tiles = [[Option<Piece>; NUM_TILES]; 2];

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Mutable staging area for a `Position`.
#[derive(Clone, Debug)]
pub struct Builder {
    tiles: Tiles,
    next_move_maker: Color,
}

impl Default for Builder {
    fn default() -> Self {
        Builder {
            tiles: [[None; NUM_TILES]; 2],
            next_move_maker: Color::Black,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `piece` on its own coordinate, replacing whatever was there.
    pub fn set_piece(&mut self, piece: Piece) -> &mut Self {
        let c = piece.coordinate;
        self.tiles[c.board.index()][c.index as usize] = Some(piece);
        self
    }

    /// Empty a square.
    pub fn clear(&mut self, coordinate: Coordinate) -> &mut Self {
        self.tiles[coordinate.board.index()][coordinate.index as usize] = None;
        self
    }

    /// Record which colour made the last move. The built position has the
    /// other colour to move.
    pub fn set_next_move_maker(&mut self, color: Color) -> &mut Self {
        self.next_move_maker = color;
        self
    }

    /// Convenience for `set_next_move_maker(!color)`.
    pub fn set_to_move(&mut self, color: Color) -> &mut Self {
        self.next_move_maker = !color;
        self
    }

    /// Build the position, deriving piece lists and pseudo-legal moves.
    ///
    /// Fails when either colour has no king or more than one.
    pub fn build(self) -> Result<Position, ChessError> {
        Position::assemble(self.tiles, !self.next_move_maker)
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// An immutable snapshot of both boards.
#[derive(Clone, Debug)]
pub struct Position {
    /// `tiles[board][index]`.
    tiles: Tiles,

    /// Whose turn it is.
    current: Color,

    /// Every piece of each colour, board one first, in index order.
    pieces: [Vec<Piece>; 2],

    kings: [Piece; 2],

    /// Pseudo-legal moves per colour, computed at construction.
    pseudo_legal: [Vec<Move>; 2],

    /// Moves per colour that survive the king-safety filter.
    legal: [OnceLock<Vec<Move>>; 2],
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.current == other.current && self.tiles == other.tiles
    }
}

impl Eq for Position {}

impl Position {
    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Standard chess arrangement, everything on board one, White to move.
    pub fn create_standard() -> Self {
        let back_rank = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut builder = Builder::new();
        for (file, kind) in back_rank.into_iter().enumerate() {
            let file = file as u8;
            builder
                .set_piece(Piece::new(kind, Color::Black, Coordinate::new(BoardId::One, file)))
                .set_piece(Piece::pawn(Color::Black, Coordinate::new(BoardId::One, 8 + file)))
                .set_piece(Piece::pawn(Color::White, Coordinate::new(BoardId::One, 48 + file)))
                .set_piece(Piece::new(kind, Color::White, Coordinate::new(BoardId::One, 56 + file)));
        }
        builder.set_next_move_maker(Color::Black);
        builder
            .build()
            .expect("standard arrangement always has both kings")
    }

    /// A builder seeded with every piece on this position and the same
    /// colour to move.
    pub fn to_builder(&self) -> Builder {
        Builder {
            tiles: self.tiles,
            next_move_maker: !self.current,
        }
    }

    fn assemble(tiles: Tiles, current: Color) -> Result<Self, ChessError> {
        let mut pieces: [Vec<Piece>; 2] = [Vec::with_capacity(16), Vec::with_capacity(16)];
        let mut kings: [Option<Piece>; 2] = [None, None];

        for board in &tiles {
            for piece in board.iter().flatten() {
                if piece.is_king() {
                    let slot = &mut kings[piece.color.index()];
                    if slot.is_some() {
                        return Err(ChessError::DuplicateKing(piece.color));
                    }
                    *slot = Some(*piece);
                }
                pieces[piece.color.index()].push(*piece);
            }
        }

        let white_king = kings[Color::White.index()].ok_or(ChessError::MissingKing(Color::White))?;
        let black_king = kings[Color::Black.index()].ok_or(ChessError::MissingKing(Color::Black))?;

        let mut position = Position {
            tiles,
            current,
            pieces,
            kings: [white_king, black_king],
            pseudo_legal: [Vec::new(), Vec::new()],
            legal: [OnceLock::new(), OnceLock::new()],
        };

        let white_moves = movegen::pseudo_legal_moves(&position, Color::White);
        let black_moves = movegen::pseudo_legal_moves(&position, Color::Black);
        position.pseudo_legal = [white_moves, black_moves];

        Ok(position)
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// O(1) square lookup.
    #[inline]
    pub fn tile(&self, coordinate: Coordinate) -> Tile {
        match self.piece_at(coordinate) {
            Some(p) => Tile::Occupied(p),
            None => Tile::Empty,
        }
    }

    #[inline]
    pub fn piece_at(&self, coordinate: Coordinate) -> Option<Piece> {
        self.tiles[coordinate.board.index()][coordinate.index as usize]
    }

    /// Empty on both boards at this square index.
    #[inline]
    pub fn is_empty_on_both(&self, coordinate: Coordinate) -> bool {
        self.piece_at(coordinate).is_none() && self.piece_at(coordinate.flip()).is_none()
    }

    /// The colour whose turn it is.
    #[inline]
    pub fn current_color(&self) -> Color {
        self.current
    }

    /// The colour that made the last move.
    #[inline]
    pub fn next_move_maker(&self) -> Color {
        !self.current
    }

    pub fn current_player(&self) -> Player<'_> {
        Player::new(self, self.current)
    }

    pub fn player(&self, color: Color) -> Player<'_> {
        Player::new(self, color)
    }

    pub fn pieces(&self, color: Color) -> &[Piece] {
        &self.pieces[color.index()]
    }

    pub fn king(&self, color: Color) -> Piece {
        self.kings[color.index()]
    }

    pub fn pseudo_legal_moves(&self, color: Color) -> &[Move] {
        &self.pseudo_legal[color.index()]
    }

    /// Pseudo-legal moves that do not leave `color`'s king in check.
    pub fn legal_moves(&self, color: Color) -> &[Move] {
        self.legal[color.index()].get_or_init(|| self.player(color).filter_legal_moves())
    }

    /// White's legal moves followed by Black's.
    pub fn all_legal_moves(&self) -> Vec<Move> {
        let mut all = self.legal_moves(Color::White).to_vec();
        all.extend_from_slice(self.legal_moves(Color::Black));
        all
    }

    // -----------------------------------------------------------------------
    // Board display
    // -----------------------------------------------------------------------

    /// Both boards side by side, rank 8 at the top.
    pub fn board_string(&self) -> String {
        let mut s = String::with_capacity(700);
        for row in 0..8u8 {
            let mut line = format!("{}: ", 8 - row);
            for board in BoardId::ALL {
                if board == BoardId::Two {
                    line.push_str("| ");
                }
                for file in 0..8u8 {
                    let tile = self.tile(Coordinate::new(board, row * 8 + file));
                    line.push_str(&format!("{tile:<3}"));
                }
            }
            s.push_str(line.trim_end());
            s.push('\n');
        }
        s.push_str("   a  b  c  d  e  f  g  h  | a  b  c  d  e  f  g  h");
        s
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.board_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
