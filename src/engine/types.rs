use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Index for array lookups: White=0, Black=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Index step a pawn of this colour takes to move forward one rank.
    #[inline]
    pub const fn pawn_direction(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// BoardId
// ---------------------------------------------------------------------------

/// Which of the two Alice boards a square lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoardId {
    One,
    Two,
}

impl BoardId {
    pub const ALL: [BoardId; 2] = [BoardId::One, BoardId::Two];

    /// Index for array lookups: One=0, Two=1.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The board a piece relocates to when it finishes a move.
    #[inline]
    pub const fn other(self) -> BoardId {
        match self {
            BoardId::One => BoardId::Two,
            BoardId::Two => BoardId::One,
        }
    }

    /// Human board number (1 or 2).
    #[inline]
    pub const fn number(self) -> u8 {
        match self {
            BoardId::One => 1,
            BoardId::Two => 2,
        }
    }

    pub fn from_number(n: u8) -> Option<BoardId> {
        match n {
            1 => Some(BoardId::One),
            2 => Some(BoardId::Two),
            _ => None,
        }
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// Coordinate
// ---------------------------------------------------------------------------

/// Number of squares on one board.
pub const NUM_TILES: usize = 64;

/// Squares per rank.
pub const TILES_PER_ROW: u8 = 8;

/// A square on one of the two boards.
///
/// Square indices run top-down: a8 = 0, b8 = 1, … h8 = 7, a7 = 8, … h1 = 63.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub board: BoardId,
    pub index: u8,
}

impl Coordinate {
    #[inline]
    pub fn new(board: BoardId, index: u8) -> Self {
        debug_assert!(
            (index as usize) < NUM_TILES,
            "square index out of range: {index}"
        );
        Coordinate { board, index }
    }

    /// Parse algebraic notation like "e2" onto the given board.
    pub fn from_algebraic(board: BoardId, s: &str) -> Option<Self> {
        algebraic_to_index(s).map(|index| Coordinate { board, index })
    }

    /// 0-based file: a=0 … h=7.
    #[inline]
    pub fn file(self) -> u8 {
        self.index % TILES_PER_ROW
    }

    /// 0-based row from the top of the board: rank 8 = 0 … rank 1 = 7.
    #[inline]
    pub fn row(self) -> u8 {
        self.index / TILES_PER_ROW
    }

    /// Chess rank, 1..=8.
    #[inline]
    pub fn rank(self) -> u8 {
        TILES_PER_ROW - self.row()
    }

    /// The same square on the other board.
    #[inline]
    pub fn flip(self) -> Self {
        Coordinate {
            board: self.board.other(),
            index: self.index,
        }
    }

    /// Shift the square index by `delta` on the same board, or `None` when
    /// the result falls off the top or bottom edge. File wrap-around is not
    /// detected here; generators guard against it per offset.
    #[inline]
    pub fn offset(self, delta: i8) -> Option<Self> {
        let target = self.index as i16 + delta as i16;
        if (0..NUM_TILES as i16).contains(&target) {
            Some(Coordinate {
                board: self.board,
                index: target as u8,
            })
        } else {
            None
        }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        (self.index as usize) < NUM_TILES
    }

    pub fn to_algebraic(self) -> String {
        index_to_algebraic(self.index)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.board, self.to_algebraic())
    }
}

/// Convert "e2"-style notation to a square index (a8 = 0, h1 = 63).
pub fn algebraic_to_index(s: &str) -> Option<u8> {
    let bytes = s.as_bytes();
    if bytes.len() != 2 {
        return None;
    }
    let file = bytes[0].wrapping_sub(b'a');
    let rank = bytes[1].wrapping_sub(b'1');
    if file < 8 && rank < 8 {
        Some(file + (7 - rank) * TILES_PER_ROW)
    } else {
        None
    }
}

/// Convert a square index back to algebraic notation.
pub fn index_to_algebraic(index: u8) -> String {
    debug_assert!((index as usize) < NUM_TILES);
    let file = (b'a' + index % TILES_PER_ROW) as char;
    let rank = TILES_PER_ROW - index / TILES_PER_ROW;
    format!("{file}{rank}")
}

// ---------------------------------------------------------------------------
// Piece-square tables (White's point of view, index 0 = a8)
// ---------------------------------------------------------------------------

#[rustfmt::skip]
const KING_TABLE: [i32; 64] = [
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -30,-40,-40,-50,-50,-40,-40,-30,
    -20,-30,-30,-40,-40,-30,-30,-20,
    -10,-20,-20,-20,-20,-20,-20,-10,
     20, 20,  0,  0,  0,  0, 20, 20,
     20, 30, 10,  0,  0, 10, 30, 20,
];

#[rustfmt::skip]
const QUEEN_TABLE: [i32; 64] = [
    -20,-10,-10, -5, -5,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5,  5,  5,  5,  0,-10,
     -5,  0,  5,  5,  5,  5,  0, -5,
      0,  0,  5,  5,  5,  5,  0, -5,
    -10,  5,  5,  5,  5,  5,  0,-10,
    -10,  0,  5,  0,  0,  0,  0,-10,
    -20,-10,-10, -5, -5,-10,-10,-20,
];

#[rustfmt::skip]
const ROOK_TABLE: [i32; 64] = [
      0,  0,  0,  0,  0,  0,  0,  0,
      5, 10, 10, 10, 10, 10, 10,  5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
     -5,  0,  0,  0,  0,  0,  0, -5,
      0,  0,  0,  5,  5,  0,  0,  0,
];

#[rustfmt::skip]
const BISHOP_TABLE: [i32; 64] = [
    -20,-10,-10,-10,-10,-10,-10,-20,
    -10,  0,  0,  0,  0,  0,  0,-10,
    -10,  0,  5, 10, 10,  5,  0,-10,
    -10,  5,  5, 10, 10,  5,  5,-10,
    -10,  0, 10, 10, 10, 10,  0,-10,
    -10, 10, 10, 10, 10, 10, 10,-10,
    -10,  5,  0,  0,  0,  0,  5,-10,
    -20,-10,-10,-10,-10,-10,-10,-20,
];

#[rustfmt::skip]
const KNIGHT_TABLE: [i32; 64] = [
    -50,-40,-30,-30,-30,-30,-40,-50,
    -40,-20,  0,  0,  0,  0,-20,-40,
    -30,  0, 10, 15, 15, 10,  0,-30,
    -30,  5, 15, 20, 20, 15,  5,-30,
    -30,  0, 15, 20, 20, 15,  0,-30,
    -30,  5, 10, 15, 15, 10,  5,-30,
    -40,-20,  0,  5,  5,  0,-20,-40,
    -50,-40,-30,-30,-30,-30,-40,-50,
];

#[rustfmt::skip]
const PAWN_TABLE: [i32; 64] = [
     60, 60, 60, 60, 60, 60, 60, 60,
     50, 50, 50, 50, 50, 50, 50, 50,
     10, 10, 20, 30, 30, 20, 10, 10,
      5,  5, 10, 25, 25, 10,  5,  5,
      0,  0,  0, 20, 20,  0,  0,  0,
      5, -5,-10,  0,  0,-10, -5,  5,
      5, 10, 10,-20,-20, 10, 10,  5,
      0,  0,  0,  0,  0,  0,  0,  0,
];

// ---------------------------------------------------------------------------
// PieceKind
// ---------------------------------------------------------------------------

/// The six piece kinds. Pawns remember whether they have moved, which gates
/// the two-square advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn { has_moved: bool },
}

impl PieceKind {
    /// Uppercase letter used in board dumps and move announcements.
    pub fn symbol(self) -> char {
        match self {
            PieceKind::King => 'K',
            PieceKind::Queen => 'Q',
            PieceKind::Rook => 'R',
            PieceKind::Bishop => 'B',
            PieceKind::Knight => 'N',
            PieceKind::Pawn { .. } => 'P',
        }
    }

    /// Intrinsic value of the piece kind, before the square bonus.
    pub fn base_value(self) -> i32 {
        match self {
            PieceKind::King => 200,
            PieceKind::Queen => 90,
            PieceKind::Rook => 50,
            PieceKind::Bishop => 33,
            PieceKind::Knight => 32,
            PieceKind::Pawn { .. } => 10,
        }
    }

    fn square_table(self) -> &'static [i32; 64] {
        match self {
            PieceKind::King => &KING_TABLE,
            PieceKind::Queen => &QUEEN_TABLE,
            PieceKind::Rook => &ROOK_TABLE,
            PieceKind::Bishop => &BISHOP_TABLE,
            PieceKind::Knight => &KNIGHT_TABLE,
            PieceKind::Pawn { .. } => &PAWN_TABLE,
        }
    }

    /// Square-table bonus for a piece of this kind and colour on `index`.
    /// Black reads the table back to front.
    pub fn square_value(self, color: Color, index: u8) -> i32 {
        let lookup = match color {
            Color::White => index as usize,
            Color::Black => NUM_TILES - 1 - index as usize,
        };
        self.square_table()[lookup]
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceKind::King => write!(f, "king"),
            PieceKind::Queen => write!(f, "queen"),
            PieceKind::Rook => write!(f, "rook"),
            PieceKind::Bishop => write!(f, "bishop"),
            PieceKind::Knight => write!(f, "knight"),
            PieceKind::Pawn { .. } => write!(f, "pawn"),
        }
    }
}

// ---------------------------------------------------------------------------
// Piece
// ---------------------------------------------------------------------------

/// A piece standing on a particular square. Pieces are values: moving one
/// yields a new `Piece`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    pub coordinate: Coordinate,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color, coordinate: Coordinate) -> Self {
        Piece {
            kind,
            color,
            coordinate,
        }
    }

    pub fn king(color: Color, coordinate: Coordinate) -> Self {
        Self::new(PieceKind::King, color, coordinate)
    }

    pub fn queen(color: Color, coordinate: Coordinate) -> Self {
        Self::new(PieceKind::Queen, color, coordinate)
    }

    pub fn rook(color: Color, coordinate: Coordinate) -> Self {
        Self::new(PieceKind::Rook, color, coordinate)
    }

    pub fn bishop(color: Color, coordinate: Coordinate) -> Self {
        Self::new(PieceKind::Bishop, color, coordinate)
    }

    pub fn knight(color: Color, coordinate: Coordinate) -> Self {
        Self::new(PieceKind::Knight, color, coordinate)
    }

    /// A pawn that has not moved yet.
    pub fn pawn(color: Color, coordinate: Coordinate) -> Self {
        Self::new(PieceKind::Pawn { has_moved: false }, color, coordinate)
    }

    #[inline]
    pub fn is_king(&self) -> bool {
        self.kind == PieceKind::King
    }

    #[inline]
    pub fn is_pawn(&self) -> bool {
        matches!(self.kind, PieceKind::Pawn { .. })
    }

    /// Board letter: uppercase for White, lowercase for Black.
    pub fn to_char(&self) -> char {
        let c = self.kind.symbol();
        match self.color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Square-table bonus at the piece's current square.
    pub fn square_value(&self) -> i32 {
        self.kind.square_value(self.color, self.coordinate.index)
    }

    /// Base value plus square bonus.
    pub fn material_value(&self) -> i32 {
        self.kind.base_value() + self.square_value()
    }

    /// The same piece after relocating to `destination`.
    pub fn moved_to(&self, destination: Coordinate) -> Piece {
        let kind = match self.kind {
            PieceKind::Pawn { .. } => PieceKind::Pawn { has_moved: true },
            other => other,
        };
        Piece::new(kind, self.color, destination)
    }

    /// The queen a pawn becomes when it promotes on `destination`.
    pub fn promoted_at(&self, destination: Coordinate) -> Piece {
        Piece::queen(self.color, destination)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

// ---------------------------------------------------------------------------
// GameStatus
// ---------------------------------------------------------------------------

/// Status of the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn as_str(&self) -> &str {
        match self {
            GameStatus::Active => "active",
            GameStatus::Check => "check",
            GameStatus::Checkmate => "checkmate",
            GameStatus::Stalemate => "stalemate",
        }
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the engine.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("position has no {0} king")]
    MissingKing(Color),

    #[error("position has more than one {0} king")]
    DuplicateKing(Color),

    #[error("invalid square notation: {0}")]
    InvalidSquare(String),

    #[error("no legal move {piece} from {board} {from} to {to}")]
    MoveNotFound {
        piece: char,
        board: BoardId,
        from: String,
        to: String,
    },

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("no move available for {0}")]
    NoMoveAvailable(Color),

    #[error("game is already over: {0}")]
    GameOver(String),

    #[error("no moves to undo")]
    NothingToUndo,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
