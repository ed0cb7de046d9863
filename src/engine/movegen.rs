//! Pseudo-legal move generation for Alice chess.
//!
//! Every move is computed from the piece's square flipped onto the other
//! board. A landing square must be empty on the arrival board; the same
//! square on the origin board then decides between a quiet move, a capture,
//! or no move at all. King safety is handled later by `Player`.

use crate::engine::board::Position;
use crate::engine::moves::{AttackMove, Move, PromotionMove, SimpleMove};
use crate::engine::types::{Color, Coordinate, Piece, PieceKind};

// =========================================================================
// Public API
// =========================================================================

/// Legal moves for the side to move.
pub fn legal_moves(pos: &Position) -> Vec<Move> {
    pos.current_player().legal_moves().to_vec()
}

/// Legal moves for the side to move that start on `from`.
pub fn legal_moves_from(pos: &Position, from: Coordinate) -> Vec<Move> {
    pos.current_player()
        .legal_moves()
        .iter()
        .filter(|m| m.source() == from)
        .copied()
        .collect()
}

/// Pseudo-legal moves for every piece of `color`, in piece-list order.
pub fn pseudo_legal_moves(pos: &Position, color: Color) -> Vec<Move> {
    let mut moves = Vec::with_capacity(64);
    for piece in pos.pieces(color) {
        piece_moves(pos, piece, &mut moves);
    }
    moves
}

/// Pseudo-legal moves for one piece.
pub fn piece_moves(pos: &Position, piece: &Piece, moves: &mut Vec<Move>) {
    match piece.kind {
        PieceKind::King => step(pos, piece, &KING_QUEEN_OFFSETS, &KING_QUEEN_GUARD, moves),
        PieceKind::Queen => slide(pos, piece, &KING_QUEEN_OFFSETS, &KING_QUEEN_GUARD, moves),
        PieceKind::Rook => slide(pos, piece, &ROOK_OFFSETS, &ROOK_GUARD, moves),
        PieceKind::Bishop => slide(pos, piece, &BISHOP_OFFSETS, &BISHOP_GUARD, moves),
        PieceKind::Knight => step(pos, piece, &KNIGHT_OFFSETS, &KNIGHT_GUARD, moves),
        PieceKind::Pawn { has_moved } => pawn_moves(pos, piece, has_moved, moves),
    }
}

// =========================================================================
// Offset and edge-guard tables
// =========================================================================

const KING_QUEEN_OFFSETS: [i8; 8] = [-9, -8, -7, -1, 1, 7, 8, 9];
const BISHOP_OFFSETS: [i8; 4] = [-9, -7, 7, 9];
const ROOK_OFFSETS: [i8; 4] = [-8, -1, 1, 8];
const KNIGHT_OFFSETS: [i8; 8] = [-17, -15, -10, -6, 6, 10, 15, 17];

/// Offsets that would wrap around a board edge, by file of the square the
/// step is taken from.
struct EdgeGuard {
    first_file: &'static [i8],
    second_file: &'static [i8],
    seventh_file: &'static [i8],
    eighth_file: &'static [i8],
}

impl EdgeGuard {
    fn wraps(&self, file: u8, offset: i8) -> bool {
        let excluded = match file {
            0 => self.first_file,
            1 => self.second_file,
            6 => self.seventh_file,
            7 => self.eighth_file,
            _ => return false,
        };
        excluded.contains(&offset)
    }
}

const KING_QUEEN_GUARD: EdgeGuard = EdgeGuard {
    first_file: &[-9, -1, 7],
    second_file: &[],
    seventh_file: &[],
    eighth_file: &[-7, 1, 9],
};

const ROOK_GUARD: EdgeGuard = EdgeGuard {
    first_file: &[-1],
    second_file: &[],
    seventh_file: &[],
    eighth_file: &[1],
};

const BISHOP_GUARD: EdgeGuard = EdgeGuard {
    first_file: &[-9, 7],
    second_file: &[],
    seventh_file: &[],
    eighth_file: &[-7, 9],
};

const KNIGHT_GUARD: EdgeGuard = EdgeGuard {
    first_file: &[-17, -10, 6, 15],
    second_file: &[-10, 6],
    seventh_file: &[-6, 10],
    eighth_file: &[-15, -6, 10, 17],
};

// =========================================================================
// Landing classification
// =========================================================================

enum Landing {
    Quiet,
    Capture(Piece),
    Blocked,
}

/// `destination` lies on the arrival board; `destination.flip()` is the
/// same square on the mover's own board.
fn classify(pos: &Position, mover: &Piece, destination: Coordinate) -> Landing {
    if pos.piece_at(destination).is_some() {
        return Landing::Blocked;
    }
    match pos.piece_at(destination.flip()) {
        None => Landing::Quiet,
        Some(other) if other.color != mover.color => Landing::Capture(other),
        Some(_) => Landing::Blocked,
    }
}

// =========================================================================
// Stepping pieces (king, knight)
// =========================================================================

fn step(
    pos: &Position,
    piece: &Piece,
    offsets: &[i8],
    guard: &EdgeGuard,
    moves: &mut Vec<Move>,
) {
    let origin = piece.coordinate.flip();
    for &offset in offsets {
        if guard.wraps(origin.file(), offset) {
            continue;
        }
        let Some(dest) = origin.offset(offset) else {
            continue;
        };
        match classify(pos, piece, dest) {
            Landing::Quiet => moves.push(Move::Simple(SimpleMove::new(*piece, dest))),
            Landing::Capture(victim) => {
                moves.push(Move::Attack(AttackMove::new(*piece, dest, victim)))
            }
            Landing::Blocked => {}
        }
    }
}

// =========================================================================
// Sliding pieces (queen, rook, bishop)
// =========================================================================

fn slide(
    pos: &Position,
    piece: &Piece,
    offsets: &[i8],
    guard: &EdgeGuard,
    moves: &mut Vec<Move>,
) {
    for &offset in offsets {
        let mut cursor = piece.coordinate.flip();
        loop {
            if guard.wraps(cursor.file(), offset) {
                break;
            }
            let Some(dest) = cursor.offset(offset) else {
                break;
            };
            match classify(pos, piece, dest) {
                Landing::Quiet => {
                    moves.push(Move::Simple(SimpleMove::new(*piece, dest)));
                    cursor = dest;
                }
                Landing::Capture(victim) => {
                    moves.push(Move::Attack(AttackMove::new(*piece, dest, victim)));
                    break;
                }
                Landing::Blocked => break,
            }
        }
    }
}

// =========================================================================
// Pawns
// =========================================================================

fn is_promotion_square(color: Color, index: u8) -> bool {
    match color {
        Color::White => index < 8,
        Color::Black => index >= 56,
    }
}

fn on_start_row(color: Color, index: u8) -> bool {
    match color {
        Color::White => (48..=55).contains(&index),
        Color::Black => (8..=15).contains(&index),
    }
}

/// Whether a diagonal step of `offset` (7 or 9, before applying direction)
/// would wrap around the board edge.
fn pawn_capture_wraps(color: Color, file: u8, offset: i8) -> bool {
    match (color, offset) {
        (Color::White, 7) | (Color::Black, 9) => file == 7,
        (Color::White, 9) | (Color::Black, 7) => file == 0,
        _ => false,
    }
}

fn pawn_moves(pos: &Position, piece: &Piece, has_moved: bool, moves: &mut Vec<Move>) {
    let color = piece.color;
    let dir = color.pawn_direction();
    let origin = piece.coordinate.flip();

    // Pushes need the square free on both boards.
    if let Some(one) = origin.offset(8 * dir)
        && pos.is_empty_on_both(one)
    {
        let push = SimpleMove::new(*piece, one);
        if is_promotion_square(color, one.index) {
            moves.push(Move::Promotion(PromotionMove::Push(push)));
        } else {
            moves.push(Move::Simple(push));
        }

        if !has_moved
            && on_start_row(color, piece.coordinate.index)
            && let Some(two) = origin.offset(16 * dir)
            && pos.is_empty_on_both(two)
        {
            moves.push(Move::Simple(SimpleMove::new(*piece, two)));
        }
    }

    for offset in [7i8, 9] {
        if pawn_capture_wraps(color, origin.file(), offset) {
            continue;
        }
        let Some(dest) = origin.offset(offset * dir) else {
            continue;
        };
        if let Landing::Capture(victim) = classify(pos, piece, dest) {
            let attack = AttackMove::new(*piece, dest, victim);
            if is_promotion_square(color, dest.index) {
                moves.push(Move::Promotion(PromotionMove::Capture(attack)));
            } else {
                moves.push(Move::Attack(attack));
            }
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
