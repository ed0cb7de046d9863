//! End-to-end scenarios: opening relocation, cross-board blocking,
//! promotion, mate and stalemate handling, and engine behaviour.

use alice_chess::ai::{AiEngine, MinimaxAi, RandomAi, SearchAlgorithm, SearchConfig};
use alice_chess::engine::{
    BoardId, ChessError, Color, Coordinate, Game, GameStatus, Move, MoveStatus, Piece, PieceKind,
    Position, PromotionMove, apply_announced_move,
};

fn at(board: BoardId, index: u8) -> Coordinate {
    Coordinate::new(board, index)
}

fn sq(board: BoardId, name: &str) -> Coordinate {
    Coordinate::from_algebraic(board, name).unwrap()
}

fn build(pieces: &[Piece], to_move: Color) -> Position {
    let mut b = Position::builder();
    for p in pieces {
        b.set_piece(*p);
    }
    b.set_to_move(to_move);
    b.build().unwrap()
}

// =====================================================================
// Opening knight move
// =====================================================================

#[test]
fn knight_b1_relocates_to_a3_on_board_two() {
    let pos = Position::create_standard();
    let white = pos.current_player();
    assert_eq!(white.color(), Color::White);

    let mv = white
        .legal_moves()
        .iter()
        .find(|m| m.source() == sq(BoardId::One, "b1") && m.destination() == sq(BoardId::Two, "a3"))
        .copied()
        .expect("Nb1-a3 should be legal");

    let t = white.make_move(&mv);
    assert_eq!(t.status, MoveStatus::Done);
    let next = t.into_position();
    assert!(next.tile(sq(BoardId::One, "b1")).is_empty());
    let knight = next.piece_at(at(BoardId::Two, 40)).unwrap();
    assert_eq!(knight.kind, PieceKind::Knight);
    assert_eq!(knight.color, Color::White);
}

#[test]
fn announced_reply_sequence() {
    let pos = Position::create_standard();
    let pos = apply_announced_move(&pos, 'N', BoardId::One, "b1", "a3").unwrap();
    let pos = apply_announced_move(&pos, 'P', BoardId::One, "e7", "e5").unwrap();
    assert_eq!(pos.current_color(), Color::White);
    // The knight now moves from board two back to board one.
    let pos = apply_announced_move(&pos, 'N', BoardId::Two, "a3", "b5").unwrap();
    assert_eq!(
        pos.piece_at(sq(BoardId::One, "b5")).map(|p| p.kind),
        Some(PieceKind::Knight)
    );
}

// =====================================================================
// Blocked pawn advance
// =====================================================================

#[test]
fn pawn_double_push_blocked_from_other_board() {
    let pos = build(
        &[
            Piece::king(Color::White, sq(BoardId::One, "e1")),
            Piece::king(Color::Black, sq(BoardId::One, "e8")),
            Piece::pawn(Color::White, sq(BoardId::One, "e2")),
            Piece::knight(Color::Black, sq(BoardId::Two, "e4")),
        ],
        Color::White,
    );
    let pawn_moves: Vec<Move> = pos
        .current_player()
        .legal_moves()
        .iter()
        .filter(|m| m.piece().is_pawn())
        .copied()
        .collect();
    assert_eq!(pawn_moves.len(), 1);
    assert_eq!(pawn_moves[0].destination(), sq(BoardId::Two, "e3"));
}

// =====================================================================
// Promotion
// =====================================================================

#[test]
fn promotion_push_yields_queen() {
    let pos = build(
        &[
            Piece::pawn(Color::White, sq(BoardId::One, "a7")),
            Piece::king(Color::White, sq(BoardId::One, "e1")),
            Piece::king(Color::Black, sq(BoardId::One, "h8")),
        ],
        Color::White,
    );
    let promo = pos
        .current_player()
        .legal_moves()
        .iter()
        .find(|m| m.piece().is_pawn())
        .copied()
        .unwrap();
    assert!(matches!(promo, Move::Promotion(PromotionMove::Push(_))));

    let next = pos.current_player().make_move(&promo).into_position();
    let queen = next.piece_at(at(BoardId::Two, 0)).unwrap();
    assert_eq!(queen.kind, PieceKind::Queen);
    assert_eq!(queen.color, Color::White);
    assert!(next.pieces(Color::White).iter().all(|p| !p.is_pawn()));
}

// =====================================================================
// Resignation and terminal positions
// =====================================================================

fn checkmated_black() -> Position {
    build(
        &[
            Piece::king(Color::Black, at(BoardId::One, 0)),
            Piece::rook(Color::White, at(BoardId::One, 7)),
            Piece::knight(Color::White, at(BoardId::Two, 8)),
            Piece::knight(Color::White, at(BoardId::Two, 9)),
            Piece::king(Color::White, at(BoardId::One, 60)),
        ],
        Color::Black,
    )
}

#[test]
fn checkmated_side_has_no_move_available() {
    let pos = checkmated_black();
    assert!(pos.current_player().is_in_checkmate());
    let err = MinimaxAi::default().choose_move(&pos).unwrap_err();
    assert!(matches!(err, ChessError::NoMoveAvailable(Color::Black)));
    assert_eq!(Game::from_position(pos).status(), GameStatus::Checkmate);
}

#[test]
fn stalemated_side_has_no_move_available() {
    let pos = build(
        &[
            Piece::king(Color::Black, at(BoardId::One, 0)),
            Piece::knight(Color::White, at(BoardId::Two, 8)),
            Piece::knight(Color::White, at(BoardId::Two, 9)),
            Piece::bishop(Color::White, at(BoardId::Two, 1)),
            Piece::king(Color::White, at(BoardId::One, 63)),
        ],
        Color::Black,
    );
    assert!(pos.current_player().is_in_stalemate());
    assert!(matches!(
        RandomAi.choose_move(&pos),
        Err(ChessError::NoMoveAvailable(Color::Black))
    ));
    assert_eq!(Game::from_position(pos).status(), GameStatus::Stalemate);
}

// =====================================================================
// Search
// =====================================================================

#[test]
fn alpha_beta_and_minimax_agree_on_opening() {
    let pos = Position::create_standard();
    let alpha_beta = MinimaxAi::new(SearchConfig::default());
    let minimax = MinimaxAi::new(SearchConfig {
        algorithm: SearchAlgorithm::Minimax,
        ..SearchConfig::default()
    });
    let (ab_move, ab) = alpha_beta.search(&pos).unwrap();
    let (mm_move, mm) = minimax.search(&pos).unwrap();
    assert_eq!(ab.score, mm.score);
    assert_eq!(ab_move, mm_move);
}

#[test]
fn engine_move_keeps_game_going() {
    let mut game = Game::new();
    let engine = MinimaxAi::with_depth(2);
    for _ in 0..4 {
        let mv = engine.choose_move(game.position()).unwrap();
        game.make_move(mv).unwrap();
    }
    assert_eq!(game.move_history().len(), 4);
    assert_eq!(game.side_to_move(), Color::White);
}

#[test]
fn search_leaves_root_position_untouched() {
    let pos = Position::create_standard();
    let before = pos.clone();
    MinimaxAi::default().choose_move(&pos).unwrap();
    assert_eq!(pos, before);
}
