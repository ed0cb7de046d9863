//! Static position evaluation.
//!
//! Scores are from the point of view of the player being evaluated:
//! positive is good for them.
//!
//! Components:
//!   1. Material: base value plus piece-square bonus for every piece
//!   2. Mobility: pseudo-legal move count difference
//!   3. Check bonus, plus a large term when the side in check is mated

use crate::engine::board::Position;
use crate::engine::player::Player;
use crate::engine::types::Color;

/// Weight of one extra pseudo-legal move.
pub const MOBILITY_WEIGHT: f64 = 0.1;

/// Awarded for giving check, charged for being in check.
pub const CHECK_BONUS: f64 = 50.0;

/// Added on top of the check bonus when the side in check has no legal move.
pub const CHECKMATE_BONUS: f64 = 10_000.0;

// =========================================================================
// Components
// =========================================================================

/// Sum of base value and square bonus over a player's pieces.
pub fn material(player: &Player<'_>) -> i32 {
    player
        .active_pieces()
        .iter()
        .map(|p| p.material_value())
        .sum()
}

/// Weighted pseudo-legal move count difference.
pub fn mobility(mover: &Player<'_>, opponent: &Player<'_>) -> f64 {
    let diff = mover.pseudo_legal_moves().len() as f64 - opponent.pseudo_legal_moves().len() as f64;
    MOBILITY_WEIGHT * diff
}

/// Penalty a player suffers for being in check (and mated).
fn check_penalty(player: &Player<'_>) -> f64 {
    if !player.is_in_check() {
        return 0.0;
    }
    if player.legal_moves().is_empty() {
        CHECK_BONUS + CHECKMATE_BONUS
    } else {
        CHECK_BONUS
    }
}

// =========================================================================
// Evaluation
// =========================================================================

/// Score `mover` against `opponent`.
pub fn score(mover: &Player<'_>, opponent: &Player<'_>) -> f64 {
    let material = (material(mover) - material(opponent)) as f64;
    material + mobility(mover, opponent) + check_penalty(opponent) - check_penalty(mover)
}

/// Evaluate `pos` from `perspective`'s point of view.
#[inline]
pub fn evaluate(pos: &Position, perspective: Color) -> f64 {
    score(&pos.player(perspective), &pos.player(!perspective))
}

// =========================================================================
// Tests
// =========================================================================
