//! AI engines: the trait, RandomAi and MinimaxAi.
//!
//! The `AiEngine` trait defines the interface for all AI engines.
//! Two implementations are provided:
//!   - `RandomAi`: plays a random legal move.
//!   - `MinimaxAi`: minimax search, with or without alpha-beta pruning.

use std::cmp::Reverse;
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use tracing::{debug, warn};

use crate::engine::board::Position;
use crate::engine::moves::Move;
use crate::engine::types::{ChessError, Color};

use super::evaluation::evaluate;

// =========================================================================
// AiEngine trait
// =========================================================================

/// The AI engine interface.
pub trait AiEngine: Send + Sync {
    /// Select a move for the side to move.
    ///
    /// Returns `ChessError::NoMoveAvailable` when the side to move is mated
    /// or stalemated; callers treat that as resignation.
    fn choose_move(&self, position: &Position) -> Result<Move, ChessError>;

    /// Human-readable name for this engine.
    fn name(&self) -> &str;
}

// =========================================================================
// RandomAi
// =========================================================================

/// Picks a uniformly random legal move.
pub struct RandomAi;

impl AiEngine for RandomAi {
    fn choose_move(&self, position: &Position) -> Result<Move, ChessError> {
        let player = position.current_player();
        let mut rng = rand::thread_rng();
        player
            .legal_moves()
            .choose(&mut rng)
            .copied()
            .ok_or(ChessError::NoMoveAvailable(player.color()))
    }

    fn name(&self) -> &str {
        "RandomAi"
    }
}

// =========================================================================
// Move ordering
// =========================================================================

/// Sort moves best-first by ordering value. The sort is stable, so equal
/// values keep generation order.
fn order_moves(moves: &[Move]) -> Vec<Move> {
    let mut ordered = moves.to_vec();
    ordered.sort_by_key(|m| Reverse(m.ordering_value()));
    ordered
}

// =========================================================================
// Search configuration
// =========================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SearchAlgorithm {
    AlphaBeta,
    Minimax,
}

/// Parameters for one search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    /// Maximum depth in plies (at least 1).
    pub depth: u32,
    /// When set, search depths 1..=depth and keep the deepest completed
    /// result once the budget runs out.
    pub time_budget: Option<Duration>,
    pub algorithm: SearchAlgorithm,
    /// Multiply leaf scores by their distance from the root.
    pub depth_scaled_leaves: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 2,
            time_budget: None,
            algorithm: SearchAlgorithm::AlphaBeta,
            depth_scaled_leaves: true,
        }
    }
}

// =========================================================================
// MinimaxAi
// =========================================================================

/// Search statistics.
#[derive(Clone, Debug, Default)]
pub struct SearchStats {
    pub nodes: u64,
    /// Deepest fully completed depth; 0 if none completed.
    pub depth: u32,
    pub score: f64,
    pub time_ms: u64,
}

/// State shared across one search.
struct SearchContext {
    perspective: Color,
    prune: bool,
    depth_scaled: bool,
    deadline: Option<Instant>,
    nodes: u64,
    aborted: bool,
}

impl SearchContext {
    fn new(config: &SearchConfig, perspective: Color, start: Instant) -> Self {
        Self {
            perspective,
            prune: config.algorithm == SearchAlgorithm::AlphaBeta,
            depth_scaled: config.depth_scaled_leaves,
            deadline: config.time_budget.map(|budget| start + budget),
            nodes: 0,
            aborted: false,
        }
    }

    /// Checked between siblings. Once the deadline passes the search
    /// unwinds and the current depth is discarded.
    #[inline]
    fn check_time(&mut self) -> bool {
        if !self.aborted
            && let Some(deadline) = self.deadline
            && Instant::now() >= deadline
        {
            self.aborted = true;
        }
        self.aborted
    }

    fn leaf_value(&self, pos: &Position, ply: u32) -> f64 {
        let score = evaluate(pos, self.perspective);
        if self.depth_scaled {
            ply as f64 * score
        } else {
            score
        }
    }
}

/// Minimax over positions, scored from the root mover's perspective.
fn min_max(
    pos: &Position,
    depth: u32,
    ply: u32,
    mut alpha: f64,
    mut beta: f64,
    maximizing: bool,
    ctx: &mut SearchContext,
) -> f64 {
    ctx.nodes += 1;

    if depth == 0 {
        return ctx.leaf_value(pos, ply);
    }

    let player = pos.current_player();
    let moves = player.legal_moves();
    if moves.is_empty() {
        return ctx.leaf_value(pos, ply);
    }

    let mut best = if maximizing {
        f64::NEG_INFINITY
    } else {
        f64::INFINITY
    };

    for mv in order_moves(moves) {
        if ctx.check_time() {
            break;
        }
        // Already filtered for king safety, so commit directly.
        let Ok(child) = mv.execute(pos) else {
            continue;
        };
        let value = min_max(
            &child,
            depth - 1,
            ply + 1,
            alpha,
            beta,
            !maximizing,
            ctx,
        );
        if ctx.aborted {
            break;
        }

        if maximizing {
            best = best.max(value);
            if ctx.prune {
                if best >= beta {
                    return best;
                }
                alpha = alpha.max(best);
            }
        } else {
            best = best.min(value);
            if ctx.prune {
                if best <= alpha {
                    return best;
                }
                beta = beta.min(best);
            }
        }
    }

    best
}

/// Minimax AI engine, alpha-beta pruned by default.
pub struct MinimaxAi {
    config: SearchConfig,
}

impl MinimaxAi {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn with_depth(depth: u32) -> Self {
        Self::new(SearchConfig {
            depth,
            ..SearchConfig::default()
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search the root to `depth`. Returns `None` if the time budget ran
    /// out before every root move was searched.
    fn search_root(
        &self,
        pos: &Position,
        depth: u32,
        ctx: &mut SearchContext,
    ) -> Option<(Move, f64)> {
        let player = pos.current_player();
        let mut best: Option<(Move, f64)> = None;
        let mut alpha = f64::NEG_INFINITY;

        ctx.nodes += 1;
        for mv in order_moves(player.legal_moves()) {
            if ctx.check_time() {
                return None;
            }
            let Ok(child) = mv.execute(pos) else {
                continue;
            };
            let value = min_max(
                &child,
                depth - 1,
                1,
                alpha,
                f64::INFINITY,
                false,
                ctx,
            );
            if ctx.aborted {
                return None;
            }

            // Strictly better only: ties keep the earlier move.
            if best.is_none_or(|(_, score)| value > score) {
                best = Some((mv, value));
            }
            if ctx.prune {
                alpha = alpha.max(value);
            }
        }

        best
    }

    /// Run the configured search. Returns the chosen move and statistics.
    pub fn search(&self, pos: &Position) -> Result<(Move, SearchStats), ChessError> {
        let player = pos.current_player();
        let legal = player.legal_moves();
        if legal.is_empty() {
            return Err(ChessError::NoMoveAvailable(player.color()));
        }

        let start = Instant::now();
        let mut ctx = SearchContext::new(&self.config, player.color(), start);
        let max_depth = self.config.depth.max(1);
        let first_depth = if self.config.time_budget.is_some() {
            1
        } else {
            max_depth
        };

        let mut completed: Option<(Move, f64, u32)> = None;
        for depth in first_depth..=max_depth {
            let Some((mv, score)) = self.search_root(pos, depth, &mut ctx) else {
                break;
            };
            debug!(
                depth,
                nodes = ctx.nodes,
                score,
                elapsed_ms = start.elapsed().as_millis() as u64,
                best = %mv,
                "search depth completed"
            );
            completed = Some((mv, score, depth));
        }

        let (mv, score, depth) = match completed {
            Some(result) => result,
            None => {
                warn!(
                    budget = ?self.config.time_budget,
                    "time budget exhausted before depth 1 completed, playing first ordered move"
                );
                let first = order_moves(legal)
                    .first()
                    .copied()
                    .ok_or(ChessError::NoMoveAvailable(player.color()))?;
                (first, 0.0, 0)
            }
        };

        Ok((
            mv,
            SearchStats {
                nodes: ctx.nodes,
                depth,
                score,
                time_ms: start.elapsed().as_millis() as u64,
            },
        ))
    }
}

impl Default for MinimaxAi {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl AiEngine for MinimaxAi {
    fn choose_move(&self, position: &Position) -> Result<Move, ChessError> {
        self.search(position).map(|(mv, _stats)| mv)
    }

    fn name(&self) -> &str {
        match self.config.algorithm {
            SearchAlgorithm::AlphaBeta => "AlphaBetaAi",
            SearchAlgorithm::Minimax => "MinimaxAi",
        }
    }
}

/// Convenience: create the default AI engine.
pub fn default_engine() -> MinimaxAi {
    MinimaxAi::default()
}

// =========================================================================
// Tests
// =========================================================================
