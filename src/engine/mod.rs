pub mod board;
pub mod game;
pub mod movegen;
pub mod moves;
pub mod player;
pub mod types;

pub use board::{Builder, Position, Tile};
pub use game::{Announcement, Game, apply_announced_move};
pub use movegen::{legal_moves, legal_moves_from};
pub use moves::{AttackMove, Move, MoveStatus, MoveTransition, PromotionMove, SimpleMove};
pub use player::Player;
pub use types::*;
