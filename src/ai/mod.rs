pub mod engine;
pub mod evaluation;

pub use engine::{
    AiEngine, MinimaxAi, RandomAi, SearchAlgorithm, SearchConfig, SearchStats, default_engine,
};
