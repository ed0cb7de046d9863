use std::time::Duration;

use crate::ai::{AiEngine, MinimaxAi, RandomAi, SearchAlgorithm, SearchConfig};

/// Which engine plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    AlphaBeta,
    Minimax,
    Random,
}

impl EngineKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alphabeta" | "alpha-beta" => Some(EngineKind::AlphaBeta),
            "minimax" => Some(EngineKind::Minimax),
            "random" => Some(EngineKind::Random),
            _ => None,
        }
    }
}

/// Engine configuration parsed from environment variables.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Search depth in plies, at least 1.
    pub search_depth: u32,
    /// Optional wall-clock budget per move.
    pub time_budget: Option<Duration>,
    pub engine: EngineKind,
    /// Scale leaf scores by ply.
    pub depth_scaled: bool,
    /// Self-play length for the binary.
    pub max_plies: u32,
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EngineConfig::default();
        EngineConfig {
            search_depth: get("ALICE_SEARCH_DEPTH")
                .and_then(|v| v.parse::<u32>().ok())
                .map(|d| d.max(1))
                .unwrap_or(defaults.search_depth),
            time_budget: get("ALICE_TIME_BUDGET_SECS")
                .and_then(|v| v.parse::<f64>().ok())
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok()),
            engine: get("ALICE_ENGINE")
                .and_then(|v| EngineKind::parse(&v))
                .unwrap_or(defaults.engine),
            depth_scaled: get("ALICE_DEPTH_SCALED")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.depth_scaled),
            max_plies: get("ALICE_MAX_PLIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_plies),
        }
    }

    /// The explicit search parameters handed to the engine.
    pub fn search_config(&self) -> SearchConfig {
        SearchConfig {
            depth: self.search_depth.max(1),
            time_budget: self.time_budget,
            algorithm: match self.engine {
                EngineKind::Minimax => SearchAlgorithm::Minimax,
                EngineKind::AlphaBeta | EngineKind::Random => SearchAlgorithm::AlphaBeta,
            },
            depth_scaled_leaves: self.depth_scaled,
        }
    }

    /// Build the configured engine.
    pub fn build_engine(&self) -> Box<dyn AiEngine> {
        match self.engine {
            EngineKind::Random => Box::new(RandomAi),
            EngineKind::AlphaBeta | EngineKind::Minimax => {
                Box::new(MinimaxAi::new(self.search_config()))
            }
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            search_depth: 2,
            time_budget: None,
            engine: EngineKind::AlphaBeta,
            depth_scaled: true,
            max_plies: 40,
        }
    }
}
