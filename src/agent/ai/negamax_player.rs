//! NegamaxPlayer - the search engine behind the `Player` trait
//!
//! # Difficulty Levels
//!
//! - **Easy**: Depth 2
//! - **Medium**: Depth 4
//! - **Hard**: Depth 6
//! - **Expert**: Depth 64 within at most 5s per move
//!
//! Every level still respects the game clock: the depth cap only ever makes
//! a move faster.

use super::config::SearchConfig;
use super::search::Engine;
use crate::agent::player::Player;
use crate::clock::Clock;
use crate::game_repr::{Move, Position};

/// AI difficulty levels that map to search depth and time controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    /// Maximum search depth in plies
    pub fn max_depth(&self) -> u8 {
        match self {
            Difficulty::Easy => 2,
            Difficulty::Medium => 4,
            Difficulty::Hard => 6,
            Difficulty::Expert => 64,
        }
    }

    /// Fixed per-move time in milliseconds, `None` to budget from the clock
    pub fn time_limit_ms(&self) -> Option<u64> {
        match self {
            Difficulty::Expert => Some(5000),
            _ => None,
        }
    }

    /// Get a display name for this difficulty level
    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
            Difficulty::Expert => "Expert",
        }
    }

    /// Apply this level on top of `base`.
    pub fn configure(&self, base: SearchConfig) -> SearchConfig {
        base.with_max_depth(self.max_depth())
            .with_move_time_ms(self.time_limit_ms())
    }
}

/// AI Player that uses Negamax algorithm with alpha-beta pruning
pub struct NegamaxPlayer {
    engine: Engine,
    difficulty: Difficulty,
    name: String,
}

impl NegamaxPlayer {
    pub fn new(difficulty: Difficulty, base: SearchConfig, name: String) -> Self {
        Self {
            engine: Engine::new(difficulty.configure(base)),
            difficulty,
            name,
        }
    }

    /// Default tables, named after the level.
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::new(
            difficulty,
            SearchConfig::default(),
            format!("Negamax ({})", difficulty.name()),
        )
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }
}

impl Player for NegamaxPlayer {
    fn get_move(&mut self, pos: &mut Position, clock: &dyn Clock) -> Option<Move> {
        self.engine.choose_move(pos, clock)
    }

    fn new_game(&mut self) {
        self.engine.new_game();
    }

    fn name(&self) -> &str {
        &self.name
    }
}
