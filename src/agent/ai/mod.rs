// AI Agent - Negamax with Alpha-Beta Pruning
//
// This module implements a classical chess AI using the Negamax algorithm
// with alpha-beta pruning, iterative deepening, and transposition tables.
//
// Key features:
// - Deterministic for a fixed depth (same position, same tables, same move)
// - Principal variation search with null-move and futility pruning
// - Transposition table to cache searched positions across turns
// - Quiescence search to avoid horizon effect
// - Tapered evaluation with a cached pawn-structure term
// - Time budget drawn from the remaining game clock

mod config;
mod evaluation;
mod move_ordering;
mod negamax;
mod negamax_player;
mod piece_square_tables;
mod quiescence;
mod search;
mod time_manager;
mod transposition_table;

#[cfg(test)]
mod tests;

pub use config::SearchConfig;
pub use evaluation::{evaluate, Evaluator, TaperedScore};
pub use negamax::{is_mate_score, mate_distance, MATE_SCORE};
pub use negamax_player::{Difficulty, NegamaxPlayer};
pub use search::{Engine, SearchResult};
pub use time_manager::compute_budget;
pub use transposition_table::{NodeType, TranspositionTable, TranspositionTableEntry};
