//! Player trait and associated types for chess game agents.
//!
//! A player is anything that can be handed a position and a clock and come
//! back with a move: the search engine, a random mover for sanity games, or
//! whatever a host program wires in.
//!
//! The trait does not define a constructor. Each implementation takes the
//! parameters it needs (difficulty, seed, ...).
//!
//! # Synchronous Design
//!
//! `get_move()` blocks until the move is chosen. The search is single
//! threaded and has its own time budget, so the caller simply waits.

use crate::clock::Clock;
use crate::game_repr::{Color, Move, Position};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Result of a completed chess game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameResult {
    /// White player won the game (Black was checkmated)
    WhiteWins,
    /// Black player won the game (White was checkmated)
    BlackWins,
    /// Repetition, fifty-move rule or insufficient material
    Draw,
    /// Player to move has no legal moves but is not in check
    Stalemate,
}

impl GameResult {
    /// Create a GameResult from the winning color
    pub fn from_winner(winner: Color) -> Self {
        match winner {
            Color::White => GameResult::WhiteWins,
            Color::Black => GameResult::BlackWins,
        }
    }

    /// Result of a finished game, or `None` while it is still going.
    pub fn of(pos: &Position) -> Option<Self> {
        if !pos.has_legal_moves() {
            return Some(if pos.is_in_check() {
                GameResult::from_winner(!pos.side_to_move())
            } else {
                GameResult::Stalemate
            });
        }
        pos.is_draw().then_some(GameResult::Draw)
    }
}

/// Trait for entities that can provide chess moves.
///
/// Only `get_move()` must be implemented.
pub trait Player {
    /// Request a move for the side to move in `pos`.
    ///
    /// The position may be explored with make/undo but must be returned
    /// unchanged. `None` means the player has no move to offer, which only
    /// happens when the game is already over.
    fn get_move(&mut self, pos: &mut Position, clock: &dyn Clock) -> Option<Move>;

    /// Called before the first move of every game.
    fn new_game(&mut self) {}

    /// Called once the game reaches a terminal state.
    fn game_ended(&mut self, _result: GameResult) {}

    /// Get the display name of this player.
    fn name(&self) -> &str {
        "Player"
    }
}

/// Plays a uniformly random legal move. Seeded, so games are reproducible.
pub struct RandomPlayer {
    rng: StdRng,
}

impl RandomPlayer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn get_move(&mut self, pos: &mut Position, _clock: &dyn Clock) -> Option<Move> {
        pos.legal_moves(false).choose(&mut self.rng).copied()
    }

    fn name(&self) -> &str {
        "Random"
    }
}
