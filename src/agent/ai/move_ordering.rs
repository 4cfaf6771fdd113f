// Move ordering with incremental selection for efficient search
//
// Priorities, highest first:
// 1. The best move stored in the transposition table for this position
// 2. Captures and promotions, MVV-LVA
// 3. The killer move of the current ply
// 4. Every other quiet move

use super::evaluation::piece_value;
use crate::game_repr::Move;
use chess::ChessMove;
use smallvec::SmallVec;

/// Deepest ply tracked by the killer table and the search
pub const MAX_PLY: usize = 128;

const TT_MOVE_SCORE: i32 = 1_000_000;
/// Multiplier on the victim value; dominates any attacker value
const VICTIM_WEIGHT: i32 = 100;
const KILLER_SCORE: i32 = 500;

/// One killer slot per ply: the latest quiet move that caused a beta cutoff.
pub struct KillerMoves {
    slots: [Option<ChessMove>; MAX_PLY],
}

impl KillerMoves {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_PLY],
        }
    }

    /// Remember `mv` for `ply`. Captures and promotions are ordered well
    /// already and are never stored.
    pub fn store(&mut self, ply: usize, mv: Move) {
        if mv.is_quiet() && ply < MAX_PLY {
            self.slots[ply] = Some(mv.raw());
        }
    }

    pub fn get(&self, ply: usize) -> Option<ChessMove> {
        self.slots.get(ply).copied().flatten()
    }

    pub fn clear(&mut self) {
        self.slots = [None; MAX_PLY];
    }
}

impl Default for KillerMoves {
    fn default() -> Self {
        Self::new()
    }
}

/// Score a single move for ordering purposes (higher = searched earlier)
pub fn score_move(mv: Move, tt_move: Option<ChessMove>, killer: Option<ChessMove>) -> i32 {
    if tt_move == Some(mv.raw()) {
        return TT_MOVE_SCORE;
    }

    let mut score = 0;

    // MVV-LVA: high victim value, low attacker value = good capture
    if let Some(victim) = mv.captured() {
        score += piece_value(victim) * VICTIM_WEIGHT - piece_value(mv.piece());
    }

    if let Some(promotion) = mv.promotion() {
        score += (piece_value(promotion) - piece_value(chess::Piece::Pawn)) * VICTIM_WEIGHT;
    }

    if score == 0 && killer == Some(mv.raw()) {
        score = KILLER_SCORE;
    }

    score
}

#[derive(Debug, Clone, Copy)]
struct ScoredMove {
    mv: Move,
    score: i32,
}

/// Hands out moves best-first, sorting lazily.
///
/// Each call to `next` does one selection pass over the unvisited tail, so a
/// node that cuts off after two moves never pays for a full sort.
pub struct MovePicker {
    moves: SmallVec<[ScoredMove; 64]>,
    next: usize,
}

impl MovePicker {
    pub fn new(
        moves: SmallVec<[Move; 64]>,
        tt_move: Option<ChessMove>,
        killer: Option<ChessMove>,
    ) -> Self {
        let moves = moves
            .into_iter()
            .map(|mv| ScoredMove {
                mv,
                score: score_move(mv, tt_move, killer),
            })
            .collect();
        Self { moves, next: 0 }
    }
}

impl Iterator for MovePicker {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        let rest = self.moves.get(self.next..)?;
        let best = rest
            .iter()
            .enumerate()
            // First of equal scores wins, keeping generator order for ties
            .fold(None::<(usize, i32)>, |best, (i, m)| match best {
                Some((_, score)) if score >= m.score => best,
                _ => Some((i, m.score)),
            })?
            .0;

        self.moves.swap(self.next, self.next + best);
        let mv = self.moves[self.next].mv;
        self.next += 1;
        Some(mv)
    }
}
