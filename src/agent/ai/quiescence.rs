// Quiescence Search - Tactical Stability Extension
//
// When the main search runs out of depth it may be standing in the middle of
// an exchange: stop right after a queen capture and the side that just
// captured looks a queen up. Quiescence keeps going with captures and
// promotions only, until the position is quiet.
//
// 1. Stand-pat: the static evaluation is a lower bound, since the side to
//    move may decline every capture
// 2. Delta pruning: skip captures that cannot bring the score back to alpha
// 3. MVV-LVA ordering through the shared move picker
//
// No transposition table here; quiescence nodes are too many and too cheap.

use super::evaluation::piece_value;
use super::move_ordering::{MovePicker, MAX_PLY};
use super::negamax::Searcher;
use crate::game_repr::Position;

impl Searcher<'_> {
    /// Quiescence search - search until position is quiet
    ///
    /// Fail-soft like the main search; `None` when the time budget ran out.
    pub(super) fn quiescence(
        &mut self,
        pos: &mut Position,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        self.stats.qnodes += 1;

        let stand_pat = self.evaluator.evaluate(pos);
        if stand_pat >= beta || ply >= MAX_PLY - 1 {
            return Some(stand_pat);
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }

        let mut best_score = stand_pat;
        let picker = MovePicker::new(pos.legal_moves(true), None, None);

        for mv in picker {
            if self.time.budget_exceeded() {
                return None;
            }

            // Delta pruning. Promotions always get a look.
            if mv.promotion().is_none() {
                let gain = mv.captured().map_or(0, piece_value);
                if stand_pat + gain + self.config.delta_margin <= alpha {
                    continue;
                }
            }

            pos.make_move(mv);
            let score = self.quiescence(pos, ply + 1, -beta, -alpha).map(|s| -s);
            pos.undo_move();
            let score = score?;

            if score > best_score {
                best_score = score;
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                break;
            }
        }

        Some(best_score)
    }
}
