// Negamax Search with Alpha-Beta Pruning
//
// Negamax is a variant of the minimax algorithm that simplifies implementation
// by taking advantage of the zero-sum property of chess: max(a, b) = -min(-a, -b).
// Instead of separate maximizing and minimizing functions, we use one function
// that negates the score at each level.
//
// On top of plain alpha-beta:
// - Transposition table cutoffs and best-move ordering
// - Check extension
// - Reverse futility, null move and futility pruning at non-PV nodes
// - Principal Variation Search (PVS) with zero-window probes
// - Killer moves for quiet cutoffs
// - Quiescence search at the horizon (see quiescence.rs)
//
// Every search function returns `Option<i32>`. `None` means the time budget
// ran out somewhere below; the node unwinds with `?` after undoing its move
// and stores nothing.

use super::config::SearchConfig;
use super::evaluation::Evaluator;
use super::move_ordering::{KillerMoves, MovePicker, MAX_PLY};
use super::time_manager::TimeManager;
use super::transposition_table::{
    score_from_tt, score_to_tt, NodeType, TranspositionTable, TranspositionTableEntry,
};
use crate::game_repr::{Move, Position};

/// Checkmate score - use large value but leave room for mate distance
pub const MATE_SCORE: i32 = 30000;

/// Any score at least this large in magnitude is a forced mate
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

/// Minimum score (worse than any mate)
pub const MIN_SCORE: i32 = -MATE_SCORE - 100;

/// Maximum score (better than any mate)
pub const MAX_SCORE: i32 = MATE_SCORE + 100;

pub fn is_mate_score(score: i32) -> bool {
    score.abs() >= MATE_THRESHOLD
}

/// Plies until mate for a mate score, counted from the node that produced it.
pub fn mate_distance(score: i32) -> Option<i32> {
    is_mate_score(score).then(|| MATE_SCORE - score.abs())
}

/// Counters gathered over one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub tt_cutoffs: u64,
    pub null_cutoffs: u64,
    /// Root searches repeated with the full window after an aspiration miss
    pub aspiration_researches: u64,
}

/// Search state for one turn.
///
/// Borrows the long-lived tables from the engine session and owns this
/// turn's time manager and counters.
pub struct Searcher<'a> {
    pub(super) tt: &'a mut TranspositionTable,
    pub(super) killers: &'a mut KillerMoves,
    pub(super) evaluator: &'a mut Evaluator,
    pub(super) config: &'a SearchConfig,
    pub(super) time: TimeManager<'a>,
    pub stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub fn new(
        tt: &'a mut TranspositionTable,
        killers: &'a mut KillerMoves,
        evaluator: &'a mut Evaluator,
        config: &'a SearchConfig,
        time: TimeManager<'a>,
    ) -> Self {
        Self {
            tt,
            killers,
            evaluator,
            config,
            time,
            stats: SearchStats::default(),
        }
    }

    /// Negamax search with alpha-beta pruning
    ///
    /// # Arguments
    ///
    /// * `pos` - Current position, left exactly as it was found
    /// * `depth` - Remaining search depth (<= 0 drops into quiescence)
    /// * `ply` - Distance from the root
    /// * `alpha` - Lower bound (best score side to move can guarantee)
    /// * `beta` - Upper bound (best score opponent will allow)
    ///
    /// # Returns
    ///
    /// Fail-soft score from the perspective of the side to move, or `None`
    /// when the time budget ran out before the node finished.
    pub fn negamax(
        &mut self,
        pos: &mut Position,
        mut depth: i32,
        ply: usize,
        mut alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let root = ply == 0;
        let pv_node = beta - alpha > 1;
        self.stats.nodes += 1;

        if !root && pos.is_draw() {
            return Some(self.config.draw_score);
        }
        if ply >= MAX_PLY - 1 {
            return Some(self.evaluator.evaluate(pos));
        }

        // Check extension
        let in_check = pos.is_in_check();
        if in_check {
            depth += 1;
        }

        // Transposition table lookup
        let hash = pos.hash();
        let mut tt_move = None;
        if let Some(mut entry) = self.tt.probe(hash) {
            self.stats.tt_hits += 1;
            tt_move = entry.best_move;
            entry.score = score_from_tt(entry.score, ply);
            if !root && entry.is_cutoff(depth, alpha, beta) {
                self.stats.tt_cutoffs += 1;
                return Some(entry.score);
            }
        }

        if depth <= 0 {
            return self.quiescence(pos, ply, alpha, beta);
        }

        // A side with no legal move is mated or stalemated, never pruned
        let mut futile = false;
        if !in_check && !pv_node && !root && !is_mate_score(beta) && pos.has_legal_moves() {
            let static_eval = self.evaluator.evaluate(pos);

            // Reverse futility: too far above beta to bother
            if depth <= self.config.futility_max_depth()
                && static_eval - self.config.reverse_futility_margin * depth >= beta
            {
                return Some(static_eval);
            }

            // Null move: if passing still fails high, a real move will too.
            // Skipped without pieces, where zugzwang is common.
            if depth >= self.config.null_move_min_depth
                && static_eval >= beta
                && pos.has_non_pawn_material()
                && pos.make_null_move()
            {
                let reduced = depth - 1 - self.config.null_move_reduction;
                let score = self.negamax(pos, reduced, ply + 1, -beta, -beta + 1);
                pos.undo_move();
                let score = -score?;

                if score >= beta {
                    self.stats.null_cutoffs += 1;
                    // Unproven mates from a null search are not trusted
                    return Some(if is_mate_score(score) { beta } else { score });
                }
            }

            if depth <= self.config.futility_max_depth() {
                futile = static_eval + self.config.futility_margins[depth as usize] <= alpha;
            }
        }

        let moves = pos.legal_moves(false);
        if moves.is_empty() {
            // Checkmate or stalemate; shallower mates score better
            return Some(if in_check { -(MATE_SCORE - ply as i32) } else { 0 });
        }

        let original_alpha = alpha;
        let mut best_score = MIN_SCORE;
        let mut best_move: Option<Move> = None;
        let picker = MovePicker::new(moves, tt_move, self.killers.get(ply));

        for (index, mv) in picker.enumerate() {
            if self.time.budget_exceeded() {
                return None;
            }

            pos.make_move(mv);

            // Futility pruning: quiet moves that do not give check cannot
            // lift a hopeless static score up to alpha
            if futile && index > 0 && mv.is_quiet() && !pos.is_in_check() {
                pos.undo_move();
                continue;
            }

            let score = if index == 0 {
                self.negamax(pos, depth - 1, ply + 1, -beta, -alpha).map(|s| -s)
            } else {
                // Zero-window probe, full re-search only if it beats alpha
                match self.negamax(pos, depth - 1, ply + 1, -alpha - 1, -alpha) {
                    Some(probe) if -probe > alpha && -probe < beta => {
                        self.negamax(pos, depth - 1, ply + 1, -beta, -alpha).map(|s| -s)
                    }
                    probe => probe.map(|s| -s),
                }
            };
            pos.undo_move();
            let score = score?;

            if score > best_score {
                best_score = score;
                best_move = Some(mv);
            }
            if score > alpha {
                alpha = score;
            }
            if alpha >= beta {
                self.killers.store(ply, mv);
                break;
            }
        }

        self.tt.store(TranspositionTableEntry {
            hash,
            depth: depth.clamp(0, u8::MAX as i32) as u8,
            score: score_to_tt(best_score, ply),
            best_move: best_move.map(|mv| mv.raw()),
            node_type: NodeType::classify(best_score, original_alpha, beta),
        });

        Some(best_score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::ai::evaluation::MAX_PHASE;
    use crate::clock::ManualClock;

    /// Config with every inexact pruning rule switched off
    fn exact_config() -> SearchConfig {
        SearchConfig {
            reverse_futility_margin: 100_000,
            futility_margins: [0, 100_000, 100_000, 100_000],
            null_move_min_depth: 1_000,
            delta_margin: 100_000,
            ..SearchConfig::default()
        }
    }

    fn search_with(
        tt: &mut TranspositionTable,
        config: &SearchConfig,
        pos: &mut Position,
        depth: i32,
        alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        let clock = ManualClock::new(1 << 40);
        let mut killers = KillerMoves::new();
        let mut evaluator = Evaluator::new(8);
        let time = TimeManager::new(&clock, config, MAX_PHASE);
        let mut searcher = Searcher::new(tt, &mut killers, &mut evaluator, config, time);
        searcher.negamax(pos, depth, 0, alpha, beta)
    }

    fn search(pos: &mut Position, depth: i32) -> (i32, Option<String>) {
        let mut tt = TranspositionTable::with_size_log2(16);
        let config = SearchConfig::default();
        let score = search_with(&mut tt, &config, pos, depth, MIN_SCORE, MAX_SCORE).unwrap();
        let best = tt
            .probe(pos.hash())
            .and_then(|e| e.best_move)
            .map(|mv| mv.to_string());
        (score, best)
    }

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn test_mate_in_one() {
        // Fool's mate: 1. f3 e5 2. g4, Qh4# is the only mate
        let mut p = pos("rnbqkbnr/pppp1ppp/8/4p3/6P1/5P2/PPPPP2P/RNBQKBNR b KQkq - 0 2");
        let (score, best) = search(&mut p, 1);

        assert_eq!(score, MATE_SCORE - 1);
        assert_eq!(best.as_deref(), Some("d8h4"));
        assert_eq!(mate_distance(score), Some(1));
    }

    #[test]
    fn test_checkmated_root() {
        let mut p = pos("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        let (score, best) = search(&mut p, 2);
        assert_eq!(score, -MATE_SCORE);
        assert_eq!(best, None);
    }

    #[test]
    fn test_stalemate() {
        // Black king on h8, White king on f6, White queen on g6
        for depth in [1, 3] {
            let mut p = pos("7k/8/5KQ1/8/8/8/8/8 b - - 0 1");
            let (score, _) = search(&mut p, depth);
            assert_eq!(score, 0, "stalemate at depth {depth}");
        }
    }

    #[test]
    fn test_finds_queen_capture() {
        // The queen attacks the rook, which is defended by the king
        let mut p = pos("4k3/8/8/8/3q4/8/3R4/4K3 w - - 0 1");
        let (score, best) = search(&mut p, 3);

        assert_eq!(best.as_deref(), Some("d2d4"));
        assert!(score > 300, "winning the queen: {}", score);
    }

    #[test]
    fn test_prefers_shorter_mate() {
        // Mate in one with Ra8 is available; deeper searches must keep it
        let mut p = pos("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let (score, best) = search(&mut p, 3);
        assert_eq!(score, MATE_SCORE - 1);
        assert_eq!(best.as_deref(), Some("a1a8"));
    }

    #[test]
    fn test_search_leaves_position_untouched() {
        let mut p = pos("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
        let before = *p.board();
        let ply = p.ply();

        search(&mut p, 4);

        assert_eq!(*p.board(), before);
        assert_eq!(p.ply(), ply);
    }

    #[test]
    fn test_root_entry_is_exact() {
        let mut p = Position::default();
        let mut tt = TranspositionTable::with_size_log2(16);
        let config = SearchConfig::default();
        let score = search_with(&mut tt, &config, &mut p, 3, MIN_SCORE, MAX_SCORE).unwrap();

        let entry = tt.probe(p.hash()).unwrap();
        assert_eq!(entry.node_type, NodeType::Exact);
        assert_eq!(entry.score, score);
        assert_eq!(entry.depth, 3);
        assert!(entry.best_move.is_some());
    }

    #[test]
    fn test_window_monotonicity() {
        let fen = "r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4";
        let config = exact_config();

        let mut tt = TranspositionTable::with_size_log2(16);
        let full = search_with(&mut tt, &config, &mut pos(fen), 3, MIN_SCORE, MAX_SCORE).unwrap();

        // A window containing the true score returns it exactly
        let mut tt = TranspositionTable::with_size_log2(16);
        let inside = search_with(&mut tt, &config, &mut pos(fen), 3, full - 20, full + 20).unwrap();
        assert_eq!(inside, full);

        // Windows above and below fail on the correct side
        let mut tt = TranspositionTable::with_size_log2(16);
        let above = search_with(&mut tt, &config, &mut pos(fen), 3, full + 10, full + 40).unwrap();
        assert!(above <= full + 10 && above >= full);

        let mut tt = TranspositionTable::with_size_log2(16);
        let below = search_with(&mut tt, &config, &mut pos(fen), 3, full - 40, full - 10).unwrap();
        assert!(below >= full - 10 && below <= full);
    }

    #[test]
    fn test_stalemate_below_root_ignores_static_eval() {
        // Black is stalemated and far behind; a window this low would let
        // reverse futility return the static evaluation
        let mut p = pos("7k/8/5KQ1/8/8/8/8/8 b - - 0 1");
        let config = SearchConfig::default();
        let clock = ManualClock::new(1 << 40);
        let mut tt = TranspositionTable::with_size_log2(12);
        let mut killers = KillerMoves::new();
        let mut evaluator = Evaluator::new(8);
        let time = TimeManager::new(&clock, &config, MAX_PHASE);
        let mut searcher = Searcher::new(&mut tt, &mut killers, &mut evaluator, &config, time);

        for depth in 1..=3 {
            assert_eq!(searcher.negamax(&mut p, depth, 1, -10_001, -10_000), Some(0));
        }
    }

    #[test]
    fn test_repetition_scores_draw_score() {
        let mut p = Position::default();
        for uci in ["g1f3", "g8f6", "f3g1", "f6g8"] {
            let mv = p.find_move(uci).unwrap();
            p.make_move(mv);
        }
        assert!(p.is_repeated_position());

        let config = SearchConfig::default().with_draw_score(-25);
        let clock = ManualClock::new(1 << 40);
        let mut tt = TranspositionTable::with_size_log2(12);
        let mut killers = KillerMoves::new();
        let mut evaluator = Evaluator::new(8);
        let time = TimeManager::new(&clock, &config, MAX_PHASE);
        let mut searcher = Searcher::new(&mut tt, &mut killers, &mut evaluator, &config, time);

        // Below the root the repetition ends the line
        assert_eq!(searcher.negamax(&mut p, 3, 1, MIN_SCORE, MAX_SCORE), Some(-25));

        // At the root there is still a move to choose
        let root = searcher.negamax(&mut p, 1, 0, MIN_SCORE, MAX_SCORE).unwrap();
        assert!(root.abs() < 100, "opening score at the root: {root}");
    }

    #[test]
    fn test_timeout_returns_none_and_restores_position() {
        let mut p = Position::default();
        let before = *p.board();
        let config = SearchConfig::default().with_move_time_ms(Some(0));
        let clock = ManualClock::new(60_000);
        let mut tt = TranspositionTable::with_size_log2(12);
        let mut killers = KillerMoves::new();
        let mut evaluator = Evaluator::new(8);
        let time = TimeManager::new(&clock, &config, MAX_PHASE);
        let mut searcher = Searcher::new(&mut tt, &mut killers, &mut evaluator, &config, time);

        assert_eq!(searcher.negamax(&mut p, 4, 0, MIN_SCORE, MAX_SCORE), None);
        assert_eq!(*p.board(), before);
        assert!(tt.probe(p.hash()).is_none(), "aborted root is not stored");
    }

    #[test]
    fn test_mate_score_helpers() {
        assert!(is_mate_score(MATE_SCORE - 3));
        assert!(is_mate_score(-MATE_SCORE + 7));
        assert!(!is_mate_score(2_000));
        assert_eq!(mate_distance(-MATE_SCORE + 4), Some(4));
        assert_eq!(mate_distance(150), None);
    }
}
