// Iterative Deepening Search Orchestrator
//
// Searches depth 1, 2, 3, ... until the time budget or the depth cap stops
// it. Each completed depth leaves its best root move in the transposition
// table, which both orders the next iteration and is the move we play.
// From depth 2 on, the previous score seeds an aspiration window; a result
// outside it is re-searched once with the full window.

use super::config::SearchConfig;
use super::evaluation::{game_phase, Evaluator};
use super::move_ordering::KillerMoves;
use super::negamax::{is_mate_score, mate_distance, Searcher, MATE_SCORE, MAX_SCORE, MIN_SCORE};
use super::time_manager::TimeManager;
use super::transposition_table::TranspositionTable;
use crate::clock::Clock;
use crate::game_repr::{Move, Position};
use log::{debug, info};

/// Result of a search operation
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    pub best_move: Option<Move>,
    pub score: i32,
    /// Last fully completed depth (0 when none completed)
    pub depth: u8,
    pub nodes_searched: u64,
    pub qnodes: u64,
    pub tt_hits: u64,
    pub aspiration_researches: u64,
    pub time_ms: u64,
}

impl SearchResult {
    pub fn nps(&self) -> u64 {
        let nodes = self.nodes_searched + self.qnodes;
        if self.time_ms > 0 {
            nodes * 1000 / self.time_ms
        } else {
            nodes
        }
    }
}

/// Search session: the tables that live across turns and games.
pub struct Engine {
    tt: TranspositionTable,
    killers: KillerMoves,
    evaluator: Evaluator,
    config: SearchConfig,
}

impl Engine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            tt: TranspositionTable::with_size_log2(config.tt_size_log2),
            killers: KillerMoves::new(),
            evaluator: Evaluator::new(config.pawn_cache_size_log2),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn transposition_table_mut(&mut self) -> &mut TranspositionTable {
        &mut self.tt
    }

    /// Forget game-specific ordering hints. Cached search results stay.
    pub fn new_game(&mut self) {
        self.killers.clear();
    }

    /// Pick a move for the side to move. `None` only when there is no legal
    /// move at all.
    pub fn choose_move(&mut self, pos: &mut Position, clock: &dyn Clock) -> Option<Move> {
        let moves = pos.legal_moves(false);
        match moves.len() {
            0 => None,
            1 => Some(moves[0]),
            _ => self.think(pos, clock).best_move,
        }
    }

    /// Run iterative deepening and report what was found.
    pub fn think(&mut self, pos: &mut Position, clock: &dyn Clock) -> SearchResult {
        let root_moves = pos.legal_moves(false);
        let mut result = SearchResult {
            best_move: root_moves.first().copied(),
            ..SearchResult::default()
        };

        if root_moves.is_empty() {
            result.score = if pos.is_in_check() { -MATE_SCORE } else { 0 };
            return result;
        }

        let time = TimeManager::new(clock, &self.config, game_phase(pos.board()));
        debug!(
            "time budget {} ms of {} ms remaining",
            time.budget_ms(),
            clock.remaining_millis()
        );

        let mut searcher = Searcher::new(
            &mut self.tt,
            &mut self.killers,
            &mut self.evaluator,
            &self.config,
            time,
        );
        let hash = pos.hash();
        let mut previous = None;

        for depth in 1..=self.config.max_depth {
            if depth > 1 && !searcher.time.should_start_next_depth() {
                debug!(
                    "not starting depth {}: {} of {} ms used",
                    depth,
                    searcher.time.elapsed_ms(),
                    searcher.time.budget_ms()
                );
                break;
            }

            let Some(score) = aspiration_search(&mut searcher, pos, depth as i32, previous) else {
                debug!("depth {} aborted after {} ms", depth, searcher.time.elapsed_ms());
                break;
            };

            let root_entry = searcher.tt.probe(hash).and_then(|entry| entry.best_move);
            if let Some(mv) = root_entry.and_then(|raw| root_move(&root_moves, raw)) {
                result.best_move = Some(mv);
            }
            result.score = score;
            result.depth = depth;
            previous = Some(score);

            result.nodes_searched = searcher.stats.nodes;
            result.qnodes = searcher.stats.qnodes;
            result.time_ms = searcher.time.elapsed_ms();
            info!(
                "depth {} score {} nodes {} time {} nps {} pv {}",
                depth,
                format_score(score),
                result.nodes_searched + result.qnodes,
                result.time_ms,
                result.nps(),
                result
                    .best_move
                    .map_or_else(|| "(none)".to_string(), |mv| mv.to_string())
            );

            // Nothing deeper can change a forced mate
            if is_mate_score(score) {
                break;
            }
        }

        result.nodes_searched = searcher.stats.nodes;
        result.qnodes = searcher.stats.qnodes;
        result.tt_hits = searcher.stats.tt_hits;
        result.aspiration_researches = searcher.stats.aspiration_researches;
        result.time_ms = searcher.time.elapsed_ms();

        let pawns = searcher.evaluator.pawn_cache();
        debug!(
            "tt hit rate {:.1}%, {} tt cutoffs, {} null cutoffs, pawn cache {}/{} hits",
            searcher.tt.hit_rate() * 100.0,
            searcher.stats.tt_cutoffs,
            searcher.stats.null_cutoffs,
            pawns.hits,
            pawns.hits + pawns.misses
        );
        result
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// The table's root move, if it is actually legal here. A slot collision can
/// leave another position's move behind.
fn root_move(root_moves: &[Move], raw: chess::ChessMove) -> Option<Move> {
    root_moves.iter().copied().find(|mv| *mv == raw)
}

fn aspiration_search(
    searcher: &mut Searcher<'_>,
    pos: &mut Position,
    depth: i32,
    previous: Option<i32>,
) -> Option<i32> {
    let guess = match previous {
        Some(score) if !is_mate_score(score) => score,
        _ => return searcher.negamax(pos, depth, 0, MIN_SCORE, MAX_SCORE),
    };

    let margin = searcher.config.aspiration_margin;
    let (alpha, beta) = (guess - margin, guess + margin);
    let score = searcher.negamax(pos, depth, 0, alpha, beta)?;
    if score > alpha && score < beta {
        return Some(score);
    }

    debug!(
        "aspiration window [{}, {}] failed with {} at depth {}, re-searching",
        alpha, beta, score, depth
    );
    searcher.stats.aspiration_researches += 1;
    searcher.negamax(pos, depth, 0, MIN_SCORE, MAX_SCORE)
}

/// `cp 35` for ordinary scores, `mate 3` / `mate -2` in moves for mates.
fn format_score(score: i32) -> String {
    match mate_distance(score) {
        Some(plies) => {
            let moves = (plies + 1) / 2;
            format!("mate {}", if score > 0 { moves } else { -moves })
        }
        None => format!("cp {}", score),
    }
}
