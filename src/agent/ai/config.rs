//! Search configuration.
//!
//! Every tunable of the engine lives here so that difficulty presets, the
//! command line and tests can all adjust the same knobs.

/// Tunables for one search session.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Transposition table holds `1 << tt_size_log2` entries
    pub tt_size_log2: u32,
    /// Pawn structure cache holds `1 << pawn_cache_size_log2` entries
    pub pawn_cache_size_log2: u32,
    /// Iterative deepening never goes past this depth
    pub max_depth: u8,
    /// Half-width of the aspiration window around the previous score
    pub aspiration_margin: i32,
    /// Budget divisor of the remaining time in the opening (full phase)
    pub opening_time_divisor: u64,
    /// Budget divisor of the remaining time with no pieces left
    pub endgame_time_divisor: u64,
    /// Milliseconds kept back from every budget for move transmission
    pub move_overhead_ms: u64,
    /// Fixed per-move time, overriding the remaining-time budget
    pub move_time_ms: Option<u64>,
    /// Depth reduction applied to the null-move search
    pub null_move_reduction: i32,
    /// Null-move pruning is only tried from this remaining depth up
    pub null_move_min_depth: i32,
    /// Reverse futility margin per remaining ply of depth
    pub reverse_futility_margin: i32,
    /// Futility margins indexed by remaining depth (index 0 unused)
    pub futility_margins: [i32; 4],
    /// Slack added to a capture's gain before quiescence skips it
    pub delta_margin: i32,
    /// Score of a repeated or otherwise drawn position
    pub draw_score: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            tt_size_log2: 23,
            pawn_cache_size_log2: 14,
            max_depth: 64,
            aspiration_margin: 50,
            opening_time_divisor: 30,
            endgame_time_divisor: 20,
            move_overhead_ms: 5,
            move_time_ms: None,
            null_move_reduction: 2,
            null_move_min_depth: 3,
            reverse_futility_margin: 120,
            futility_margins: [0, 150, 300, 500],
            delta_margin: 200,
            draw_score: 0,
        }
    }
}

impl SearchConfig {
    pub fn with_tt_size_log2(mut self, bits: u32) -> Self {
        self.tt_size_log2 = bits;
        self
    }

    pub fn with_pawn_cache_size_log2(mut self, bits: u32) -> Self {
        self.pawn_cache_size_log2 = bits;
        self
    }

    pub fn with_max_depth(mut self, depth: u8) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    pub fn with_move_time_ms(mut self, ms: Option<u64>) -> Self {
        self.move_time_ms = ms;
        self
    }

    pub fn with_draw_score(mut self, score: i32) -> Self {
        self.draw_score = score;
        self
    }

    pub fn with_aspiration_margin(mut self, margin: i32) -> Self {
        self.aspiration_margin = margin;
        self
    }

    /// Largest depth at which futility pruning applies.
    pub fn futility_max_depth(&self) -> i32 {
        self.futility_margins.len() as i32 - 1
    }
}
