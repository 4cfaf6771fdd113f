use super::negamax::MATE_THRESHOLD;
use chess::ChessMove;
use log::trace;

/// Node type for transposition table entries
///
/// This is crucial for alpha-beta pruning:
/// - Exact: The exact score for this position
/// - LowerBound: Score is at least this value (beta cutoff)
/// - UpperBound: Score is at most this value (alpha cutoff)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Exact score - position was fully searched
    Exact,
    /// Lower bound - beta cutoff occurred
    LowerBound,
    /// Upper bound - all moves failed low
    UpperBound,
}

impl NodeType {
    /// Classify a fail-soft result against the window it was searched with.
    pub fn classify(score: i32, original_alpha: i32, beta: i32) -> Self {
        if score >= beta {
            NodeType::LowerBound
        } else if score > original_alpha {
            NodeType::Exact
        } else {
            NodeType::UpperBound
        }
    }
}

/// Entry in the transposition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionTableEntry {
    /// Full hash of the position, checked on every probe
    pub hash: u64,
    /// Search depth when this position was evaluated
    pub depth: u8,
    /// Score in centipawns, mate scores relative to this node
    pub score: i32,
    /// Best move found in this position
    pub best_move: Option<ChessMove>,
    pub node_type: NodeType,
}

impl TranspositionTableEntry {
    /// Whether the stored score settles a `(alpha, beta)` search at `depth`
    /// without looking any further.
    pub fn is_cutoff(&self, depth: i32, alpha: i32, beta: i32) -> bool {
        if (self.depth as i32) < depth {
            return false;
        }
        match self.node_type {
            NodeType::Exact => true,
            NodeType::LowerBound => self.score >= beta,
            NodeType::UpperBound => self.score <= alpha,
        }
    }
}

/// Fixed-size, always-replace transposition table.
///
/// Slots are addressed by `hash & mask`. There is no probing and no
/// chaining: a store overwrites whatever sits in its slot, whatever its
/// depth. A probe only answers when the stored hash equals the query hash.
pub struct TranspositionTable {
    entries: Vec<Option<TranspositionTableEntry>>,
    mask: u64,
    /// Statistics: number of successful probes
    pub hits: u64,
    /// Statistics: number of failed probes
    pub misses: u64,
}

impl TranspositionTable {
    /// Create a table with `1 << bits` slots.
    pub fn with_size_log2(bits: u32) -> Self {
        let slots = 1usize << bits;
        let table = Self {
            entries: vec![None; slots],
            mask: (slots - 1) as u64,
            hits: 0,
            misses: 0,
        };
        trace!(
            "transposition table: {} slots, ~{} MiB",
            slots,
            table.memory_usage() / (1024 * 1024)
        );
        table
    }

    #[inline]
    fn index(&self, hash: u64) -> usize {
        (hash & self.mask) as usize
    }

    /// Probe the table for a position
    ///
    /// Returns the entry only if it was stored for exactly this hash.
    /// Updates hit/miss statistics.
    pub fn probe(&mut self, hash: u64) -> Option<TranspositionTableEntry> {
        match self.entries[self.index(hash)] {
            Some(entry) if entry.hash == hash => {
                self.hits += 1;
                Some(entry)
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// Store an entry, unconditionally replacing the slot's occupant.
    pub fn store(&mut self, entry: TranspositionTableEntry) {
        let idx = self.index(entry.hash);
        self.entries[idx] = Some(entry);
    }

    /// Clear the transposition table
    pub fn clear(&mut self) {
        self.entries.fill(None);
        self.hits = 0;
        self.misses = 0;
    }

    /// Number of occupied slots (walks the whole table)
    pub fn size(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Get hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Get memory usage estimate in bytes
    pub fn memory_usage(&self) -> usize {
        self.capacity() * std::mem::size_of::<Option<TranspositionTableEntry>>()
    }
}

/// Mate scores are stored as distance from the storing node rather than from
/// the root, so the entry stays correct when reached at another ply.
pub fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`].
pub fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}
