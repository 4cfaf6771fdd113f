//! Turn clock seen by the engine.
//!
//! The host owns the real game clock. The engine only needs two readings:
//! how long the current turn has been running and how much time the side to
//! move had left when the turn started.

use std::cell::Cell;
use std::time::Instant;

pub trait Clock {
    /// Milliseconds spent on the current turn so far.
    fn elapsed_millis_this_turn(&self) -> u64;

    /// Milliseconds left on the game clock at the start of this turn.
    fn remaining_millis(&self) -> u64;
}

/// Wall-clock implementation, started when the turn begins.
#[derive(Debug, Clone, Copy)]
pub struct TurnClock {
    started: Instant,
    remaining_ms: u64,
}

impl TurnClock {
    pub fn start(remaining_ms: u64) -> Self {
        Self {
            started: Instant::now(),
            remaining_ms,
        }
    }
}

impl Clock for TurnClock {
    fn elapsed_millis_this_turn(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn remaining_millis(&self) -> u64 {
        self.remaining_ms
    }
}

/// Clock whose elapsed time only moves when told to. Useful for tests and
/// for replaying a turn deterministically.
#[derive(Debug, Default)]
pub struct ManualClock {
    elapsed_ms: Cell<u64>,
    remaining_ms: u64,
}

impl ManualClock {
    pub fn new(remaining_ms: u64) -> Self {
        Self {
            elapsed_ms: Cell::new(0),
            remaining_ms,
        }
    }

    pub fn advance(&self, ms: u64) {
        self.elapsed_ms.set(self.elapsed_ms.get() + ms);
    }
}

impl Clock for ManualClock {
    fn elapsed_millis_this_turn(&self) -> u64 {
        self.elapsed_ms.get()
    }

    fn remaining_millis(&self) -> u64 {
        self.remaining_ms
    }
}
