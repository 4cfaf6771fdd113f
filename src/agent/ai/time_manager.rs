// Time management for one turn
//
// The budget is a fraction of the remaining game time. The fraction grows as
// material comes off the board: fewer moves are left to play, so each one
// may take a larger share.

use super::config::SearchConfig;
use super::evaluation::MAX_PHASE;
use crate::clock::Clock;

/// Per-turn time budget over a host clock
pub struct TimeManager<'a> {
    clock: &'a dyn Clock,
    budget_ms: u64,
}

impl<'a> TimeManager<'a> {
    pub fn new(clock: &'a dyn Clock, config: &SearchConfig, phase: i32) -> Self {
        let budget_ms = compute_budget(clock.remaining_millis(), phase, config);
        Self { clock, budget_ms }
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed_millis_this_turn()
    }

    /// The running search must unwind.
    pub fn budget_exceeded(&self) -> bool {
        self.elapsed_ms() >= self.budget_ms
    }

    /// A deeper iteration costs several times the previous one. Once half
    /// the budget is gone it would almost surely be cut short, so it is not
    /// started at all.
    pub fn should_start_next_depth(&self) -> bool {
        self.elapsed_ms() < self.budget_ms / 2
    }
}

/// Milliseconds to spend on this move.
///
/// `phase` runs from `MAX_PHASE` (opening) to 0 (bare kings and pawns).
/// A fixed move time in the config replaces the remaining-time fraction,
/// but never exceeds the endgame share of the remaining time, so a short
/// clock is not spent on a single move.
pub fn compute_budget(remaining_ms: u64, phase: i32, config: &SearchConfig) -> u64 {
    let raw = match config.move_time_ms {
        Some(fixed) => fixed.min(remaining_ms / config.endgame_time_divisor.max(1)),
        None => {
            let phase = phase.clamp(0, MAX_PHASE) as u64;
            let opening = config.opening_time_divisor;
            let endgame = config.endgame_time_divisor;
            // Linear between the two divisors
            let divisor = endgame as i64
                + (opening as i64 - endgame as i64) * phase as i64 / MAX_PHASE as i64;
            remaining_ms / (divisor.max(1) as u64)
        }
    };
    raw.saturating_sub(config.move_overhead_ms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn test_opening_budget_uses_opening_divisor() {
        let config = SearchConfig::default();
        assert_eq!(compute_budget(60_000, MAX_PHASE, &config), 60_000 / 30 - 5);
    }

    #[test]
    fn test_endgame_allows_larger_fraction() {
        let config = SearchConfig::default();
        let opening = compute_budget(60_000, MAX_PHASE, &config);
        let endgame = compute_budget(60_000, 0, &config);
        assert_eq!(endgame, 60_000 / 20 - 5);
        assert!(endgame > opening);
    }

    #[test]
    fn test_budget_shrinks_with_remaining_time() {
        let config = SearchConfig::default();
        let mut last = u64::MAX;
        for remaining in [120_000, 60_000, 10_000, 1_000] {
            let budget = compute_budget(remaining, 12, &config);
            assert!(budget < last);
            last = budget;
        }
    }

    #[test]
    fn test_tiny_remaining_time_gives_zero_budget() {
        let config = SearchConfig::default();
        assert_eq!(compute_budget(1, MAX_PHASE, &config), 0);
    }

    #[test]
    fn test_fixed_move_time() {
        let config = SearchConfig::default().with_move_time_ms(Some(500));
        assert_eq!(compute_budget(60_000, MAX_PHASE, &config), 495);
        // A short clock caps it at the endgame share
        assert_eq!(compute_budget(2_000, MAX_PHASE, &config), 2_000 / 20 - 5);
    }

    #[test]
    fn test_fixed_move_time_keeps_clock_in_reserve() {
        let config = SearchConfig::default().with_move_time_ms(Some(5_000));
        let budget = compute_budget(5_000, MAX_PHASE, &config);
        assert_eq!(budget, 5_000 / 20 - 5);
        assert!(budget <= compute_budget(5_000, 0, &SearchConfig::default()));
    }

    #[test]
    fn test_deadline_checks() {
        let config = SearchConfig::default().with_move_time_ms(Some(105));
        let clock = ManualClock::new(60_000);
        let time = TimeManager::new(&clock, &config, MAX_PHASE);
        assert_eq!(time.budget_ms(), 100);

        assert!(time.should_start_next_depth());
        clock.advance(50);
        assert!(!time.should_start_next_depth());
        assert!(!time.budget_exceeded());
        clock.advance(50);
        assert!(time.budget_exceeded());
    }
}
