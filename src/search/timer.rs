//! Search clock and time allocation.
//!
//! `SearchClock` mirrors the teacher's mutex-guarded deadline pair (soft for
//! "stop after this iteration", hard for "stop mid-iteration, no matter
//! what"); `TimeAllocation::compute` is `time_left / max(moves_to_go + 2,
//! 30) + increment`, clipped to `[100ms, time_left / 3]`.

use std::time::{Duration, Instant};

use parking_lot::Mutex;

const DEFAULT_MOVES_TO_GO: u64 = 30;
const MIN_ALLOCATION_MS: u64 = 100;
const SAFETY_MARGIN_MS: u64 = 50;

pub struct SearchClock {
    start: Mutex<Instant>,
    soft_deadline: Mutex<Option<Instant>>,
    hard_deadline: Mutex<Option<Instant>>,
}

impl SearchClock {
    #[must_use]
    pub fn new(start: Instant, soft_deadline: Option<Instant>, hard_deadline: Option<Instant>) -> Self {
        SearchClock {
            start: Mutex::new(start),
            soft_deadline: Mutex::new(soft_deadline),
            hard_deadline: Mutex::new(hard_deadline),
        }
    }

    pub fn reset(&self, start: Instant, soft_deadline: Option<Instant>, hard_deadline: Option<Instant>) {
        *self.start.lock() = start;
        *self.soft_deadline.lock() = soft_deadline;
        *self.hard_deadline.lock() = hard_deadline;
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.start.lock().elapsed()
    }

    /// True once the soft deadline (stop after the current iteration) has
    /// passed.
    #[must_use]
    pub fn soft_expired(&self) -> bool {
        self.soft_deadline.lock().is_some_and(|d| Instant::now() >= d)
    }

    /// True once the hard deadline (abandon the current iteration) has
    /// passed.
    #[must_use]
    pub fn hard_expired(&self) -> bool {
        self.hard_deadline.lock().is_some_and(|d| Instant::now() >= d)
    }
}

/// Soft/hard millisecond budgets for one move, derived from the clock's
/// remaining time, an estimated moves-to-go, and the per-move increment.
pub struct TimeAllocation {
    pub soft_ms: u64,
    pub hard_ms: u64,
}

impl TimeAllocation {
    /// `time_left_ms`/`increment_ms` as reported by the protocol (`wtime`/
    /// `winc` or XBoard's `time`/absent increment); `moves_to_go` is `None`
    /// when the protocol didn't specify a number of moves left to the next
    /// time control, in which case the divisor falls back to
    /// `DEFAULT_MOVES_TO_GO` the same as when a small `moves_to_go` would
    /// otherwise make the divisor too small.
    #[must_use]
    pub fn compute(time_left_ms: u64, increment_ms: u64, moves_to_go: Option<u32>) -> Self {
        let denom = moves_to_go.map_or(DEFAULT_MOVES_TO_GO, |mtg| {
            (u64::from(mtg) + 2).max(DEFAULT_MOVES_TO_GO)
        });
        let soft_ms = (time_left_ms / denom + increment_ms)
            .min((time_left_ms / 3).max(MIN_ALLOCATION_MS))
            .max(MIN_ALLOCATION_MS);
        let hard_ms = (soft_ms * 3)
            .min(time_left_ms.saturating_sub(SAFETY_MARGIN_MS / 2))
            .max(soft_ms);
        TimeAllocation { soft_ms, hard_ms }
    }

    /// A fixed move-time budget (UCI `movetime`), soft and hard coincide.
    #[must_use]
    pub fn fixed(movetime_ms: u64) -> Self {
        TimeAllocation {
            soft_ms: movetime_ms,
            hard_ms: movetime_ms,
        }
    }
}
