//! Time source abstraction for mutation timestamps.
//!
//! # Responsibility
//! - Let services stamp `created_at` without hardwiring the wall clock.
//!
//! # Invariants
//! - `SystemClock` reads fresh time at every call; a long-lived service
//!   never reuses a stale process-start timestamp.

use std::time::{SystemTime, UNIX_EPOCH};

/// Supplies the current time to mutation paths.
pub trait Clock {
    /// Current time in Unix epoch seconds (UTC).
    fn now_epoch_s(&self) -> i64;
}

/// Wall-clock time, read fresh per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_s(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs() as i64)
    }
}

/// Deterministic clock for tests and replay flows.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    /// The frozen instant in Unix epoch seconds.
    pub epoch_s: i64,
}

impl Clock for FixedClock {
    fn now_epoch_s(&self) -> i64 {
        self.epoch_s
    }
}
