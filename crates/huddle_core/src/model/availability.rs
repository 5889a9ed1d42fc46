//! Availability window domain model.
//!
//! # Responsibility
//! - Define the user-declared availability interval and its validation.
//!
//! # Invariants
//! - A window qualifies a user for a candidate slot only via the containment
//!   plus strict-span predicate owned by the user store query.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A user-declared interval during which they can attend anything.
///
/// Same shape as an event candidate slot, different role. Keeping a separate
/// type prevents the two from being mixed accidentally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// Unix epoch seconds (UTC). `0` means unset and fails validation.
    pub start_at: i64,
    /// Unix epoch seconds (UTC). `0` means unset and fails validation.
    pub end_at: i64,
}

/// Validation failures for [`AvailabilityWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowValidationError {
    /// Start endpoint is unset.
    UnsetStart,
    /// End endpoint is unset.
    UnsetEnd,
    /// Start is strictly after end.
    ReversedRange { start_at: i64, end_at: i64 },
}

impl Display for WindowValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsetStart => write!(f, "availability window start time is required"),
            Self::UnsetEnd => write!(f, "availability window end time is required"),
            Self::ReversedRange { start_at, end_at } => write!(
                f,
                "availability window start time {start_at} is after end time {end_at}"
            ),
        }
    }
}

impl Error for WindowValidationError {}

impl AvailabilityWindow {
    /// Creates a window from epoch-second endpoints.
    pub fn new(start_at: i64, end_at: i64) -> Self {
        Self { start_at, end_at }
    }

    /// Checks endpoint invariants.
    ///
    /// Equal endpoints (a zero-length window) are accepted.
    pub fn validate(&self) -> Result<(), WindowValidationError> {
        if self.start_at == 0 {
            return Err(WindowValidationError::UnsetStart);
        }
        if self.end_at == 0 {
            return Err(WindowValidationError::UnsetEnd);
        }
        if self.start_at > self.end_at {
            return Err(WindowValidationError::ReversedRange {
                start_at: self.start_at,
                end_at: self.end_at,
            });
        }
        Ok(())
    }

    /// Window span in seconds.
    pub fn span_seconds(&self) -> i64 {
        self.end_at - self.start_at
    }
}
