//! Event domain model.
//!
//! # Responsibility
//! - Define the event record, its candidate slots and validation rules.
//!
//! # Invariants
//! - `slots` order is significant: it is the stored candidate order used by
//!   slot resolution tie-breaking and must survive persistence round-trips.
//! - `duration_hours` is the minimum contiguous block the event requires.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an event.
pub type EventId = Uuid;

/// An organizer-proposed candidate interval for an event.
///
/// Structurally identical to an availability window but semantically a
/// different role; the two types are kept distinct on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSlot {
    /// Unix epoch seconds (UTC). `0` means unset and fails validation.
    pub start_at: i64,
    /// Unix epoch seconds (UTC). `0` means unset and fails validation.
    pub end_at: i64,
}

/// Validation failures for [`EventSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotValidationError {
    /// Start endpoint is unset.
    UnsetStart,
    /// End endpoint is unset.
    UnsetEnd,
    /// Start is strictly after end.
    ReversedRange { start_at: i64, end_at: i64 },
}

impl Display for SlotValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsetStart => write!(f, "slot start time is required"),
            Self::UnsetEnd => write!(f, "slot end time is required"),
            Self::ReversedRange { start_at, end_at } => {
                write!(f, "slot start time {start_at} is after end time {end_at}")
            }
        }
    }
}

impl Error for SlotValidationError {}

impl EventSlot {
    /// Creates a slot from epoch-second endpoints.
    pub fn new(start_at: i64, end_at: i64) -> Self {
        Self { start_at, end_at }
    }

    /// Checks endpoint invariants.
    ///
    /// Equal endpoints (a zero-length slot) are accepted.
    pub fn validate(&self) -> Result<(), SlotValidationError> {
        if self.start_at == 0 {
            return Err(SlotValidationError::UnsetStart);
        }
        if self.end_at == 0 {
            return Err(SlotValidationError::UnsetEnd);
        }
        if self.start_at > self.end_at {
            return Err(SlotValidationError::ReversedRange {
                start_at: self.start_at,
                end_at: self.end_at,
            });
        }
        Ok(())
    }

    /// Slot span in seconds.
    pub fn span_seconds(&self) -> i64 {
        self.end_at - self.start_at
    }
}

/// An event with organizer-proposed candidate slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Stable global ID.
    pub id: EventId,
    /// Event title. Must be non-empty.
    pub title: String,
    /// Minimum contiguous block length in whole hours. Must be positive.
    pub duration_hours: i64,
    /// Organizing user. Must be non-nil.
    pub organizer_id: UserId,
    /// Candidate slots in organizer-proposed order.
    pub slots: Vec<EventSlot>,
    /// Unix epoch seconds (UTC) set once at creation.
    pub created_at: i64,
}

/// Validation failures for [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventValidationError {
    /// `title` is empty.
    EmptyTitle,
    /// `duration_hours` is zero or negative.
    NonPositiveDuration(i64),
    /// `organizer_id` is the nil UUID.
    NilOrganizer,
    /// A candidate slot failed its own validation.
    InvalidSlot {
        index: usize,
        source: SlotValidationError,
    },
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title is required"),
            Self::NonPositiveDuration(hours) => {
                write!(f, "event duration must be positive hours, got {hours}")
            }
            Self::NilOrganizer => write!(f, "event organizer id is required"),
            Self::InvalidSlot { index, source } => {
                write!(f, "invalid slot at index {index}: {source}")
            }
        }
    }
}

impl Error for EventValidationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidSlot { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl Event {
    /// Creates a new event with a generated stable ID.
    ///
    /// `created_at` starts at `0`; services stamp it from their clock before
    /// persistence.
    pub fn new(
        title: impl Into<String>,
        duration_hours: i64,
        organizer_id: UserId,
        slots: Vec<EventSlot>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            duration_hours,
            organizer_id,
            slots,
            created_at: 0,
        }
    }

    /// Checks required-field and per-slot invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if self.duration_hours <= 0 {
            return Err(EventValidationError::NonPositiveDuration(
                self.duration_hours,
            ));
        }
        if self.organizer_id.is_nil() {
            return Err(EventValidationError::NilOrganizer);
        }
        validate_slots(&self.slots)
    }
}

/// Mutable subset of an event for update operations.
///
/// Organizer and creation timestamp are immutable and intentionally absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventUpdate {
    /// Target event.
    pub id: EventId,
    /// Replacement title. Must be non-empty.
    pub title: String,
    /// Replacement duration. Must be positive.
    pub duration_hours: i64,
    /// Replacement candidate slots, in organizer-proposed order.
    pub slots: Vec<EventSlot>,
}

impl EventUpdate {
    /// Checks the same field invariants as [`Event::validate`] minus the
    /// immutable organizer.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.title.is_empty() {
            return Err(EventValidationError::EmptyTitle);
        }
        if self.duration_hours <= 0 {
            return Err(EventValidationError::NonPositiveDuration(
                self.duration_hours,
            ));
        }
        validate_slots(&self.slots)
    }
}

fn validate_slots(slots: &[EventSlot]) -> Result<(), EventValidationError> {
    for (index, slot) in slots.iter().enumerate() {
        if let Err(source) = slot.validate() {
            return Err(EventValidationError::InvalidSlot { index, source });
        }
    }
    Ok(())
}
