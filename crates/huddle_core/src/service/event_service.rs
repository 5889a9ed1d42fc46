//! Event use-case service and slot resolution.
//!
//! # Responsibility
//! - Provide event CRUD entry points that stamp creation time from a clock.
//! - Resolve the best-attended candidate slot for an event.
//!
//! # Invariants
//! - Candidate slots are evaluated in the event's stored order; under the
//!   default tie-break the last slot among equals wins.
//! - A resolution with zero attendees is reported as absent, except through
//!   the everyone-attends early exit.
//! - Attendees and non-attendees always partition the population fetched at
//!   resolution time.

use crate::clock::{Clock, SystemClock};
use crate::model::event::{Event, EventId, EventSlot, EventUpdate};
use crate::model::user::{User, UserId};
use crate::repo::event_repo::EventRepository;
use crate::repo::user_repo::UserRepository;
use crate::repo::{RepoError, RepoResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Request model for creating an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    /// Event title stored as-is.
    pub title: String,
    /// Minimum contiguous block length in whole hours.
    pub duration_hours: i64,
    /// Organizing user.
    pub organizer_id: UserId,
    /// Candidate slots in organizer-proposed order.
    pub slots: Vec<EventSlot>,
}

/// Policy applied when candidate slots tie on attendee count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Among tied slots the last one in stored order wins.
    #[default]
    PreferLatest,
    /// Among tied slots the first one in stored order wins.
    PreferEarliest,
}

/// Outcome of resolving an event's candidate slots.
///
/// Derived view; computed on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotResolution {
    /// The winning candidate slot.
    pub slot: EventSlot,
    /// Users able to attend the winning slot, in query order.
    pub attendees: Vec<User>,
    /// Population minus attendees, in population order.
    pub non_attendees: Vec<User>,
}

/// Resolution failure tagged with the phase that could not be served.
#[derive(Debug)]
pub enum ResolveError {
    /// The event could not be fetched.
    FetchEvent(RepoError),
    /// The user population could not be fetched.
    FetchPopulation(RepoError),
    /// The availability query for one candidate slot failed.
    FetchAvailability { slot_index: usize, source: RepoError },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FetchEvent(err) => write!(f, "fetch event: {err}"),
            Self::FetchPopulation(err) => write!(f, "fetch population: {err}"),
            Self::FetchAvailability { slot_index, source } => {
                write!(f, "fetch availability for slot {slot_index}: {source}")
            }
        }
    }
}

impl Error for ResolveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::FetchEvent(err) => Some(err),
            Self::FetchPopulation(err) => Some(err),
            Self::FetchAvailability { source, .. } => Some(source),
        }
    }
}

/// Use-case service for events and slot resolution.
pub struct EventService<E: EventRepository, U: UserRepository, C: Clock = SystemClock> {
    events: E,
    users: U,
    clock: C,
    tie_break: TieBreak,
}

impl<E: EventRepository, U: UserRepository> EventService<E, U> {
    /// Creates a service stamping mutations from the system clock.
    pub fn new(events: E, users: U) -> Self {
        Self::with_clock(events, users, SystemClock)
    }
}

impl<E: EventRepository, U: UserRepository, C: Clock> EventService<E, U, C> {
    /// Creates a service using the provided clock implementation.
    pub fn with_clock(events: E, users: U, clock: C) -> Self {
        Self {
            events,
            users,
            clock,
            tie_break: TieBreak::default(),
        }
    }

    /// Overrides the slot tie-break policy.
    pub fn set_tie_break(&mut self, tie_break: TieBreak) {
        self.tie_break = tie_break;
    }

    /// Creates an event, stamping `created_at` from the clock.
    pub fn create_event(&self, new_event: NewEvent) -> RepoResult<Event> {
        let mut event = Event::new(
            new_event.title,
            new_event.duration_hours,
            new_event.organizer_id,
            new_event.slots,
        );
        event.created_at = self.clock.now_epoch_s();
        self.events.create_event(&event)?;
        Ok(event)
    }

    /// Updates title, duration and slots; organizer and creation time are
    /// preserved. Returns the stored event after the write.
    pub fn update_event(&self, update: &EventUpdate) -> RepoResult<Event> {
        self.events.update_event(update)?;
        self.events
            .get_event(update.id)?
            .ok_or(RepoError::EventNotFound(update.id))
    }

    /// Gets one event by stable ID.
    pub fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        self.events.get_event(id)
    }

    /// Lists events, newest first.
    pub fn list_events(&self) -> RepoResult<Vec<Event>> {
        self.events.list_events()
    }

    /// Deletes one event. Repeat-safe.
    pub fn delete_event(&self, id: EventId) -> RepoResult<()> {
        self.events.delete_event(id)
    }

    /// Picks the best-attended candidate slot for the event.
    ///
    /// Returns `None` when the event is absent, has no candidate slots, or
    /// no slot gathers a single attendee. Callers needing to distinguish
    /// "no usable slot" from "event not found" must check event existence
    /// separately.
    ///
    /// Queries run per slot in stored order and the fold consumes results in
    /// that same order; a concurrent fan-out would have to buffer and
    /// restore it to keep the tie-break stable.
    pub fn resolve_possible_slot(
        &self,
        id: EventId,
    ) -> Result<Option<SlotResolution>, ResolveError> {
        let event = self.events.get_event(id).map_err(ResolveError::FetchEvent)?;
        let event = match event {
            Some(event) if !event.slots.is_empty() => event,
            _ => return Ok(None),
        };

        let population = self
            .users
            .list_users()
            .map_err(ResolveError::FetchPopulation)?;

        let mut best: Option<SlotResolution> = None;
        for (slot_index, slot) in event.slots.iter().enumerate() {
            let attendees = self
                .users
                .users_available_for(slot, event.duration_hours)
                .map_err(|source| ResolveError::FetchAvailability { slot_index, source })?;

            let best_count = best.as_ref().map_or(0, |found| found.attendees.len());
            let replaces = match self.tie_break {
                TieBreak::PreferLatest => attendees.len() >= best_count,
                TieBreak::PreferEarliest => attendees.len() > best_count,
            };
            if !replaces {
                continue;
            }

            let non_attendees = population
                .iter()
                .filter(|user| !attendees.contains(user))
                .cloned()
                .collect::<Vec<_>>();
            let resolution = SlotResolution {
                slot: *slot,
                attendees,
                non_attendees,
            };

            // Everyone attends: no later slot can do better. Returning here
            // also means an empty population resolves to the first winning
            // slot instead of falling through to the zero-attendee check.
            if resolution.attendees.len() == population.len() {
                return Ok(Some(resolution));
            }

            best = Some(resolution);
        }

        Ok(best.filter(|found| !found.attendees.is_empty()))
    }
}
