//! Wire boundary DTOs for the scheduling core.
//!
//! # Responsibility
//! - Translate wire payloads (intervals as pairs of integer epoch-second
//!   timestamps, IDs as strings) to and from internal types.
//! - Report identifier-parse failures; field validation stays in the model.
//!
//! # Invariants
//! - Missing numeric interval fields decode to `0` and are rejected later
//!   by model validation as unset endpoints.
//! - Response JSON field names are stable wire contract.

use crate::model::availability::AvailabilityWindow;
use crate::model::event::{Event, EventSlot, EventUpdate};
use crate::model::user::User;
use crate::service::event_service::{NewEvent, SlotResolution};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Boundary translation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// An identifier field does not hold a UUID.
    InvalidId { field: &'static str, value: String },
}

impl Display for WireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId { field, value } => write!(f, "invalid {field}: `{value}`"),
        }
    }
}

impl Error for WireError {}

/// Interval DTO carried as epoch seconds in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotDto {
    /// Unix epoch seconds (UTC).
    #[serde(default)]
    pub start_time: i64,
    /// Unix epoch seconds (UTC).
    #[serde(default)]
    pub end_time: i64,
}

impl SlotDto {
    /// Reads the pair as an event candidate slot.
    pub fn to_event_slot(self) -> EventSlot {
        EventSlot::new(self.start_time, self.end_time)
    }

    /// Reads the pair as a user availability window.
    pub fn to_window(self) -> AvailabilityWindow {
        AvailabilityWindow::new(self.start_time, self.end_time)
    }

    /// Renders an event candidate slot.
    pub fn from_event_slot(slot: EventSlot) -> Self {
        Self {
            start_time: slot.start_at,
            end_time: slot.end_at,
        }
    }

    /// Renders a user availability window.
    pub fn from_window(window: AvailabilityWindow) -> Self {
        Self {
            start_time: window.start_at,
            end_time: window.end_at,
        }
    }
}

/// Request payload for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl CreateUserRequest {
    /// Builds the domain user; required-field checks happen at persistence.
    pub fn into_user(self) -> User {
        User::new(self.name, self.email)
    }
}

/// Request payload for creating an event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration_hours: i64,
    #[serde(default)]
    pub organizer_id: String,
    #[serde(default)]
    pub slots: Vec<SlotDto>,
}

impl CreateEventRequest {
    /// Parses the organizer ID and translates slot timestamps.
    pub fn into_new_event(self) -> Result<NewEvent, WireError> {
        let organizer_id = parse_id("organizer_id", &self.organizer_id)?;
        Ok(NewEvent {
            title: self.title,
            duration_hours: self.duration_hours,
            organizer_id,
            slots: self
                .slots
                .into_iter()
                .map(SlotDto::to_event_slot)
                .collect(),
        })
    }
}

/// Request payload for updating an event.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEventRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub duration_hours: i64,
    #[serde(default)]
    pub slots: Vec<SlotDto>,
}

impl UpdateEventRequest {
    /// Binds the payload to a target event ID from the request path.
    pub fn into_event_update(self, event_id: &str) -> Result<EventUpdate, WireError> {
        let id = parse_id("event_id", event_id)?;
        Ok(EventUpdate {
            id,
            title: self.title,
            duration_hours: self.duration_hours,
            slots: self
                .slots
                .into_iter()
                .map(SlotDto::to_event_slot)
                .collect(),
        })
    }
}

/// Request payload for replacing a user's availability windows.
#[derive(Debug, Clone, Deserialize)]
pub struct SetAvailabilityRequest {
    #[serde(default)]
    pub slots: Vec<SlotDto>,
}

impl SetAvailabilityRequest {
    /// Translates slot timestamps into availability windows.
    pub fn into_windows(self) -> Vec<AvailabilityWindow> {
        self.slots.into_iter().map(SlotDto::to_window).collect()
    }
}

/// User response DTO.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserDto {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl UserDto {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Event response DTO with epoch-second timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventDto {
    pub id: String,
    pub title: String,
    pub duration_hours: i64,
    pub organizer_id: String,
    pub slots: Vec<SlotDto>,
    pub created_at: i64,
}

impl EventDto {
    pub fn from_event(event: &Event) -> Self {
        Self {
            id: event.id.to_string(),
            title: event.title.clone(),
            duration_hours: event.duration_hours,
            organizer_id: event.organizer_id.to_string(),
            slots: event
                .slots
                .iter()
                .copied()
                .map(SlotDto::from_event_slot)
                .collect(),
            created_at: event.created_at,
        }
    }
}

/// Resolution response DTO.
///
/// Field names follow the established wire contract; empty user lists are
/// omitted from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionDto {
    pub slot: SlotDto,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<UserDto>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub not_working_users: Vec<UserDto>,
}

impl ResolutionDto {
    pub fn from_resolution(resolution: &SlotResolution) -> Self {
        Self {
            slot: SlotDto::from_event_slot(resolution.slot),
            users: resolution.attendees.iter().map(UserDto::from_user).collect(),
            not_working_users: resolution
                .non_attendees
                .iter()
                .map(UserDto::from_user)
                .collect(),
        }
    }
}

fn parse_id(field: &'static str, value: &str) -> Result<Uuid, WireError> {
    Uuid::parse_str(value).map_err(|_| WireError::InvalidId {
        field,
        value: value.to_string(),
    })
}
