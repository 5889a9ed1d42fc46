//! Core domain logic for Huddle meeting scheduling.
//! This crate is the single source of truth for scheduling invariants.

pub mod clock;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::availability::{AvailabilityWindow, WindowValidationError};
pub use model::event::{
    Event, EventId, EventSlot, EventUpdate, EventValidationError, SlotValidationError,
};
pub use model::user::{User, UserId, UserValidationError};
pub use repo::event_repo::{EventRepository, SqliteEventRepository};
pub use repo::user_repo::{SqliteUserRepository, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::event_service::{
    EventService, NewEvent, ResolveError, SlotResolution, TieBreak,
};
pub use service::user_service::UserService;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
