//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts for users and events.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository writes must run model validation before SQL mutations.
//! - Repository APIs return semantic errors (`UserNotFound`, `EventNotFound`)
//!   in addition to DB transport errors.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::availability::WindowValidationError;
use crate::model::event::{EventId, EventValidationError, SlotValidationError};
use crate::model::user::{UserId, UserValidationError};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod event_repo;
pub mod user_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// A user record failed validation.
    User(UserValidationError),
    /// An event record failed validation.
    Event(EventValidationError),
    /// A candidate slot failed validation.
    Slot(SlotValidationError),
    /// An availability window failed validation.
    Window(WindowValidationError),
    /// Availability query requested a zero or negative minimum duration.
    NonPositiveDuration(i64),
    /// Target user does not exist.
    UserNotFound(UserId),
    /// Target event does not exist.
    EventNotFound(EventId),
    /// Persisted data cannot be converted to a valid read model.
    InvalidData(String),
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::User(err) => write!(f, "{err}"),
            Self::Event(err) => write!(f, "{err}"),
            Self::Slot(err) => write!(f, "{err}"),
            Self::Window(err) => write!(f, "{err}"),
            Self::NonPositiveDuration(hours) => {
                write!(f, "minimum duration must be positive hours, got {hours}")
            }
            Self::UserNotFound(id) => write!(f, "user not found: {id}"),
            Self::EventNotFound(id) => write!(f, "event not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "repository requires table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::User(err) => Some(err),
            Self::Event(err) => Some(err),
            Self::Slot(err) => Some(err),
            Self::Window(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<UserValidationError> for RepoError {
    fn from(value: UserValidationError) -> Self {
        Self::User(value)
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Event(value)
    }
}

impl From<SlotValidationError> for RepoError {
    fn from(value: SlotValidationError) -> Self {
        Self::Slot(value)
    }
}

impl From<WindowValidationError> for RepoError {
    fn from(value: WindowValidationError) -> Self {
        Self::Window(value)
    }
}

const REQUIRED_TABLES: &[&str] = &["users", "users_availability", "events", "event_slots"];

/// Verifies the connection carries the migrated scheduling schema.
///
/// Called by repository constructors so every later query can assume the
/// expected tables exist.
pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in REQUIRED_TABLES.iter().copied() {
        let mut stmt =
            conn.prepare("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;")?;
        if !stmt.exists([table])? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

pub(crate) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}
