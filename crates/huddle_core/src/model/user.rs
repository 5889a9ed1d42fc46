//! User domain model.
//!
//! # Responsibility
//! - Define the participant record and its validation rules.
//!
//! # Invariants
//! - `id` is stable and never reused for another user.
//! - Users are immutable once created; there is no update operation.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a user.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type UserId = Uuid;

/// A meeting participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable global ID used for linking and auditing.
    pub id: UserId,
    /// Display name. Must be non-empty.
    pub name: String,
    /// Contact email. Must be non-empty.
    pub email: String,
}

/// Validation failures for [`User`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserValidationError {
    /// `id` is the nil UUID.
    NilId,
    /// `name` is empty.
    EmptyName,
    /// `email` is empty.
    EmptyEmail,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "user id is required"),
            Self::EmptyName => write!(f, "user name is required"),
            Self::EmptyEmail => write!(f, "user email is required"),
        }
    }
}

impl Error for UserValidationError {}

impl User {
    /// Creates a new user with a generated stable ID.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, email)
    }

    /// Creates a user with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: UserId, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
        }
    }

    /// Checks required-field invariants.
    pub fn validate(&self) -> Result<(), UserValidationError> {
        if self.id.is_nil() {
            return Err(UserValidationError::NilId);
        }
        if self.name.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if self.email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        Ok(())
    }
}
