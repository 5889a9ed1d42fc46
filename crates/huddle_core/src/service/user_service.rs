//! User use-case service.
//!
//! # Responsibility
//! - Provide user create/read APIs and availability set/clear/query APIs.
//! - Delegate persistence to the user repository contract.
//!
//! # Invariants
//! - Service APIs never bypass repository validation contracts.
//! - Setting availability has replacing semantics: the previous window set
//!   is gone once the call returns.

use crate::model::availability::AvailabilityWindow;
use crate::model::event::EventSlot;
use crate::model::user::{User, UserId};
use crate::repo::user_repo::UserRepository;
use crate::repo::RepoResult;

/// Use-case service wrapper for user and availability operations.
pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a new user from name and email.
    pub fn create_user(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> RepoResult<User> {
        let user = User::new(name, email);
        self.repo.create_user(&user)?;
        Ok(user)
    }

    /// Gets one user by stable ID.
    pub fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }

    /// Lists the full user population in stable order.
    pub fn list_users(&self) -> RepoResult<Vec<User>> {
        self.repo.list_users()
    }

    /// Atomically replaces the full availability window set for one user.
    pub fn set_availability(
        &self,
        user_id: UserId,
        windows: &[AvailabilityWindow],
    ) -> RepoResult<()> {
        self.repo.replace_availability(user_id, windows)
    }

    /// Removes all availability windows for one user.
    pub fn clear_availability(&self, user_id: UserId) -> RepoResult<()> {
        self.repo.clear_availability(user_id)
    }

    /// Lists one user's declared availability windows.
    pub fn list_availability(&self, user_id: UserId) -> RepoResult<Vec<AvailabilityWindow>> {
        self.repo.list_availability(user_id)
    }

    /// Returns users able to attend `target` for more than
    /// `min_duration_hours` contiguous hours.
    pub fn users_available_for(
        &self,
        target: &EventSlot,
        min_duration_hours: i64,
    ) -> RepoResult<Vec<User>> {
        self.repo.users_available_for(target, min_duration_hours)
    }
}
