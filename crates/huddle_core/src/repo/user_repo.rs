//! User store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide user CRUD and per-user availability persistence.
//! - Own the availability query that powers slot resolution.
//!
//! # Invariants
//! - `replace_availability` swaps the whole window set in a single
//!   transaction; readers never observe a half-written set.
//! - The availability query is read-only and validates its inputs before
//!   touching storage.
//! - Query result order is stable: `name ASC, id ASC`.

use crate::model::availability::AvailabilityWindow;
use crate::model::event::EventSlot;
use crate::model::user::{User, UserId};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const SECONDS_PER_HOUR: i64 = 3600;

const USER_SELECT_SQL: &str = "SELECT id, name, email FROM users";

/// Repository interface for user and availability operations.
pub trait UserRepository {
    /// Creates one user. Validation runs before persistence.
    fn create_user(&self, user: &User) -> RepoResult<UserId>;
    /// Loads one user by id.
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    /// Lists the full user population in stable order.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Lists one user's declared availability windows in stable order.
    fn list_availability(&self, user_id: UserId) -> RepoResult<Vec<AvailabilityWindow>>;
    /// Atomically replaces one user's full availability window set.
    fn replace_availability(
        &self,
        user_id: UserId,
        windows: &[AvailabilityWindow],
    ) -> RepoResult<()>;
    /// Removes all availability windows for one user. Repeat-safe.
    fn clear_availability(&self, user_id: UserId) -> RepoResult<()>;
    /// Returns users holding at least one window that contains `target` and
    /// whose span strictly exceeds `min_duration_hours`.
    fn users_available_for(
        &self,
        target: &EventSlot,
        min_duration_hours: i64,
    ) -> RepoResult<Vec<User>>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, user: &User) -> RepoResult<UserId> {
        user.validate()?;

        self.conn.execute(
            "INSERT INTO users (id, name, email) VALUES (?1, ?2, ?3);",
            params![user.id.to_string(), user.name.as_str(), user.email.as_str()],
        )?;

        Ok(user.id)
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }
        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }

    fn list_availability(&self, user_id: UserId) -> RepoResult<Vec<AvailabilityWindow>> {
        let mut stmt = self.conn.prepare(
            "SELECT start_at, end_at
             FROM users_availability
             WHERE user_id = ?1
             ORDER BY start_at ASC, end_at ASC;",
        )?;
        let mut rows = stmt.query([user_id.to_string()])?;
        let mut windows = Vec::new();
        while let Some(row) = rows.next()? {
            windows.push(AvailabilityWindow {
                start_at: row.get("start_at")?,
                end_at: row.get("end_at")?,
            });
        }
        Ok(windows)
    }

    fn replace_availability(
        &self,
        user_id: UserId,
        windows: &[AvailabilityWindow],
    ) -> RepoResult<()> {
        for window in windows {
            window.validate()?;
        }

        let user_id_text = user_id.to_string();
        // Both repositories share one `&Connection`, so the transaction is
        // started unchecked rather than through `Connection::transaction`.
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !user_exists(&tx, user_id_text.as_str())? {
            return Err(RepoError::UserNotFound(user_id));
        }

        tx.execute(
            "DELETE FROM users_availability WHERE user_id = ?1;",
            [user_id_text.as_str()],
        )?;

        for window in windows {
            tx.execute(
                "INSERT INTO users_availability (user_id, start_at, end_at)
                 VALUES (?1, ?2, ?3);",
                params![user_id_text.as_str(), window.start_at, window.end_at],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    fn clear_availability(&self, user_id: UserId) -> RepoResult<()> {
        self.conn.execute(
            "DELETE FROM users_availability WHERE user_id = ?1;",
            [user_id.to_string()],
        )?;
        Ok(())
    }

    fn users_available_for(
        &self,
        target: &EventSlot,
        min_duration_hours: i64,
    ) -> RepoResult<Vec<User>> {
        target.validate()?;
        if min_duration_hours <= 0 {
            return Err(RepoError::NonPositiveDuration(min_duration_hours));
        }

        // Containment is edge-inclusive; the span test is strict, so a
        // window whose span exactly equals the requested duration does not
        // qualify.
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT u.id, u.name, u.email
             FROM users_availability a
             INNER JOIN users u ON u.id = a.user_id
             WHERE a.start_at <= ?1
               AND a.end_at >= ?2
               AND (a.end_at - a.start_at) > ?3
             ORDER BY u.name ASC, u.id ASC;",
        )?;
        let mut rows = stmt.query(params![
            target.start_at,
            target.end_at,
            min_duration_hours * SECONDS_PER_HOUR,
        ])?;

        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }
        Ok(users)
    }
}

fn user_exists(conn: &Connection, id: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM users WHERE id = ?1;")?;
    Ok(stmt.exists([id])?)
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    let id_text: String = row.get("id")?;
    let user = User {
        id: parse_uuid(&id_text, "users.id")?,
        name: row.get("name")?,
        email: row.get("email")?,
    };
    user.validate()?;
    Ok(user)
}
