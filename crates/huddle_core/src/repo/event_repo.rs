//! Event store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide event CRUD over the `events` and `event_slots` tables.
//! - Keep candidate slot order stable across persistence round-trips.
//!
//! # Invariants
//! - Slots are written and read through `sort_order`; the loaded slot
//!   sequence equals the stored sequence.
//! - `update_event` never changes `organizer_id` or `created_at`.
//! - Event writes happen inside a single transaction together with their
//!   slot rows.

use crate::model::event::{Event, EventId, EventSlot, EventUpdate};
use crate::repo::{ensure_connection_ready, parse_uuid, RepoError, RepoResult};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};

const EVENT_SELECT_SQL: &str =
    "SELECT id, title, duration_hours, organizer_id, created_at FROM events";

/// Repository interface for event CRUD operations.
pub trait EventRepository {
    /// Creates one event with its candidate slots. Validation runs before
    /// persistence; the organizer must exist.
    fn create_event(&self, event: &Event) -> RepoResult<EventId>;
    /// Updates title, duration and slots of one event.
    fn update_event(&self, update: &EventUpdate) -> RepoResult<()>;
    /// Loads one event with slots in stored order.
    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>>;
    /// Lists events, newest first.
    fn list_events(&self) -> RepoResult<Vec<Event>>;
    /// Removes one event and its slots. Repeat-safe.
    fn delete_event(&self, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<EventId> {
        event.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !organizer_exists(&tx, &event.organizer_id.to_string())? {
            return Err(RepoError::UserNotFound(event.organizer_id));
        }

        tx.execute(
            "INSERT INTO events (id, title, duration_hours, organizer_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                event.id.to_string(),
                event.title.as_str(),
                event.duration_hours,
                event.organizer_id.to_string(),
                event.created_at,
            ],
        )?;
        insert_slots(&tx, event.id, &event.slots)?;

        tx.commit()?;
        Ok(event.id)
    }

    fn update_event(&self, update: &EventUpdate) -> RepoResult<()> {
        update.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        let changed = tx.execute(
            "UPDATE events SET title = ?2, duration_hours = ?3 WHERE id = ?1;",
            params![
                update.id.to_string(),
                update.title.as_str(),
                update.duration_hours,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::EventNotFound(update.id));
        }

        tx.execute(
            "DELETE FROM event_slots WHERE event_id = ?1;",
            [update.id.to_string()],
        )?;
        insert_slots(&tx, update.id, &update.slots)?;

        tx.commit()?;
        Ok(())
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<Event>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            let mut event = parse_event_row(row)?;
            event.slots = load_slots(self.conn, event.id)?;
            event.validate()?;
            return Ok(Some(event));
        }
        Ok(None)
    }

    fn list_events(&self) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL} ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;

        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        for event in &mut events {
            event.slots = load_slots(self.conn, event.id)?;
            event.validate()?;
        }
        Ok(events)
    }

    fn delete_event(&self, id: EventId) -> RepoResult<()> {
        // Slot rows go via cascade; deleting a missing event is a no-op.
        self.conn
            .execute("DELETE FROM events WHERE id = ?1;", [id.to_string()])?;
        Ok(())
    }
}

fn organizer_exists(conn: &Connection, id: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare("SELECT 1 FROM users WHERE id = ?1;")?;
    Ok(stmt.exists([id])?)
}

fn insert_slots(tx: &Transaction<'_>, event_id: EventId, slots: &[EventSlot]) -> RepoResult<()> {
    let event_id_text = event_id.to_string();
    for (index, slot) in slots.iter().enumerate() {
        tx.execute(
            "INSERT INTO event_slots (event_id, sort_order, start_at, end_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                event_id_text.as_str(),
                index as i64,
                slot.start_at,
                slot.end_at,
            ],
        )?;
    }
    Ok(())
}

fn load_slots(conn: &Connection, event_id: EventId) -> RepoResult<Vec<EventSlot>> {
    let mut stmt = conn.prepare(
        "SELECT start_at, end_at
         FROM event_slots
         WHERE event_id = ?1
         ORDER BY sort_order ASC;",
    )?;
    let mut rows = stmt.query([event_id.to_string()])?;
    let mut slots = Vec::new();
    while let Some(row) = rows.next()? {
        slots.push(EventSlot {
            start_at: row.get("start_at")?,
            end_at: row.get("end_at")?,
        });
    }
    Ok(slots)
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id_text: String = row.get("id")?;
    let organizer_text: String = row.get("organizer_id")?;
    Ok(Event {
        id: parse_uuid(&id_text, "events.id")?,
        title: row.get("title")?,
        duration_hours: row.get("duration_hours")?,
        organizer_id: parse_uuid(&organizer_text, "events.organizer_id")?,
        slots: Vec::new(),
        created_at: row.get("created_at")?,
    })
}
