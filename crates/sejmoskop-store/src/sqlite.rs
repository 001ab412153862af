//! SQLite storage for bills and their derived stage events.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tracing::info;

use sejmoskop_core::{BillStatus, Event};

use crate::StoreError;

/// SQLite-backed store for the sync pipeline's output.
///
/// Two tables: `bills` (one row per bill, keyed by term + print number,
/// carrying the derived status) and `bill_events` (the flattened, sorted
/// timeline). Event rows have no identity of their own beyond the generated
/// id — each sync pass replaces a bill's rows wholesale.
///
/// Supports both in-memory (ephemeral) and persistent (file-backed) modes.
/// Use [`open`](Self::open) for in-memory and [`open_persistent`](Self::open_persistent)
/// for file-backed storage.
pub struct BillStore {
    conn: Connection,
}

impl BillStore {
    /// Open an in-memory database with the schema applied.
    pub fn open() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    /// Open or create a persistent database at the given path.
    pub fn open_persistent(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS bills (
                term        INTEGER NOT NULL,
                number      TEXT NOT NULL,
                title       TEXT NOT NULL DEFAULT '',
                status      TEXT NOT NULL DEFAULT 'submitted',
                PRIMARY KEY (term, number)
            );
            CREATE TABLE IF NOT EXISTS bill_events (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                term        INTEGER NOT NULL,
                bill_number TEXT NOT NULL,
                event_date  TEXT NOT NULL,
                event_type  TEXT NOT NULL,
                description TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_bill_events_bill
                ON bill_events (term, bill_number);",
        )?;
        Ok(Self { conn })
    }

    /// Insert a bill row or refresh its title if it already exists.
    pub fn upsert_bill(&self, term: i64, number: &str, title: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO bills (term, number, title) VALUES (?1, ?2, ?3)
             ON CONFLICT (term, number) DO UPDATE SET title = excluded.title",
            params![term, number, title],
        )?;
        Ok(())
    }

    /// Replace a bill's event rows with the given list, atomically.
    ///
    /// Delete-all-then-reinsert: the incoming list is a complete snapshot of
    /// the bill's timeline, never a delta to merge. Insertion order is
    /// preserved, so handing over a date-sorted list keeps `get_events`
    /// chronological.
    pub fn replace_events(
        &mut self,
        term: i64,
        number: &str,
        events: &[Event],
    ) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "DELETE FROM bill_events WHERE term = ?1 AND bill_number = ?2",
            params![term, number],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO bill_events (term, bill_number, event_date, event_type, description)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for event in events {
                stmt.execute(params![
                    term,
                    number,
                    event.event_date,
                    event.event_type,
                    event.description,
                ])?;
            }
        }
        tx.commit()?;
        info!(term, number, count = events.len(), "replaced bill events");
        Ok(())
    }

    /// Write the derived status for a bill.
    pub fn set_status(
        &self,
        term: i64,
        number: &str,
        status: BillStatus,
    ) -> Result<(), StoreError> {
        let changed = self.conn.execute(
            "UPDATE bills SET status = ?3 WHERE term = ?1 AND number = ?2",
            params![term, number, status.as_str()],
        )?;
        if changed == 0 {
            return Err(StoreError::BillNotFound {
                term,
                number: number.to_string(),
            });
        }
        Ok(())
    }

    /// Read a bill's stored status.
    pub fn get_status(&self, term: i64, number: &str) -> Result<BillStatus, StoreError> {
        let raw: Option<String> = self
            .conn
            .query_row(
                "SELECT status FROM bills WHERE term = ?1 AND number = ?2",
                params![term, number],
                |row| row.get(0),
            )
            .optional()?;
        let raw = raw.ok_or_else(|| StoreError::BillNotFound {
            term,
            number: number.to_string(),
        })?;
        Ok(raw.parse()?)
    }

    /// Read a bill's title.
    pub fn get_title(&self, term: i64, number: &str) -> Result<String, StoreError> {
        self.conn
            .query_row(
                "SELECT title FROM bills WHERE term = ?1 AND number = ?2",
                params![term, number],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| StoreError::BillNotFound {
                term,
                number: number.to_string(),
            })
    }

    /// Read a bill's event rows in insertion (chronological) order.
    pub fn get_events(&self, term: i64, number: &str) -> Result<Vec<Event>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT event_type, event_date, description FROM bill_events
             WHERE term = ?1 AND bill_number = ?2 ORDER BY id",
        )?;
        let rows = stmt.query_map(params![term, number], |row| {
            Ok(Event {
                event_type: row.get(0)?,
                event_date: row.get(1)?,
                description: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Number of rows in the `bills` table.
    pub fn bill_count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT count(*) FROM bills", [], |row| row.get(0))?;
        Ok(n as usize)
    }

    /// Number of rows in the `bill_events` table.
    pub fn event_count(&self) -> Result<usize, StoreError> {
        let n: i64 = self
            .conn
            .query_row("SELECT count(*) FROM bill_events", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}
