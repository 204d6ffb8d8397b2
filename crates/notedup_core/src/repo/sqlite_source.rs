//! SQLite-backed note source over the bundled `notes` table.
//!
//! # Responsibility
//! - Serve notes page by page for duplicate scans.
//! - Verify the connection carries the expected schema before use.
//!
//! # Invariants
//! - Only rows with `is_deleted = 0` are returned.
//! - Page order is `created_at ASC, id ASC`, stable across pages.

use crate::model::note::Note;
use crate::repo::note_source::{page_offset, NotePage, NoteSource, SourceError, SourceResult};
use log::debug;
use rusqlite::{params, Connection, Row};

const REQUIRED_NOTE_COLUMNS: [&str; 5] =
    ["id", "title", "body", "created_at", "is_deleted"];

/// Read-only note source borrowing a migrated connection.
pub struct SqliteNoteSource<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteSource<'conn> {
    /// Constructs a source from a migrated/ready connection.
    ///
    /// # Errors
    /// - [`SourceError::InvalidData`] when the `notes` table or one of its
    ///   required columns is missing.
    pub fn try_new(conn: &'conn Connection) -> SourceResult<Self> {
        ensure_notes_table_ready(conn)?;
        Ok(Self { conn })
    }

    /// Counts notes visible to scans.
    pub fn count_notes(&self) -> SourceResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM notes WHERE is_deleted = 0;",
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| SourceError::InvalidData(format!("negative note count {count}")))
    }
}

impl NoteSource for SqliteNoteSource<'_> {
    fn fetch_page(&self, page: u32, limit: u32) -> SourceResult<NotePage> {
        let offset = i64::try_from(page_offset(page, limit)?)
            .map_err(|_| SourceError::InvalidPage(page))?;

        // One extra row tells whether a further page exists.
        let mut stmt = self.conn.prepare(
            "SELECT id, title, body
             FROM notes
             WHERE is_deleted = 0
             ORDER BY created_at ASC, id ASC
             LIMIT ?1 OFFSET ?2;",
        )?;
        let mut rows = stmt.query(params![i64::from(limit) + 1, offset])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_note_row(row)?);
        }

        let has_more = items.len() > limit as usize;
        items.truncate(limit as usize);
        debug!(
            "event=notes_fetch_page module=repo status=ok page={page} limit={limit} items={} has_more={has_more}",
            items.len()
        );

        Ok(NotePage { items, has_more })
    }
}

fn parse_note_row(row: &Row<'_>) -> SourceResult<Note> {
    let id: String = row.get("id")?;
    if id.trim().is_empty() {
        return Err(SourceError::InvalidData(
            "empty id in notes.id".to_string(),
        ));
    }

    Ok(Note {
        id,
        title: row.get("title")?,
        body: row.get("body")?,
    })
}

fn ensure_notes_table_ready(conn: &Connection) -> SourceResult<()> {
    if !table_exists(conn, "notes")? {
        return Err(SourceError::InvalidData(
            "missing required table `notes`".to_string(),
        ));
    }

    for column in REQUIRED_NOTE_COLUMNS {
        if !table_has_column(conn, "notes", column)? {
            return Err(SourceError::InvalidData(format!(
                "missing required column `notes.{column}`"
            )));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> SourceResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> SourceResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
