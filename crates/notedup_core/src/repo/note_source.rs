//! Paginated note-fetch contract.
//!
//! # Responsibility
//! - Model the host store's `fetch(page) -> { items, hasMore }` capability.
//! - Provide an in-memory source for hosts that push a snapshot.
//!
//! # Invariants
//! - `page` is 1-based; page `0` is rejected.
//! - A page never holds more than `limit` items.

use crate::db::DbError;
use crate::model::note::Note;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure raised by a note source while serving a page.
#[derive(Debug)]
pub enum SourceError {
    /// Storage transport failure.
    Db(DbError),
    /// Caller asked for page `0`.
    InvalidPage(u32),
    /// Caller asked for an empty page size.
    InvalidLimit(u32),
    /// Store returned rows that cannot be decoded.
    InvalidData(String),
    /// Host store could not be reached or refused the call.
    Unavailable(String),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidPage(page) => write!(f, "invalid page number {page}; pages start at 1"),
            Self::InvalidLimit(limit) => write!(f, "invalid page size {limit}"),
            Self::InvalidData(message) => write!(f, "malformed note data: {message}"),
            Self::Unavailable(message) => write!(f, "note store unavailable: {message}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SourceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One page of notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePage {
    pub items: Vec<Note>,
    /// Whether another page follows this one.
    pub has_more: bool,
}

/// Paginated read access to a note store.
pub trait NoteSource {
    /// Fetches page `page` (1-based) holding at most `limit` notes.
    ///
    /// Blocks until the store answers.
    fn fetch_page(&self, page: u32, limit: u32) -> SourceResult<NotePage>;
}

impl<T: NoteSource + ?Sized> NoteSource for &T {
    fn fetch_page(&self, page: u32, limit: u32) -> SourceResult<NotePage> {
        (**self).fetch_page(page, limit)
    }
}

/// Validates the page/limit pair shared by all sources.
///
/// Returns the zero-based row offset of the first item on `page`.
pub fn page_offset(page: u32, limit: u32) -> SourceResult<u64> {
    if page == 0 {
        return Err(SourceError::InvalidPage(page));
    }
    if limit == 0 {
        return Err(SourceError::InvalidLimit(limit));
    }
    Ok(u64::from(page - 1) * u64::from(limit))
}

/// Note source over a caller-provided snapshot, served in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNoteSource {
    notes: Vec<Note>,
}

impl InMemoryNoteSource {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl FromIterator<Note> for InMemoryNoteSource {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl NoteSource for InMemoryNoteSource {
    fn fetch_page(&self, page: u32, limit: u32) -> SourceResult<NotePage> {
        let total = self.notes.len();
        let start = usize::try_from(page_offset(page, limit)?)
            .unwrap_or(usize::MAX)
            .min(total);
        let end = start.saturating_add(limit as usize).min(total);

        Ok(NotePage {
            items: self.notes[start..end].to_vec(),
            has_more: end < total,
        })
    }
}
