//! Note input model and per-scan note records.
//!
//! # Invariants
//! - `Note` mirrors the host store row and is never written back.
//! - `NoteRecord` is built once per note per scan and not mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Opaque note identifier assigned by the host store.
pub type NoteId = String;

/// One note as returned by a [`crate::repo::note_source::NoteSource`] page.
///
/// Title and body are optional because host stores may return null fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl Note {
    /// Creates a note with both title and body present.
    pub fn new(id: impl Into<NoteId>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: Some(title.into()),
            body: Some(body.into()),
        }
    }

    /// Body text, treating a missing body as empty.
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// Scan-scoped projection of a [`Note`] used for pairwise comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: NoteId,
    /// Display title; already substituted with the placeholder when missing.
    pub title: String,
    /// Normalized token set of the body.
    pub tokens: HashSet<String>,
    /// Display-only body excerpt. Never used for scoring.
    pub preview: String,
}
