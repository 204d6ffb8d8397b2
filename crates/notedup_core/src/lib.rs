//! Core duplicate-note detection for NoteDup.
//! Hosts feed notes through a [`NoteSource`] and get ranked [`DuplicatePair`]s back.

pub mod db;
pub mod dedup;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use dedup::scanner::{
    find_duplicates, DedupResult, DuplicateScanner, ScanError, ScanOptions, Threshold,
    DEFAULT_PAGE_SIZE, DEFAULT_PREVIEW_CHARS, DEFAULT_THRESHOLD_PERCENT, UNTITLED_LABEL,
};
pub use dedup::similarity::{set_similarity, similarity};
pub use dedup::tokenize::tokenize;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::duplicate::{DuplicatePair, NoteSummary, ScanResult, SimilarityBand};
pub use model::note::{Note, NoteId, NoteRecord};
pub use repo::note_source::{InMemoryNoteSource, NotePage, NoteSource, SourceError, SourceResult};
pub use repo::sqlite_source::SqliteNoteSource;
pub use service::panel_session::{HostActions, PanelRequest, PanelResponse, PanelSession};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
