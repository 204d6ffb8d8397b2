//! Duplicate-finder panel session.
//!
//! # Responsibility
//! - Own the note source, host actions and scanner for one panel.
//! - Translate panel requests into scans or host actions.
//!
//! # Invariants
//! - The session holds no mutable state; concurrent scans are independent.
//! - A failed scan answers with an error and never with duplicates.
//! - Threshold validation happens before any note is fetched.

use crate::dedup::scanner::{DedupResult, DuplicateScanner, ScanOptions, Threshold};
use crate::model::duplicate::{DuplicatePair, ScanResult};
use crate::model::note::NoteId;
use crate::repo::note_source::NoteSource;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Message sent by the panel UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelRequest {
    /// Run a scan at `threshold` percent (`0..=100`).
    Scan { threshold: i64 },
    /// Ask the host to open one note.
    OpenNote {
        #[serde(rename = "noteId")]
        note_id: NoteId,
    },
    /// Ask the host to hide the panel.
    Close,
}

impl PanelRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Scan { .. } => "scan",
            Self::OpenNote { .. } => "openNote",
            Self::Close => "close",
        }
    }
}

/// Reply sent back to the panel UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PanelResponse {
    /// Complete scan outcome, highest similarity first.
    Results {
        duplicates: Vec<DuplicatePair>,
        #[serde(rename = "noteCount")]
        note_count: usize,
    },
    /// Host action was dispatched.
    Ack,
    /// Request failed; `message` is meant to be shown verbatim.
    Error { message: String },
}

impl From<ScanResult> for PanelResponse {
    fn from(result: ScanResult) -> Self {
        Self::Results {
            duplicates: result.duplicates,
            note_count: result.note_count,
        }
    }
}

/// Host-side effects the panel can trigger. Fire-and-forget.
pub trait HostActions {
    /// Navigates the host to the note with `note_id`.
    fn open_note(&self, note_id: &str);
    /// Hides the duplicate-finder panel.
    fn close_panel(&self);
}

impl<T: HostActions + ?Sized> HostActions for &T {
    fn open_note(&self, note_id: &str) {
        (**self).open_note(note_id);
    }

    fn close_panel(&self) {
        (**self).close_panel();
    }
}

/// Explicit context for one duplicate-finder panel.
pub struct PanelSession<S: NoteSource, H: HostActions> {
    source: S,
    host: H,
    scanner: DuplicateScanner,
}

impl<S: NoteSource, H: HostActions> PanelSession<S, H> {
    /// Creates a session with default scan options.
    pub fn new(source: S, host: H) -> Self {
        Self::with_options(source, host, ScanOptions::default())
    }

    pub fn with_options(source: S, host: H, options: ScanOptions) -> Self {
        Self {
            source,
            host,
            scanner: DuplicateScanner::new(options),
        }
    }

    /// Scans the whole source at `threshold_percent`.
    ///
    /// # Errors
    /// - [`crate::ScanError::InvalidThreshold`] before any fetch when the
    ///   percent is outside `0..=100`.
    /// - [`crate::ScanError::Fetch`] when the source fails.
    pub fn scan(&self, threshold_percent: i64) -> DedupResult<ScanResult> {
        let threshold = Threshold::from_percent(threshold_percent)?;
        self.scanner.scan(&self.source, threshold)
    }

    /// Handles one panel request.
    pub fn handle(&self, request: PanelRequest) -> PanelResponse {
        info!(
            "event=panel_request module=service status=start kind={}",
            request.kind()
        );

        match request {
            PanelRequest::Scan { threshold } => match self.scan(threshold) {
                Ok(result) => result.into(),
                Err(err) => {
                    warn!(
                        "event=panel_request module=service status=error kind=scan error_code={}",
                        err.code()
                    );
                    PanelResponse::Error {
                        message: err.to_string(),
                    }
                }
            },
            PanelRequest::OpenNote { note_id } => {
                self.host.open_note(&note_id);
                PanelResponse::Ack
            }
            PanelRequest::Close => {
                self.host.close_panel();
                PanelResponse::Ack
            }
        }
    }
}
