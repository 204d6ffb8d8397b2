//! All-pairs duplicate scanner.
//!
//! # Responsibility
//! - Drain a [`NoteSource`] page by page into scan-scoped [`NoteRecord`]s.
//! - Score every unordered pair once and keep those at or above threshold.
//! - Rank kept pairs by similarity, highest first.
//!
//! # Invariants
//! - All pages are fetched before any pair is scored.
//! - Any fetch failure fails the whole scan; no partial result escapes.
//! - The scanner holds no state between scans.
//!
//! Comparison is quadratic in note count with no blocking or sampling, which
//! suits note collections in the hundreds.

use crate::dedup::similarity::set_similarity;
use crate::dedup::tokenize::tokenize;
use crate::model::duplicate::{DuplicatePair, NoteSummary, ScanResult};
use crate::model::note::{Note, NoteRecord};
use crate::repo::note_source::{NoteSource, SourceError};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Notes requested per page.
pub const DEFAULT_PAGE_SIZE: u32 = 50;
/// Characters of body kept for display previews.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;
/// Title shown for notes without one.
pub const UNTITLED_LABEL: &str = "(Untitled)";
/// Threshold used when the caller does not pick one.
pub const DEFAULT_THRESHOLD_PERCENT: u8 = 50;

pub type DedupResult<T> = Result<T, ScanError>;

/// Scan failure.
#[derive(Debug)]
pub enum ScanError {
    /// Threshold outside `0..=100` percent or not a finite fraction.
    InvalidThreshold(String),
    /// The note source failed or returned malformed data for `page`.
    Fetch { page: u32, source: SourceError },
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidThreshold(message) => write!(f, "invalid threshold: {message}"),
            Self::Fetch { page, source } => {
                write!(f, "failed to fetch notes (page {page}): {source}")
            }
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidThreshold(_) => None,
            Self::Fetch { source, .. } => Some(source),
        }
    }
}

impl ScanError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidThreshold(_) => "invalid_threshold",
            Self::Fetch { .. } => "fetch_failed",
        }
    }
}

/// Validated minimum similarity, stored as a fraction in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Threshold {
    fraction: f64,
}

impl Threshold {
    /// Builds a threshold from a UI percent value.
    ///
    /// # Errors
    /// - [`ScanError::InvalidThreshold`] when `percent` is outside `0..=100`.
    pub fn from_percent(percent: i64) -> DedupResult<Self> {
        if !(0..=100).contains(&percent) {
            return Err(ScanError::InvalidThreshold(format!(
                "expected a percent between 0 and 100, got {percent}"
            )));
        }
        Ok(Self {
            fraction: percent as f64 / 100.0,
        })
    }

    /// Builds a threshold from a fraction.
    ///
    /// # Errors
    /// - [`ScanError::InvalidThreshold`] when `fraction` is NaN, infinite, or
    ///   outside `[0, 1]`.
    pub fn from_fraction(fraction: f64) -> DedupResult<Self> {
        if !fraction.is_finite() || !(0.0..=1.0).contains(&fraction) {
            return Err(ScanError::InvalidThreshold(format!(
                "expected a fraction between 0 and 1, got {fraction}"
            )));
        }
        Ok(Self { fraction })
    }

    pub fn fraction(self) -> f64 {
        self.fraction
    }

    pub fn percent(self) -> u8 {
        similarity_percent(self.fraction)
    }

    /// Returns whether `similarity` meets this threshold.
    pub fn admits(self, similarity: f64) -> bool {
        similarity >= self.fraction
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            fraction: f64::from(DEFAULT_THRESHOLD_PERCENT) / 100.0,
        }
    }
}

/// Scan tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Notes requested per page. Must be positive.
    pub page_size: u32,
    /// Maximum characters kept in a preview.
    pub preview_chars: usize,
    /// Title substituted for notes with a missing or empty title.
    pub untitled_label: String,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            preview_chars: DEFAULT_PREVIEW_CHARS,
            untitled_label: UNTITLED_LABEL.to_string(),
        }
    }
}

/// Stateless duplicate scanner.
#[derive(Debug, Clone, Default)]
pub struct DuplicateScanner {
    options: ScanOptions,
}

impl DuplicateScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Fetches every note from `source` and returns ranked duplicate pairs.
    ///
    /// # Errors
    /// - [`ScanError::Fetch`] when any page request fails.
    pub fn scan<S: NoteSource + ?Sized>(
        &self,
        source: &S,
        threshold: Threshold,
    ) -> DedupResult<ScanResult> {
        let scan_id = Uuid::new_v4();
        let started_at = Instant::now();
        info!(
            "event=dedup_scan module=dedup status=start scan_id={scan_id} threshold_pct={}",
            threshold.percent()
        );

        let records = match self.fetch_records(source, scan_id) {
            Ok(records) => records,
            Err(err) => {
                error!(
                    "event=dedup_scan module=dedup status=error scan_id={scan_id} duration_ms={} error_code={} error={}",
                    started_at.elapsed().as_millis(),
                    err.code(),
                    err
                );
                return Err(err);
            }
        };

        let result = find_duplicates(&records, threshold);
        info!(
            "event=dedup_scan module=dedup status=ok scan_id={scan_id} threshold_pct={} note_count={} comparisons={} pair_count={} duration_ms={}",
            threshold.percent(),
            result.note_count,
            result.comparisons,
            result.len(),
            started_at.elapsed().as_millis()
        );
        Ok(result)
    }

    /// Drains `source` into records, in fetch order.
    fn fetch_records<S: NoteSource + ?Sized>(
        &self,
        source: &S,
        scan_id: Uuid,
    ) -> DedupResult<Vec<NoteRecord>> {
        let mut records = Vec::new();
        let mut page: u32 = 1;

        loop {
            let batch = source
                .fetch_page(page, self.options.page_size)
                .map_err(|source| ScanError::Fetch { page, source })?;
            debug!(
                "event=dedup_fetch_page module=dedup status=ok scan_id={scan_id} page={page} items={} has_more={}",
                batch.items.len(),
                batch.has_more
            );

            if batch.has_more && batch.items.is_empty() {
                return Err(ScanError::Fetch {
                    page,
                    source: SourceError::InvalidData(
                        "page reported more notes but returned none".to_string(),
                    ),
                });
            }

            records.extend(batch.items.into_iter().map(|note| self.build_record(note)));
            if !batch.has_more {
                return Ok(records);
            }

            page = page.checked_add(1).ok_or(ScanError::Fetch {
                page,
                source: SourceError::InvalidPage(page),
            })?;
        }
    }

    /// Projects one note into its scan record.
    pub fn build_record(&self, note: Note) -> NoteRecord {
        let tokens = tokenize(note.body_text()).into_iter().collect();
        let preview = derive_preview(note.body_text(), self.options.preview_chars);
        let title = note
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.options.untitled_label.clone());

        NoteRecord {
            id: note.id,
            title,
            tokens,
            preview,
        }
    }
}

/// Scores every unordered pair of `records` and ranks those meeting `threshold`.
///
/// Pairs keep fetch order inside (`note_a` precedes `note_b`).
pub fn find_duplicates(records: &[NoteRecord], threshold: Threshold) -> ScanResult {
    let mut duplicates = Vec::new();
    let mut comparisons: u64 = 0;

    for (i, first) in records.iter().enumerate() {
        for second in &records[i + 1..] {
            comparisons += 1;
            let score = set_similarity(&first.tokens, &second.tokens);
            if threshold.admits(score) {
                duplicates.push(DuplicatePair {
                    note_a: NoteSummary::from(first),
                    note_b: NoteSummary::from(second),
                    similarity_percent: similarity_percent(score),
                });
            }
        }
    }

    duplicates.sort_by(|x, y| y.similarity_percent.cmp(&x.similarity_percent));
    ScanResult {
        duplicates,
        note_count: records.len(),
        comparisons,
    }
}

/// Converts a `[0, 1]` score to a whole percent, rounding halves up.
pub fn similarity_percent(score: f64) -> u8 {
    (score * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Display excerpt: first `max_chars` characters with each `\n` as a space.
pub fn derive_preview(body: &str, max_chars: usize) -> String {
    body.chars()
        .take(max_chars)
        .map(|ch| if ch == '\n' { ' ' } else { ch })
        .collect()
}
