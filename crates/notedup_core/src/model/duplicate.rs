//! Duplicate pair and scan result types.
//!
//! # Invariants
//! - `note_a` and `note_b` of a pair are distinct notes, `note_a` first in
//!   fetch order.
//! - `ScanResult::duplicates` is sorted by `similarity_percent` descending.
//!
//! Serialized field names are camelCase to match the panel wire format.

use crate::model::note::{NoteId, NoteRecord};
use serde::{Deserialize, Serialize};

const HIGH_BAND_MIN_PERCENT: u8 = 70;
const MEDIUM_BAND_MIN_PERCENT: u8 = 50;

/// Display summary of one side of a duplicate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteSummary {
    pub id: NoteId,
    pub title: String,
    pub preview: String,
}

impl From<&NoteRecord> for NoteSummary {
    fn from(record: &NoteRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            preview: record.preview.clone(),
        }
    }
}

/// Presentation bucket for a pair's similarity badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityBand {
    High,
    Medium,
    Low,
}

impl SimilarityBand {
    pub fn from_percent(percent: u8) -> Self {
        if percent >= HIGH_BAND_MIN_PERCENT {
            Self::High
        } else if percent >= MEDIUM_BAND_MIN_PERCENT {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Two notes whose similarity met the scan threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicatePair {
    pub note_a: NoteSummary,
    pub note_b: NoteSummary,
    /// `round(similarity * 100)`, always within `0..=100`.
    pub similarity_percent: u8,
}

impl DuplicatePair {
    pub fn band(&self) -> SimilarityBand {
        SimilarityBand::from_percent(self.similarity_percent)
    }

    /// Returns whether this pair refers to `id` on either side.
    pub fn involves(&self, id: &str) -> bool {
        self.note_a.id == id || self.note_b.id == id
    }
}

/// Outcome of one complete scan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Pairs at or above threshold, highest similarity first.
    pub duplicates: Vec<DuplicatePair>,
    /// Number of notes fetched from the source.
    pub note_count: usize,
    /// Number of pairs scored; `n * (n - 1) / 2` for `n` notes.
    pub comparisons: u64,
}

impl ScanResult {
    pub fn is_empty(&self) -> bool {
        self.duplicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.duplicates.len()
    }

    /// Human-readable status line for the scan at `threshold_percent`.
    pub fn summary(&self, threshold_percent: u8) -> String {
        match self.duplicates.len() {
            0 => format!("No duplicates found at {threshold_percent}% threshold."),
            1 => format!("Found 1 duplicate pair at ≥{threshold_percent}% similarity."),
            count => format!("Found {count} duplicate pairs at ≥{threshold_percent}% similarity."),
        }
    }
}
