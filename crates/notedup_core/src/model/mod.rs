//! Domain model for duplicate scanning.
//!
//! # Responsibility
//! - Define the note shape read from external stores.
//! - Define the scan-scoped records and result types handed to callers.
//!
//! # Invariants
//! - Notes are read-only inputs; nothing here mutates the store.
//! - Scan records and results live only as long as one scan.

pub mod duplicate;
pub mod note;
