//! Note source contracts and implementations.
//!
//! # Responsibility
//! - Define the paginated fetch contract the scanner pulls notes through.
//! - Provide SQLite-backed and in-memory sources.
//!
//! # Invariants
//! - Sources are read-only; scanning never writes to a store.
//! - Pages are 1-based and returned in a stable order.

pub mod note_source;
pub mod sqlite_source;
