//! Duplicate-detection engine.
//!
//! # Responsibility
//! - Normalize note text into token sets ([`tokenize`]).
//! - Score token-set overlap ([`similarity`]).
//! - Pull every note from a source and rank pairs over a threshold ([`scanner`]).
//!
//! # Invariants
//! - Scoring is pure and symmetric.
//! - A scan either returns a complete result or an error, never a partial list.

pub mod scanner;
pub mod similarity;
pub mod tokenize;
