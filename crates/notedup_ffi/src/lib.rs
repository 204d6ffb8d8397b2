//! Flutter-facing FFI surface for NoteDup.

pub mod api;
