//! Core use-case services.
//!
//! # Responsibility
//! - Expose the duplicate finder as an explicit request/response session.
//! - Keep host transports decoupled from scanning and storage details.

pub mod panel_session;
