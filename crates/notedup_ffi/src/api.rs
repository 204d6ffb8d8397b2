//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose scan and panel-message entry points to Dart via FRB.
//! - Map core errors to plain messages at the boundary.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Host actions are returned to the caller, never performed here.

use notedup_core::db::open_db;
use notedup_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DuplicatePair, HostActions, PanelRequest, PanelResponse, PanelSession, SqliteNoteSource,
};
use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

const DB_PATH_ENV: &str = "NOTEDUP_DB_PATH";
const DEFAULT_DB_FILE_NAME: &str = "notedup.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One side of a duplicate pair, flattened for Dart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNoteItem {
    pub note_id: String,
    pub title: String,
    pub preview: String,
}

/// Duplicate pair row for the results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicatePairItem {
    pub note_a: DuplicateNoteItem,
    pub note_b: DuplicateNoteItem,
    pub similarity_percent: u8,
    /// Badge bucket (`high|medium|low`).
    pub band: String,
}

/// Scan response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanDuplicatesResponse {
    /// Whether the scan completed. `items` is empty when `false`.
    pub ok: bool,
    /// Pairs sorted by similarity, highest first.
    pub items: Vec<DuplicatePairItem>,
    /// Number of notes scanned.
    pub note_count: u32,
    /// Status line on success, error text on failure.
    pub message: String,
}

impl ScanDuplicatesResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            items: Vec::new(),
            note_count: 0,
            message: message.into(),
        }
    }
}

/// Reply to one panel message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelMessageReply {
    /// JSON-encoded panel response (`results|ack|error`).
    pub response_json: String,
    /// Note the host should open, if the message asked for one.
    pub open_note_id: Option<String>,
    /// Whether the host should hide the panel.
    pub close_panel: bool,
}

/// Scans every stored note at `threshold_percent` (`0..=100`).
///
/// # FFI contract
/// - Sync call, DB-backed, quadratic in note count.
/// - Never panics; failures come back with `ok = false`.
#[flutter_rust_bridge::frb(sync)]
pub fn scan_duplicates(threshold_percent: i64) -> ScanDuplicatesResponse {
    let host = DeferredHostActions::default();
    let outcome = with_session(&resolve_db_path(), &host, |session| {
        session.scan(threshold_percent)
    })
    .and_then(|scanned| scanned.map_err(|err| err.to_string()));
    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            return ScanDuplicatesResponse::failure(format!("scan_duplicates failed: {err}"))
        }
    };

    // Validated by the scan, so always within 0..=100 here.
    let applied_percent = u8::try_from(threshold_percent).unwrap_or(u8::MAX);
    ScanDuplicatesResponse {
        ok: true,
        message: result.summary(applied_percent),
        note_count: u32::try_from(result.note_count).unwrap_or(u32::MAX),
        items: result.duplicates.into_iter().map(to_pair_item).collect(),
    }
}

/// Handles one JSON panel message (`scan|openNote|close`).
///
/// # FFI contract
/// - Never panics; undecodable messages yield a JSON error response.
/// - `openNote`/`close` are reported through the reply for Dart to perform.
#[flutter_rust_bridge::frb(sync)]
pub fn handle_panel_message(message_json: String) -> PanelMessageReply {
    reply_to_panel_message(&resolve_db_path(), &message_json)
}

fn reply_to_panel_message(db_path: &Path, message_json: &str) -> PanelMessageReply {
    let host = DeferredHostActions::default();
    let response = match serde_json::from_str::<PanelRequest>(message_json) {
        // Only scans touch the note store.
        Ok(PanelRequest::Scan { threshold }) => with_session(db_path, &host, |session| {
            session.handle(PanelRequest::Scan { threshold })
        })
        .unwrap_or_else(|message| PanelResponse::Error { message }),
        Ok(PanelRequest::OpenNote { note_id }) => {
            host.open_note(&note_id);
            PanelResponse::Ack
        }
        Ok(PanelRequest::Close) => {
            host.close_panel();
            PanelResponse::Ack
        }
        Err(err) => {
            log::warn!("event=panel_message module=ffi status=error error_code=decode_failed");
            PanelResponse::Error {
                message: format!("invalid panel message: {err}"),
            }
        }
    };

    PanelMessageReply {
        response_json: encode_response(&response),
        open_note_id: host.open_note_id.into_inner(),
        close_panel: host.close_panel.get(),
    }
}

/// Records host actions so they can be handed back to Dart.
#[derive(Default)]
struct DeferredHostActions {
    open_note_id: RefCell<Option<String>>,
    close_panel: Cell<bool>,
}

impl HostActions for DeferredHostActions {
    fn open_note(&self, note_id: &str) {
        *self.open_note_id.borrow_mut() = Some(note_id.to_string());
    }

    fn close_panel(&self) {
        self.close_panel.set(true);
    }
}

fn with_session<T>(
    db_path: &Path,
    host: &DeferredHostActions,
    f: impl FnOnce(&PanelSession<SqliteNoteSource<'_>, &DeferredHostActions>) -> T,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("note store open failed: {err}"))?;
    let source = SqliteNoteSource::try_new(&conn)
        .map_err(|err| format!("note source init failed: {err}"))?;
    let session = PanelSession::new(source, host);
    Ok(f(&session))
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)
        })
        .clone()
}

fn encode_response(response: &PanelResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|err| {
        format!(r#"{{"kind":"error","message":"failed to encode response: {err}"}}"#)
    })
}

fn to_pair_item(pair: DuplicatePair) -> DuplicatePairItem {
    let band = pair.band().as_str().to_string();
    DuplicatePairItem {
        note_a: DuplicateNoteItem {
            note_id: pair.note_a.id,
            title: pair.note_a.title,
            preview: pair.note_a.preview,
        },
        note_b: DuplicateNoteItem {
            note_id: pair.note_b.id,
            title: pair.note_b.title,
            preview: pair.note_b.preview,
        },
        similarity_percent: pair.similarity_percent,
        band,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, handle_panel_message, init_logging, ping, reply_to_panel_message,
        resolve_db_path, scan_duplicates,
    };
    use notedup_core::db::open_db;
    use rusqlite::params;
    use uuid::Uuid;

    fn unique_word() -> String {
        format!("w{}", Uuid::new_v4().simple())
    }

    fn seed_note(id: &str, title: &str, body: &str) {
        let conn = open_db(resolve_db_path()).expect("open db");
        conn.execute(
            "INSERT INTO notes (id, title, body) VALUES (?1, ?2, ?3);",
            params![id, title, body],
        )
        .expect("insert note");
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn scan_duplicates_reports_seeded_pair() {
        let body = format!("{} {} {}", unique_word(), unique_word(), unique_word());
        let first_id = Uuid::new_v4().simple().to_string();
        let second_id = Uuid::new_v4().simple().to_string();
        seed_note(&first_id, "Original", &body);
        seed_note(&second_id, "", &format!("# {body}"));

        let response = scan_duplicates(100);
        assert!(response.ok, "{}", response.message);
        assert!(response.note_count >= 2);
        let pair = response
            .items
            .iter()
            .find(|item| item.note_a.note_id == first_id || item.note_b.note_id == first_id)
            .expect("seeded pair should be reported");
        assert_eq!(pair.similarity_percent, 100);
        assert_eq!(pair.band, "high");
        let other = if pair.note_a.note_id == first_id {
            &pair.note_b
        } else {
            &pair.note_a
        };
        assert_eq!(other.note_id, second_id);
        assert_eq!(other.title, "(Untitled)");
    }

    #[test]
    fn scan_duplicates_rejects_out_of_range_threshold() {
        let response = scan_duplicates(150);
        assert!(!response.ok);
        assert!(response.items.is_empty());
        assert!(response.message.contains("invalid threshold"));
    }

    #[test]
    fn panel_scan_message_returns_results_json() {
        let reply = handle_panel_message(r#"{"kind":"scan","threshold":100}"#.to_string());
        let value: serde_json::Value =
            serde_json::from_str(&reply.response_json).expect("response should be JSON");
        assert_eq!(value["kind"], "results");
        assert!(value["duplicates"].is_array());
        assert_eq!(reply.open_note_id, None);
        assert!(!reply.close_panel);
    }

    #[test]
    fn panel_open_note_message_is_returned_as_host_action() {
        let reply = handle_panel_message(r#"{"kind":"openNote","noteId":"n-42"}"#.to_string());
        assert_eq!(reply.response_json, r#"{"kind":"ack"}"#);
        assert_eq!(reply.open_note_id.as_deref(), Some("n-42"));
        assert!(!reply.close_panel);
    }

    #[test]
    fn panel_close_message_requests_panel_hide() {
        let reply = handle_panel_message(r#"{"kind":"close"}"#.to_string());
        assert_eq!(reply.response_json, r#"{"kind":"ack"}"#);
        assert!(reply.close_panel);
    }

    #[test]
    fn open_note_and_close_do_not_need_the_note_store() {
        // A regular file as parent directory makes the store unopenable.
        let blocker = std::env::temp_dir().join(format!("notedup-blocker-{}", unique_word()));
        std::fs::write(&blocker, b"not a directory").expect("write blocker file");
        let db_path = blocker.join("notedup.sqlite3");

        let opened = reply_to_panel_message(&db_path, r#"{"kind":"openNote","noteId":"n-1"}"#);
        assert_eq!(opened.response_json, r#"{"kind":"ack"}"#);
        assert_eq!(opened.open_note_id.as_deref(), Some("n-1"));

        let closed = reply_to_panel_message(&db_path, r#"{"kind":"close"}"#);
        assert_eq!(closed.response_json, r#"{"kind":"ack"}"#);
        assert!(closed.close_panel);

        let scanned = reply_to_panel_message(&db_path, r#"{"kind":"scan","threshold":50}"#);
        let value: serde_json::Value =
            serde_json::from_str(&scanned.response_json).expect("response should be JSON");
        assert_eq!(value["kind"], "error");
        assert!(value["message"]
            .as_str()
            .unwrap_or("")
            .contains("note store open failed"));

        let _ = std::fs::remove_file(&blocker);
    }

    #[test]
    fn malformed_panel_message_yields_error_response() {
        let reply = handle_panel_message(r#"{"kind":"scan","threshold":"high"}"#.to_string());
        let value: serde_json::Value =
            serde_json::from_str(&reply.response_json).expect("response should be JSON");
        assert_eq!(value["kind"], "error");
        assert!(value["message"]
            .as_str()
            .unwrap_or("")
            .contains("invalid panel message"));
        assert!(value.get("duplicates").is_none());
    }
}
