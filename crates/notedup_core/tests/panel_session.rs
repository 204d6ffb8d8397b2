use notedup_core::{
    HostActions, InMemoryNoteSource, Note, NotePage, NoteSource, PanelRequest, PanelResponse,
    PanelSession, ScanError, SourceResult,
};
use serde_json::json;
use std::cell::{Cell, RefCell};

#[derive(Default)]
struct RecordingHost {
    opened: RefCell<Vec<String>>,
    closed: Cell<u32>,
}

impl HostActions for RecordingHost {
    fn open_note(&self, note_id: &str) {
        self.opened.borrow_mut().push(note_id.to_string());
    }

    fn close_panel(&self) {
        self.closed.set(self.closed.get() + 1);
    }
}

#[derive(Default)]
struct CountingSource {
    fetches: Cell<u32>,
}

impl NoteSource for CountingSource {
    fn fetch_page(&self, _page: u32, _limit: u32) -> SourceResult<NotePage> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(NotePage::default())
    }
}

fn fruit_source() -> InMemoryNoteSource {
    InMemoryNoteSource::new(vec![
        Note::new("a", "Groceries", "apple banana cherry date"),
        Note::new("b", "Groceries (copy)", "apple banana cherry fig"),
    ])
}

#[test]
fn scan_request_returns_ranked_results() {
    let source = fruit_source();
    let host = RecordingHost::default();
    let session = PanelSession::new(&source, &host);

    let response = session.handle(PanelRequest::Scan { threshold: 50 });
    match response {
        PanelResponse::Results {
            duplicates,
            note_count,
        } => {
            assert_eq!(note_count, 2);
            assert_eq!(duplicates.len(), 1);
            assert_eq!(duplicates[0].similarity_percent, 60);
        }
        other => panic!("unexpected response: {other:?}"),
    }

    let strict = session.handle(PanelRequest::Scan { threshold: 70 });
    assert_eq!(
        strict,
        PanelResponse::Results {
            duplicates: Vec::new(),
            note_count: 2
        }
    );
}

#[test]
fn invalid_threshold_is_rejected_before_fetching() {
    let source = CountingSource::default();
    let host = RecordingHost::default();
    let session = PanelSession::new(&source, &host);

    for bad in [-1, 101, 1_000] {
        let err = session.scan(bad).unwrap_err();
        assert!(matches!(err, ScanError::InvalidThreshold(_)));

        let response = session.handle(PanelRequest::Scan { threshold: bad });
        match response {
            PanelResponse::Error { message } => assert!(message.contains("invalid threshold")),
            other => panic!("unexpected response: {other:?}"),
        }
    }
    assert_eq!(source.fetches.get(), 0);
}

#[test]
fn open_note_and_close_are_forwarded_to_host() {
    let source = fruit_source();
    let host = RecordingHost::default();
    let session = PanelSession::new(&source, &host);

    let opened = session.handle(PanelRequest::OpenNote {
        note_id: "b".to_string(),
    });
    let closed = session.handle(PanelRequest::Close);

    assert_eq!(opened, PanelResponse::Ack);
    assert_eq!(closed, PanelResponse::Ack);
    assert_eq!(*host.opened.borrow(), vec!["b".to_string()]);
    assert_eq!(host.closed.get(), 1);
}

#[test]
fn requests_decode_from_panel_wire_format() {
    let scan: PanelRequest = serde_json::from_value(json!({"kind": "scan", "threshold": 42})).unwrap();
    assert_eq!(scan, PanelRequest::Scan { threshold: 42 });

    let open: PanelRequest =
        serde_json::from_value(json!({"kind": "openNote", "noteId": "abc123"})).unwrap();
    assert_eq!(
        open,
        PanelRequest::OpenNote {
            note_id: "abc123".to_string()
        }
    );

    let close: PanelRequest = serde_json::from_value(json!({"kind": "close"})).unwrap();
    assert_eq!(close, PanelRequest::Close);

    let non_numeric =
        serde_json::from_value::<PanelRequest>(json!({"kind": "scan", "threshold": "high"}));
    assert!(non_numeric.is_err());
}

#[test]
fn responses_encode_to_panel_wire_format() {
    let source = fruit_source();
    let host = RecordingHost::default();
    let session = PanelSession::new(&source, &host);

    let value = serde_json::to_value(session.handle(PanelRequest::Scan { threshold: 50 })).unwrap();
    assert_eq!(value["kind"], "results");
    assert_eq!(value["noteCount"], 2);
    assert_eq!(value["duplicates"][0]["similarityPercent"], 60);
    assert_eq!(value["duplicates"][0]["noteA"]["id"], "a");
    assert_eq!(value["duplicates"][0]["noteB"]["title"], "Groceries (copy)");

    let error = serde_json::to_value(PanelResponse::Error {
        message: "boom".to_string(),
    })
    .unwrap();
    assert_eq!(error, json!({"kind": "error", "message": "boom"}));
    assert!(error.get("duplicates").is_none());

    assert_eq!(
        serde_json::to_value(PanelResponse::Ack).unwrap(),
        json!({"kind": "ack"})
    );
}
