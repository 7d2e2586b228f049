// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::ProgressEvent;

#[test]
fn test_progress_event_wire_shape() {
    let json: String = serde_json::to_string(&ProgressEvent::Progress { value: 42 }).unwrap();
    assert_eq!(json, r#"{"type":"progress","value":42}"#);

    let json: String = serde_json::to_string(&ProgressEvent::log("creating year")).unwrap();
    assert_eq!(json, r#"{"type":"log","message":"creating year"}"#);

    let json: String = serde_json::to_string(&ProgressEvent::Complete).unwrap();
    assert_eq!(json, r#"{"type":"complete"}"#);

    let json: String = serde_json::to_string(&ProgressEvent::error("boom")).unwrap();
    assert_eq!(json, r#"{"type":"error","message":"boom"}"#);
}

#[test]
fn test_progress_event_parses_server_payloads() {
    let event: ProgressEvent = serde_json::from_str(r#"{"type":"complete"}"#).unwrap();
    assert_eq!(event, ProgressEvent::Complete);

    let event: ProgressEvent =
        serde_json::from_str(r#"{"type":"error","message":"duplicate rollover in progress"}"#)
            .unwrap();
    assert_eq!(event, ProgressEvent::error("duplicate rollover in progress"));
}

#[test]
fn test_progress_event_rejects_unknown_type() {
    let result: Result<ProgressEvent, _> = serde_json::from_str(r#"{"type":"warning"}"#);
    assert!(result.is_err());
}

#[test]
fn test_progress_constructor_caps_at_one_hundred() {
    assert_eq!(
        ProgressEvent::progress(100),
        ProgressEvent::Progress { value: 100 }
    );
    assert_eq!(
        ProgressEvent::progress(250),
        ProgressEvent::Progress { value: 100 }
    );
    assert_eq!(ProgressEvent::progress(0), ProgressEvent::Progress { value: 0 });
}

#[test]
fn test_terminal_events() {
    assert!(ProgressEvent::Complete.is_terminal());
    assert!(ProgressEvent::error("x").is_terminal());
    assert!(!ProgressEvent::log("x").is_terminal());
    assert!(!ProgressEvent::Progress { value: 100 }.is_terminal());
}
