// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::SseDecoder;

fn feed_bytewise(decoder: &mut SseDecoder, input: &[u8]) -> Vec<String> {
    input
        .iter()
        .flat_map(|byte| decoder.feed(std::slice::from_ref(byte)))
        .collect()
}

#[test]
fn test_events_are_separated_by_blank_lines() {
    let mut decoder: SseDecoder = SseDecoder::new();
    let payloads: Vec<String> = decoder.feed(b"data: one\n\ndata: two\n\n");
    assert_eq!(payloads, vec!["one", "two"]);
    assert!(!decoder.has_partial_event());
}

#[test]
fn test_event_waits_for_its_blank_line() {
    let mut decoder: SseDecoder = SseDecoder::new();
    assert!(decoder.feed(b"data: {\"type\":").is_empty());
    assert!(decoder.feed(b"\"complete\"}\n").is_empty());
    assert!(decoder.has_partial_event());
    assert_eq!(decoder.feed(b"\n"), vec![r#"{"type":"complete"}"#]);
}

#[test]
fn test_multibyte_text_split_across_chunks() {
    let input: &[u8] = "data: नेपाल संवत\n\n".as_bytes();
    let mut decoder: SseDecoder = SseDecoder::new();
    assert_eq!(feed_bytewise(&mut decoder, input), vec!["नेपाल संवत"]);
}

#[test]
fn test_crlf_split_between_chunks() {
    let mut decoder: SseDecoder = SseDecoder::new();
    let mut payloads: Vec<String> = decoder.feed(b"data: a\r");
    payloads.extend(decoder.feed(b"\n\r"));
    payloads.extend(decoder.feed(b"\ndata: b\r\n\r\n"));
    assert_eq!(payloads, vec!["a", "b"]);
}

#[test]
fn test_lone_carriage_returns_end_lines() {
    let mut decoder: SseDecoder = SseDecoder::new();
    assert_eq!(decoder.feed(b"data: a\r\rdata: b\r\r"), vec!["a", "b"]);
}

#[test]
fn test_multiline_data_is_joined() {
    let mut decoder: SseDecoder = SseDecoder::new();
    assert_eq!(
        decoder.feed(b"data: first\ndata: second\n\n"),
        vec!["first\nsecond"]
    );
}

#[test]
fn test_comments_and_other_fields_are_ignored() {
    let mut decoder: SseDecoder = SseDecoder::new();
    let payloads: Vec<String> =
        decoder.feed(b": keep-alive\n\nevent: message\nid: 7\nretry: 100\ndata:x\n\n");
    assert_eq!(payloads, vec!["x"]);
}

#[test]
fn test_blank_event_without_data_is_dropped() {
    let mut decoder: SseDecoder = SseDecoder::new();
    assert!(decoder.feed(b"event: ping\n\n\n\n").is_empty());
}
