// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover_domain::ProgressEvent;
use futures::StreamExt;
use futures::stream;

use crate::decode_events;

fn chunks(parts: &[&str]) -> Vec<Result<Vec<u8>, String>> {
    parts.iter().map(|part| Ok(part.as_bytes().to_vec())).collect()
}

#[tokio::test]
async fn test_decodes_events_across_chunks() {
    let input = chunks(&[
        "data: {\"type\":\"progress\",\"va",
        "lue\":10}\n\ndata: {\"type\":\"log\",\"message\":\"Creating fiscal year\"}\n",
        "\n: keep-alive\n\ndata: {\"type\":\"complete\"}\n\n",
    ]);

    let events: Vec<ProgressEvent> = decode_events(stream::iter(input)).collect().await;
    assert_eq!(
        events,
        vec![
            ProgressEvent::Progress { value: 10 },
            ProgressEvent::log("Creating fiscal year"),
            ProgressEvent::Complete,
        ]
    );
}

#[tokio::test]
async fn test_malformed_payloads_are_skipped() {
    let input = chunks(&[
        "data: not json\n\n",
        "data: {\"type\":\"unknown\"}\n\n",
        "data: {\"type\":\"progress\",\"value\":20}\n\n",
    ]);

    let events: Vec<ProgressEvent> = decode_events(stream::iter(input)).collect().await;
    assert_eq!(events, vec![ProgressEvent::Progress { value: 20 }]);
}

#[tokio::test]
async fn test_read_error_ends_the_channel() {
    let input: Vec<Result<Vec<u8>, String>> = vec![
        Ok(b"data: {\"type\":\"progress\",\"value\":20}\n\n".to_vec()),
        Err(String::from("connection reset")),
        Ok(b"data: {\"type\":\"complete\"}\n\n".to_vec()),
    ];

    let events: Vec<ProgressEvent> = decode_events(stream::iter(input)).collect().await;
    assert_eq!(events, vec![ProgressEvent::Progress { value: 20 }]);
}

#[tokio::test]
async fn test_truncated_event_is_not_delivered() {
    let input = chunks(&["data: {\"type\":\"progress\",\"value\":20}\n\ndata: {\"type\":\"comp"]);

    let events: Vec<ProgressEvent> = decode_events(stream::iter(input)).collect().await;
    assert_eq!(events, vec![ProgressEvent::Progress { value: 20 }]);
}
