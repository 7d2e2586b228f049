// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::{StatusCode, header};
use fiscal_rollover_api::{DUPLICATE_ROLLOVER_MESSAGE, InFlightGuard};
use fiscal_rollover_domain::{DirectoryListing, ProgressEvent};

use super::helpers::{
    STREAM_2026, body_json, body_text, build, create_test_app_state, get, sse_events,
};
use crate::ErrorResponse;

#[tokio::test]
async fn test_stream_delivers_steps_and_ends_after_complete() {
    let (app_state, _) = create_test_app_state();
    let app = build(&app_state);

    let response = get(&app, STREAM_2026).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/event-stream")
    );

    let events: Vec<ProgressEvent> = sse_events(&body_text(response).await);
    let progress: Vec<u8> = events
        .iter()
        .filter_map(|event| match event {
            ProgressEvent::Progress { value } => Some(*value),
            _ => None,
        })
        .collect();
    assert_eq!(progress, vec![10, 25, 60, 90, 100]);
    assert_eq!(events.last(), Some(&ProgressEvent::Complete));
    assert_eq!(events.iter().filter(|e| e.is_terminal()).count(), 1);

    let listing: DirectoryListing = body_json(get(&app, "/fiscal-year/list").await).await;
    assert_eq!(listing.current().unwrap().name, "2026");
}

#[tokio::test]
async fn test_concurrent_rollover_is_conflict() {
    let (app_state, company) = create_test_app_state();
    let app = build(&app_state);
    let _held: InFlightGuard = app_state.coordinator.try_reserve(company.company_id).unwrap();

    let response = get(&app, STREAM_2026).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: ErrorResponse = body_json(response).await;
    assert!(body.error);
    assert_eq!(body.message, DUPLICATE_ROLLOVER_MESSAGE);
}

#[tokio::test]
async fn test_gap_after_current_year_is_unprocessable() {
    let (app_state, company) = create_test_app_state();
    let app = build(&app_state);

    let response = get(
        &app,
        "/fiscal-year/rollover-stream?dateFormat=english&startDateEnglish=2026-02-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!app_state.coordinator.is_in_flight(company.company_id));
}

#[tokio::test]
async fn test_wrong_calendar_is_unprocessable() {
    let (app_state, _) = create_test_app_state();
    let app = build(&app_state);

    let response = get(
        &app,
        "/fiscal-year/rollover-stream?dateFormat=nepali&startDateNepali=2082-09-17",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_malformed_requests_are_bad_request() {
    let (app_state, _) = create_test_app_state();
    let app = build(&app_state);

    for uri in [
        "/fiscal-year/rollover-stream",
        "/fiscal-year/rollover-stream?dateFormat=english",
        "/fiscal-year/rollover-stream?dateFormat=english&startDateEnglish=2026-13-01",
        "/fiscal-year/rollover-stream?dateFormat=english&startDateEnglish=2026-01-01\
            &endDateEnglish=2025-06-30",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_repeated_request_id_replays() {
    let (app_state, _) = create_test_app_state();
    let app = build(&app_state);
    let uri: String = format!("{STREAM_2026}&requestId=once");

    let first: Vec<ProgressEvent> = sse_events(&body_text(get(&app, &uri).await).await);
    assert_eq!(first.last(), Some(&ProgressEvent::Complete));

    let second: Vec<ProgressEvent> = sse_events(&body_text(get(&app, &uri).await).await);
    assert_eq!(second.len(), 3);
    assert_eq!(second[1], ProgressEvent::Progress { value: 100 });
    assert_eq!(second[2], ProgressEvent::Complete);

    let listing: DirectoryListing = body_json(get(&app, "/fiscal-year/list").await).await;
    assert_eq!(listing.fiscal_years.len(), 2);
}
