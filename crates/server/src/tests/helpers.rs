// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use fiscal_rollover_domain::{CalendarDate, DateFormat, ProgressEvent};
use fiscal_rollover_persistence::{CompanyRecord, NewCompany, Persistence};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tower::ServiceExt;

use crate::{AppState, build_router};

/// App state over an empty in-memory database.
pub fn create_empty_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(persistence, Duration::from_secs(15))
}

/// App state with an English-calendar company whose current year is 2025.
pub fn create_test_app_state() -> (AppState, CompanyRecord) {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let company: CompanyRecord = persistence
        .bootstrap_company(&NewCompany {
            name: String::from("Himalayan Traders"),
            first_fiscal_year_start: CalendarDate::parse(DateFormat::English, "2025-01-01")
                .unwrap(),
            first_fiscal_year_end: CalendarDate::parse(DateFormat::English, "2025-12-31")
                .unwrap(),
        })
        .unwrap();
    (AppState::new(persistence, Duration::from_secs(15)), company)
}

pub const STREAM_2026: &str = "/fiscal-year/rollover-stream?dateFormat=english\
    &startDateEnglish=2026-01-01&endDateEnglish=2026-12-31";

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: &Router, uri: &str, body: &serde_json::Value) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(body).unwrap()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json<T: DeserializeOwned>(response: Response<Body>) -> T {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// Parses the `data:` payloads of an SSE body, in order.
pub fn sse_events(body: &str) -> Vec<ProgressEvent> {
    body.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).unwrap())
        .collect()
}

pub fn build(app_state: &AppState) -> Router {
    build_router(app_state.clone())
}
