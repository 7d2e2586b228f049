// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use fiscal_rollover::Command;
use fiscal_rollover_domain::{
    CalendarDate, DateFormat, DirectoryListing, FiscalYear, ProgressEvent, RolloverRequest,
};
use fiscal_rollover_persistence::{CompanyRecord, NewCompany, Persistence};
use fiscal_rollover_server::{AppState, build_router};
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::{ClientError, Directory, ProgressChannel, RolloverSession};

pub fn english(value: &str) -> CalendarDate {
    CalendarDate::parse(DateFormat::English, value).unwrap()
}

/// What one channel open delivers.
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub events: Vec<ProgressEvent>,
    /// Keep the channel open after the events instead of closing it.
    pub hang: bool,
}

impl Script {
    pub fn closing(events: Vec<ProgressEvent>) -> Self {
        Self {
            events,
            hang: false,
        }
    }

    pub fn hanging(events: Vec<ProgressEvent>) -> Self {
        Self { events, hang: true }
    }
}

/// A channel that replays one script per open and records every request.
#[derive(Debug, Clone, Default)]
pub struct ScriptedChannel {
    scripts: Arc<Mutex<VecDeque<Script>>>,
    pub requests: Arc<Mutex<Vec<RolloverRequest>>>,
}

impl ScriptedChannel {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts: Arc::new(Mutex::new(scripts.into())),
            requests: Arc::default(),
        }
    }

    pub fn opened(&self) -> Vec<RolloverRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl ProgressChannel for ScriptedChannel {
    fn open(&self, request: &RolloverRequest) -> BoxStream<'static, ProgressEvent> {
        self.requests.lock().unwrap().push(request.clone());
        let script: Script = self.scripts.lock().unwrap().pop_front().unwrap_or_default();
        let tail: BoxStream<'static, ProgressEvent> = if script.hang {
            stream::pending().boxed()
        } else {
            stream::empty().boxed()
        };
        stream::iter(script.events).chain(tail).boxed()
    }
}

/// A directory that counts how often it is read.
#[derive(Debug, Clone)]
pub struct CountingDirectory {
    pub calls: Arc<AtomicUsize>,
    listing: DirectoryListing,
}

impl CountingDirectory {
    pub fn new() -> Self {
        Self {
            calls: Arc::default(),
            listing: DirectoryListing {
                fiscal_years: vec![FiscalYear {
                    id: 2,
                    name: String::from("2025"),
                    date_format: DateFormat::English,
                    start_date: String::from("2025-01-01"),
                    end_date: String::from("2025-12-31"),
                    is_current: true,
                }],
                current_fiscal_year_id: Some(2),
                current_company_name: String::from("Himalayan Traders"),
            },
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Directory for CountingDirectory {
    async fn list(&self) -> Result<DirectoryListing, ClientError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.listing.clone())
    }
}

pub type TestSession = RolloverSession<ScriptedChannel, CountingDirectory>;

/// A session that has confirmed the 2025 rollover and opened its channel.
pub async fn running_session(channel: ScriptedChannel, directory: CountingDirectory) -> TestSession {
    let mut session: TestSession = RolloverSession::new(channel, directory);
    session
        .dispatch(Command::Prepare {
            date_format: DateFormat::English,
            start_date: english("2025-01-01"),
        })
        .await
        .unwrap();
    session
        .dispatch(Command::Submit {
            end_date: english("2025-12-31"),
            request_id: Some(String::from("req-1")),
        })
        .await
        .unwrap();
    session.dispatch(Command::Confirm).await.unwrap();
    session
}

/// Serves the real router on an ephemeral port.
///
/// Returns the base URL and the shared state.
pub async fn spawn_server(with_company: bool) -> (String, AppState, Option<CompanyRecord>) {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let company: Option<CompanyRecord> = with_company.then(|| {
        persistence
            .bootstrap_company(&NewCompany {
                name: String::from("Himalayan Traders"),
                first_fiscal_year_start: english("2025-01-01"),
                first_fiscal_year_end: english("2025-12-31"),
            })
            .unwrap()
    });
    let app_state: AppState = AppState::new(persistence, Duration::from_secs(15));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: std::net::SocketAddr = listener.local_addr().unwrap();
    let router = build_router(app_state.clone());
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), app_state, company)
}
