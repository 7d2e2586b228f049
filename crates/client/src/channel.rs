// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress channel consumer.
//!
//! A channel is a stream of [`ProgressEvent`]s that ends when the connection
//! does. Whether that end was normal is decided by the controller: an end
//! after a terminal event is expected, any other end is an abnormal close.

use fiscal_rollover_domain::{ProgressEvent, RolloverQuery, RolloverRequest};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::error::ChannelError;
use crate::sse::SseDecoder;

/// Opens progress channels.
pub trait ProgressChannel: Send + Sync {
    /// Opens a channel for `request`.
    ///
    /// The returned stream is lazy; nothing is sent until it is polled. A
    /// channel the server refuses yields a single `error` event. A channel
    /// whose connection fails yields nothing, since the server may already
    /// be running the rollover.
    fn open(&self, request: &RolloverRequest) -> BoxStream<'static, ProgressEvent>;
}

/// Body of an HTTP error response.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Progress channel over the server's SSE endpoint.
#[derive(Debug, Clone)]
pub struct HttpProgressChannel {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProgressChannel {
    /// Creates a channel opener for the server at `base_url`.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/fiscal-year/rollover-stream",
            self.base_url.trim_end_matches('/')
        )
    }
}

/// Sends the channel request and checks the response status.
async fn connect(
    client: &reqwest::Client,
    url: &str,
    query: &RolloverQuery,
) -> Result<reqwest::Response, ChannelError> {
    let response: reqwest::Response = client
        .get(url)
        .query(query)
        .header(ACCEPT, "text/event-stream")
        .send()
        .await?;

    let status: reqwest::StatusCode = response.status();
    if status.is_success() {
        return Ok(response);
    }
    Err(ChannelError::Rejected {
        status: status.as_u16(),
        message: error_message(response).await,
    })
}

/// Reads the `message` of an error body, falling back to the raw text.
pub(crate) async fn error_message(response: reqwest::Response) -> String {
    let status: reqwest::StatusCode = response.status();
    match response.text().await {
        Ok(body) => match serde_json::from_str::<ErrorBody>(&body) {
            Ok(parsed) => parsed.message,
            Err(_) if body.trim().is_empty() => status.to_string(),
            Err(_) => body,
        },
        Err(err) => {
            debug!(error = %err, "Could not read error body");
            status.to_string()
        }
    }
}

impl ProgressChannel for HttpProgressChannel {
    fn open(&self, request: &RolloverRequest) -> BoxStream<'static, ProgressEvent> {
        let client: reqwest::Client = self.client.clone();
        let url: String = self.stream_url();
        let query: RolloverQuery = request.to_query();

        stream::once(async move {
            match connect(&client, &url, &query).await {
                Ok(response) => {
                    info!(url = %url, "Progress channel open");
                    decode_events(response.bytes_stream())
                }
                Err(err @ ChannelError::Rejected { .. }) => {
                    warn!(url = %url, error = %err, "Progress channel refused");
                    stream::iter([ProgressEvent::error(err.to_string())]).boxed()
                }
                Err(err @ ChannelError::Transport(_)) => {
                    warn!(url = %url, error = %err, "Progress channel connection failed");
                    stream::empty().boxed()
                }
            }
        })
        .flatten()
        .boxed()
    }
}

struct DecodeState<B, E> {
    bytes: BoxStream<'static, Result<B, E>>,
    decoder: SseDecoder,
    pending: VecDeque<ProgressEvent>,
    done: bool,
}

/// Decodes an SSE byte stream into progress events.
///
/// Payloads that are not progress events are skipped. A read error ends the
/// stream as if the connection had closed.
pub fn decode_events<S, B, E>(bytes: S) -> BoxStream<'static, ProgressEvent>
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    let state: DecodeState<B, E> = DecodeState {
        bytes: bytes.boxed(),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        done: false,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(event) = state.pending.pop_front() {
                return Some((event, state));
            }
            if state.done {
                return None;
            }
            match state.bytes.next().await {
                Some(Ok(chunk)) => {
                    for payload in state.decoder.feed(chunk.as_ref()) {
                        match serde_json::from_str::<ProgressEvent>(&payload) {
                            Ok(event) => state.pending.push_back(event),
                            Err(err) => {
                                warn!(error = %err, payload = %payload, "Skipping malformed event");
                            }
                        }
                    }
                }
                Some(Err(err)) => {
                    warn!(error = %err, "Progress channel read failed");
                    state.done = true;
                }
                None => {
                    if state.decoder.has_partial_event() {
                        debug!("Progress channel ended mid-event");
                    }
                    info!("Progress channel closed");
                    state.done = true;
                }
            }
        }
    })
    .boxed()
}
