// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Progress channel transport.
//!
//! A rollover's events travel from the pipeline thread to the HTTP response
//! through an unbounded channel and leave as Server-Sent Events, one event
//! per `ProgressEvent` with the JSON payload on its `data:` line.
//!
//! # Stream lifecycle
//!
//! - The stream ends right after the terminal `complete` or `error`
//! - If the pipeline goes away without a terminal event, the stream simply
//!   ends and the client sees an abnormal close
//! - A client that disconnects only stops listening; the pipeline runs on

use axum::response::sse::{Event, KeepAlive, Sse};
use fiscal_rollover_api::ProgressSink;
use fiscal_rollover_domain::ProgressEvent;
use futures::stream::{self, Stream};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Sending half of a progress channel.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<ProgressEvent>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelSink {
    fn emit(&mut self, event: ProgressEvent) {
        let kind: &'static str = event.kind();
        if self.tx.send(event).is_err() {
            debug!(kind, "Progress listener gone; event dropped");
        }
    }
}

/// Logs when a progress stream is torn down, whoever ended it.
struct StreamClosed {
    delivered: usize,
}

impl Drop for StreamClosed {
    fn drop(&mut self) {
        info!(delivered = self.delivered, "Progress stream closed");
    }
}

/// Turns a receiver of progress events into an SSE response.
///
/// # Arguments
///
/// * `events` - Receiver fed by a [`ChannelSink`]
/// * `keep_alive` - Interval between keep-alive comments
pub fn progress_stream(
    events: mpsc::UnboundedReceiver<ProgressEvent>,
    keep_alive: Duration,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    info!("Progress stream opened");

    let state: (mpsc::UnboundedReceiver<ProgressEvent>, StreamClosed, bool) =
        (events, StreamClosed { delivered: 0 }, false);

    let stream = stream::unfold(state, |(mut events, mut closed, finished)| async move {
        if finished {
            return None;
        }
        let event: ProgressEvent = events.recv().await?;
        let terminal: bool = event.is_terminal();
        closed.delivered += 1;
        debug!(kind = event.kind(), terminal, "Streaming progress event");
        Some((
            Event::default().json_data(&event),
            (events, closed, terminal),
        ))
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(keep_alive))
}
