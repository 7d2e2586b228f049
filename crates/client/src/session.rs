// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Async driver for the rollover controller.
//!
//! The controller itself never performs I/O. A [`RolloverSession`] applies
//! commands, executes the effects they produce, and feeds channel events
//! back in as commands tagged with the generation of the channel they came
//! from. Every listener task forwards into one inbox, so events are handled
//! one at a time in arrival order.

use fiscal_rollover::{
    Command, ControllerState, CoreError, Effect, FailureKind, Phase, TransitionResult, apply,
};
use fiscal_rollover_domain::{DirectoryListing, RolloverRequest};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use time::OffsetDateTime;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::ProgressChannel;
use crate::directory::Directory;

/// Exit code for a rollover that reported `complete`.
pub const EXIT_COMPLETED: u8 = 0;
/// Exit code for a rollover that reported `error`.
pub const EXIT_FAILED: u8 = 1;
/// Exit code when the outcome is unknown.
pub const EXIT_UNKNOWN: u8 = 2;
/// Exit code when local validation rejected the request.
pub const EXIT_INVALID: u8 = 3;
/// Exit code for any other client failure.
pub const EXIT_CLIENT_ERROR: u8 = 4;

/// Generates an idempotency key for a new rollover.
#[must_use]
pub fn new_request_id() -> String {
    let timestamp: i64 = OffsetDateTime::now_utc().unix_timestamp();
    format!("rollover_{timestamp}_{:016x}", rand::random::<u64>())
}

/// How a settled session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The server reported `complete`.
    Completed,
    /// The server reported `error` with this message.
    Failed(String),
    /// The channel dropped or the user stopped watching.
    Unknown(String),
}

impl SessionOutcome {
    /// Reads the outcome off a controller in a terminal phase.
    #[must_use]
    pub fn from_state(state: &ControllerState) -> Option<Self> {
        let message: String = state.error_message().unwrap_or_default().to_string();
        match (state.phase, &state.failure) {
            (Phase::Succeeded, _) => Some(Self::Completed),
            (Phase::Failed, Some(FailureKind::Coordinator(_))) => Some(Self::Failed(message)),
            (Phase::Failed, Some(FailureKind::ChannelDropped | FailureKind::Detached)) => {
                Some(Self::Unknown(message))
            }
            _ => None,
        }
    }

    /// The process exit code for this outcome.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Completed => EXIT_COMPLETED,
            Self::Failed(_) => EXIT_FAILED,
            Self::Unknown(_) => EXIT_UNKNOWN,
        }
    }
}

/// Asks a running session to stop watching.
///
/// Stopping only detaches the client; the server keeps going.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    /// Requests the session to stop watching.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Drives one rollover controller against a channel and a directory.
pub struct RolloverSession<C, D> {
    state: ControllerState,
    channel: C,
    directory: D,
    inbox_tx: mpsc::UnboundedSender<Command>,
    inbox_rx: mpsc::UnboundedReceiver<Command>,
    listeners: HashMap<u64, JoinHandle<()>>,
    stop_tx: Arc<watch::Sender<bool>>,
    stop_rx: watch::Receiver<bool>,
    listing: Option<DirectoryListing>,
    refreshes: usize,
}

impl<C: ProgressChannel, D: Directory> RolloverSession<C, D> {
    /// Creates a session with the controller in `idle`.
    #[must_use]
    pub fn new(channel: C, directory: D) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            state: ControllerState::new(),
            channel,
            directory,
            inbox_tx,
            inbox_rx,
            listeners: HashMap::new(),
            stop_tx: Arc::new(stop_tx),
            stop_rx,
            listing: None,
            refreshes: 0,
        }
    }

    /// The controller state.
    #[must_use]
    pub const fn state(&self) -> &ControllerState {
        &self.state
    }

    /// The directory as last re-read after a run, if it was.
    #[must_use]
    pub const fn listing(&self) -> Option<&DirectoryListing> {
        self.listing.as_ref()
    }

    /// How many directory refreshes the session has performed.
    #[must_use]
    pub const fn refreshes(&self) -> usize {
        self.refreshes
    }

    /// A handle that stops watching the running rollover.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    /// Applies one command and executes the effects it produces.
    ///
    /// # Errors
    ///
    /// Returns the controller's error if the command is rejected; the state
    /// is then unchanged and no effect runs.
    pub async fn dispatch(&mut self, command: Command) -> Result<(), CoreError> {
        if let Command::ChannelClosed { generation } = command {
            self.listeners.remove(&generation);
        }

        let name: &'static str = command.name();
        let result: TransitionResult = apply(&self.state, command, OffsetDateTime::now_utc())?;
        if result.new_state.phase != self.state.phase {
            debug!(
                command = name,
                from = %self.state.phase,
                to = %result.new_state.phase,
                "Controller transition"
            );
        }
        self.state = result.new_state;

        for effect in result.effects {
            self.execute(effect).await;
        }
        Ok(())
    }

    async fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::OpenChannel {
                generation,
                request,
            } => self.open_channel(generation, &request),
            Effect::CloseChannel { generation } => {
                if let Some(listener) = self.listeners.remove(&generation) {
                    listener.abort();
                    info!(generation, "Stopped listening to progress channel");
                }
            }
            Effect::RefreshDirectory { delay } => {
                tokio::time::sleep(delay).await;
                self.refreshes += 1;
                match self.directory.list().await {
                    Ok(listing) => {
                        info!(
                            current = ?listing.current().map(|fy| fy.name.as_str()),
                            "Refreshed fiscal year directory"
                        );
                        self.listing = Some(listing);
                    }
                    Err(err) => warn!(error = %err, "Could not refresh fiscal year directory"),
                }
            }
        }
    }

    fn open_channel(&mut self, generation: u64, request: &RolloverRequest) {
        info!(
            generation,
            start_date = %request.start_date(),
            request_id = request.request_id().unwrap_or("-"),
            "Opening progress channel"
        );
        let mut events = self.channel.open(request);
        let inbox: mpsc::UnboundedSender<Command> = self.inbox_tx.clone();
        let listener: JoinHandle<()> = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if inbox
                    .send(Command::ChannelEvent { generation, event })
                    .is_err()
                {
                    return;
                }
            }
            if inbox.send(Command::ChannelClosed { generation }).is_err() {
                debug!(generation, "Session gone before channel close");
            }
        });
        self.listeners.insert(generation, listener);
    }

    /// Handles channel traffic until the controller leaves `running`.
    ///
    /// `observe` sees the state after every handled command.
    ///
    /// # Errors
    ///
    /// Returns an error if a command raised while running is rejected.
    pub async fn run_until_settled(
        &mut self,
        mut observe: impl FnMut(&ControllerState),
    ) -> Result<Option<SessionOutcome>, CoreError> {
        if *self.stop_rx.borrow_and_update() && self.state.phase == Phase::Running {
            self.stop_tx.send_replace(false);
            self.dispatch(Command::StopWatching).await?;
            observe(&self.state);
        }

        while self.state.phase == Phase::Running {
            tokio::select! {
                Some(command) = self.inbox_rx.recv() => {
                    self.dispatch(command).await?;
                }
                Ok(()) = self.stop_rx.changed() => {
                    if !*self.stop_rx.borrow_and_update() {
                        continue;
                    }
                    self.stop_tx.send_replace(false);
                    info!("Stop watching requested");
                    self.dispatch(Command::StopWatching).await?;
                }
            }
            observe(&self.state);
        }

        Ok(SessionOutcome::from_state(&self.state))
    }
}

impl<C, D> Drop for RolloverSession<C, D> {
    fn drop(&mut self) {
        for (_, listener) in self.listeners.drain() {
            listener.abort();
        }
    }
}
