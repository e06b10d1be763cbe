//! Async runtime and task management for the TUI
//!
//! Dual-channel event-driven architecture:
//! - Input channel (priority): user input events that are never dropped
//! - Data channel: fetch results that may be dropped under backpressure
//!
//! The main loop uses `tokio::select!` with bias toward the input channel so
//! the UI stays responsive while a refresh is in flight. Refreshes themselves
//! are request-driven: the manual refresh key and the auto-refresh ticker
//! both feed one request channel consumed by a single fetcher task. No
//! ordering is guaranteed between overlapping refresh requests; the last
//! response to arrive wins.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::api::LobbyClient;
use crate::tui::app::App;
use crate::tui::event::{DataEvent, EventResult, InputEvent};

/// Channel capacities
const INPUT_CHANNEL_CAPACITY: usize = 16;
const DATA_CHANNEL_CAPACITY: usize = 32;
/// Refresh requests coalesce; a small buffer is enough
const REFRESH_CHANNEL_CAPACITY: usize = 4;

/// TUI runtime managing all background tasks
pub struct TuiRuntime {
    cancel_token: CancellationToken,
    task_handles: Vec<JoinHandle<()>>,
}

impl TuiRuntime {
    pub fn new() -> Self {
        Self {
            cancel_token: CancellationToken::new(),
            task_handles: Vec::new(),
        }
    }

    /// Get a clone of the cancellation token for spawning tasks
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    /// Add a task handle to track
    pub fn track(&mut self, handle: JoinHandle<()>) {
        self.task_handles.push(handle);
    }

    /// Signal shutdown and wait for tasks to complete
    pub async fn shutdown(self) {
        self.cancel_token.cancel();

        let shutdown = async {
            for handle in self.task_handles {
                let _ = handle.await;
            }
        };

        tokio::select! {
            _ = shutdown => {}
            _ = tokio::time::sleep(Duration::from_secs(2)) => {
                // Tasks did not stop in time; they will be dropped
            }
        }
    }
}

impl Default for TuiRuntime {
    fn default() -> Self {
        Self::new()
    }
}

/// Cancelable auto-refresh timer.
///
/// At most one ticker task is ever active: `enable` cancels any existing
/// handle before spawning a new one, so re-entrant enablement cannot produce
/// duplicate timers. Ticks are delivered as refresh requests through the
/// shared request channel.
pub struct AutoRefresh {
    interval: Duration,
    refresh_tx: mpsc::Sender<()>,
    parent: CancellationToken,
    handle: Option<CancellationToken>,
}

impl AutoRefresh {
    pub fn new(
        interval: Duration,
        refresh_tx: mpsc::Sender<()>,
        parent: CancellationToken,
    ) -> Self {
        Self {
            interval,
            refresh_tx,
            parent,
            handle: None,
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.handle.is_some()
    }

    #[must_use]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start the ticker. Any previously active ticker is cancelled first.
    pub fn enable(&mut self) {
        self.disable();

        let token = self.parent.child_token();
        let child = token.clone();
        let tx = self.refresh_tx.clone();
        let interval = self.interval;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately; the initial fetch already
            // happened, so skip it and fire after one full interval.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => {
                        // Coalesce: a full request channel means a refresh
                        // is already pending
                        let _ = tx.try_send(());
                    }
                }
            }
        });

        self.handle = Some(token);
    }

    /// Stop the ticker; no further refresh requests will fire.
    pub fn disable(&mut self) {
        if let Some(token) = self.handle.take() {
            token.cancel();
        }
    }

    /// Flip the timer state; returns whether it is now enabled.
    pub fn toggle(&mut self) -> bool {
        if self.is_enabled() {
            self.disable();
        } else {
            self.enable();
        }
        self.is_enabled()
    }
}

/// Spawn the input event reader task
pub fn spawn_input_task(tx: mpsc::Sender<InputEvent>, cancel: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut reader = EventStream::new();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(event)) => {
                            let input_event = match event {
                                Event::Key(key) => Some(InputEvent::Key(key)),
                                Event::Resize(w, h) => Some(InputEvent::Resize(w, h)),
                                _ => None,
                            };

                            if let Some(evt) = input_event {
                                if tx.send(evt).await.is_err() {
                                    break; // Receiver dropped
                                }
                            }
                        }
                        Some(Err(e)) => {
                            let is_fatal = matches!(
                                e.kind(),
                                std::io::ErrorKind::BrokenPipe
                                    | std::io::ErrorKind::ConnectionReset
                                    | std::io::ErrorKind::UnexpectedEof
                            );

                            if is_fatal {
                                tracing::info!("Terminal disconnected: {:?}", e);
                                break;
                            } else {
                                tracing::warn!("Terminal event read error: {:?}", e);
                            }
                        }
                        None => break, // Stream ended
                    }
                }
            }
        }
    })
}

/// Spawn the lobby fetcher task.
///
/// Performs one fetch immediately, then fetches once per request received on
/// `refresh_rx` (manual refresh key or auto-refresh tick).
pub fn spawn_lobby_fetcher(
    client: LobbyClient,
    tx: mpsc::Sender<DataEvent>,
    cancel: CancellationToken,
    mut refresh_rx: mpsc::Receiver<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        // Initial fetch immediately
        fetch_and_send(&client, &tx).await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                request = refresh_rx.recv() => {
                    match request {
                        Some(()) => fetch_and_send(&client, &tx).await,
                        None => break, // All senders dropped
                    }
                }
            }
        }
    })
}

async fn fetch_and_send(client: &LobbyClient, tx: &mpsc::Sender<DataEvent>) {
    match client.fetch_lobbies().await {
        Ok(records) => {
            tracing::debug!(count = records.len(), "lobby list updated");
            if tx.try_send(DataEvent::LobbiesUpdated(records)).is_err() {
                tracing::warn!("Could not deliver lobby update (channel full)");
            }
        }
        Err(e) => {
            if tx
                .try_send(DataEvent::FetchError {
                    error: e.to_string(),
                })
                .is_err()
            {
                tracing::warn!("Could not deliver fetch error notification (channel full)");
            }
        }
    }
}

/// Run the main TUI event loop
pub async fn run_event_loop(
    mut app: App,
    mut input_rx: mpsc::Receiver<InputEvent>,
    mut data_rx: mpsc::Receiver<DataEvent>,
    mut render_fn: impl FnMut(&App) -> Result<()>,
) -> Result<()> {
    let mut needs_render = true;

    loop {
        if needs_render {
            render_fn(&app)?;
            needs_render = false;
        }

        if !app.running {
            break;
        }

        tokio::select! {
            // Bias toward input channel to prevent input starvation
            biased;

            Some(input) = input_rx.recv() => {
                match app.handle_input(input) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            Some(data) = data_rx.recv() => {
                match app.handle_data(data) {
                    EventResult::Continue => needs_render = true,
                    EventResult::Unchanged => {}
                    EventResult::Quit => break,
                }
            }

            else => break,
        }
    }

    Ok(())
}

/// Create the channels for the TUI
pub fn create_channels() -> (
    mpsc::Sender<InputEvent>,
    mpsc::Receiver<InputEvent>,
    mpsc::Sender<DataEvent>,
    mpsc::Receiver<DataEvent>,
) {
    let (input_tx, input_rx) = mpsc::channel(INPUT_CHANNEL_CAPACITY);
    let (data_tx, data_rx) = mpsc::channel(DATA_CHANNEL_CAPACITY);
    (input_tx, input_rx, data_tx, data_rx)
}

/// Create the refresh request channel shared by the manual refresh key and
/// the auto-refresh ticker
pub fn create_refresh_channel() -> (mpsc::Sender<()>, mpsc::Receiver<()>) {
    mpsc::channel(REFRESH_CHANNEL_CAPACITY)
}
