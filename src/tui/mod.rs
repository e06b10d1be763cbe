//! Terminal User Interface for lobbymon
//!
//! An interactive lobby browser:
//! - Periodic refresh from the listing endpoint, toggleable at runtime
//! - Dual-channel event architecture (priority input, backpressure-aware data)
//! - Keyboard-driven filtering, sorting, and pagination
//! - Graceful degradation when the endpoint is unreachable

pub mod app;
pub mod event;
pub mod runtime;
pub mod theme;
pub mod ui;

use std::io::{self, stdout, IsTerminal};
use std::time::Duration;

use anyhow::{bail, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

use crate::api::LobbyClient;
use crate::models::LobbyConfig;
use crate::tui::app::App;
use crate::tui::runtime::{
    create_channels, create_refresh_channel, run_event_loop, spawn_input_task,
    spawn_lobby_fetcher, AutoRefresh, TuiRuntime,
};

/// Terminal capability requirements for TUI mode
#[derive(Debug)]
pub struct TerminalCapabilities {
    pub is_tty: bool,
    pub term_type: String,
    pub supports_alternate_screen: bool,
}

impl TerminalCapabilities {
    /// Detect terminal capabilities
    pub fn detect() -> Self {
        let is_tty = stdout().is_terminal();
        let term_type = std::env::var("TERM").unwrap_or_default();

        // Check for known problematic terminals
        let supports_alternate_screen = !matches!(term_type.as_str(), "dumb" | "" | "unknown");

        Self {
            is_tty,
            term_type,
            supports_alternate_screen,
        }
    }

    /// Check if terminal is suitable for TUI mode
    pub fn is_suitable(&self) -> bool {
        self.is_tty && self.supports_alternate_screen
    }

    /// Get error message for unsuitable terminal
    pub fn error_message(&self) -> String {
        if !self.is_tty {
            "TUI mode requires an interactive terminal (stdout is not a TTY).\n\
             Hint: Use 'lobbymon list' for non-interactive output instead."
                .to_string()
        } else if !self.supports_alternate_screen {
            format!(
                "Terminal type '{}' may not support TUI mode.\n\
                 Hint: Set TERM to a supported value (e.g., xterm-256color) or use 'lobbymon list'.",
                if self.term_type.is_empty() {
                    "(unset)"
                } else {
                    &self.term_type
                }
            )
        } else {
            "Unknown terminal capability issue.".to_string()
        }
    }
}

/// Run the TUI application
pub async fn run_tui(config: LobbyConfig, config_warnings: Vec<String>) -> Result<()> {
    // Check terminal capabilities before attempting TUI mode
    let capabilities = TerminalCapabilities::detect();
    if !capabilities.is_suitable() {
        bail!("{}", capabilities.error_message());
    }

    let client = LobbyClient::new(
        &config.server.endpoint,
        Duration::from_secs(config.server.timeout_secs),
    )?;

    // Setup terminal
    let mut terminal = setup_terminal()?;

    // Create channels and runtime
    let (input_tx, input_rx, data_tx, data_rx) = create_channels();
    let (refresh_tx, refresh_rx) = create_refresh_channel();
    let mut runtime = TuiRuntime::new();

    let auto_refresh = AutoRefresh::new(
        Duration::from_millis(config.refresh.interval_ms),
        refresh_tx.clone(),
        runtime.cancel_token(),
    );

    let start_enabled = config.behavior.auto_refresh;
    let mut app = App::new(config, config_warnings, refresh_tx, auto_refresh);
    if start_enabled {
        app.auto_refresh.enable();
    }

    // Spawn background tasks
    runtime.track(spawn_input_task(input_tx, runtime.cancel_token()));
    runtime.track(spawn_lobby_fetcher(
        client,
        data_tx.clone(),
        runtime.cancel_token(),
        refresh_rx,
    ));

    // Run the main event loop
    let result = run_event_loop(app, input_rx, data_rx, |app| {
        terminal.draw(|frame| ui::render(app, frame))?;
        Ok(())
    })
    .await;

    // Shutdown background tasks
    runtime.shutdown().await;

    // Restore terminal
    restore_terminal(&mut terminal)?;

    result
}

/// Setup the terminal for TUI mode
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to normal mode
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the TUI with the tokio runtime (entry point from main)
pub fn run(config: LobbyConfig, config_warnings: Vec<String>) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_tui(config, config_warnings))
}
