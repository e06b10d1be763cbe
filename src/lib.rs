//! lobbymon - a lobby browser for game servers
//!
//! Fetches the lobby list from a remote listing endpoint and presents it as a
//! filterable, sortable, paginated view, either interactively (TUI) or as
//! one-shot CLI output. The view logic in [`view`] is pure; all network and
//! timer handling lives in [`api`] and [`tui`].

pub mod api;
pub mod display;
pub mod models;
pub mod tui;
pub mod view;
