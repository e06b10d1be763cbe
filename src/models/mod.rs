//! Data models for lobby listings and configuration.

mod config;
mod lobby;

pub use config::{BehaviorConfig, DisplayConfig, LobbyConfig, RefreshConfig, ServerConfig};
pub use lobby::{LobbyRecord, LooseValue, RawLobby};
