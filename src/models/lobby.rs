//! Lobby record types with read-boundary defaulting.
//!
//! The listing endpoint returns records with every field optional and loosely
//! typed (ports and player counts arrive as numbers or numeric strings
//! depending on the server build). `RawLobby` mirrors the wire shape;
//! `LobbyRecord` is the fully-defaulted form the rest of the program works
//! with, so "missing" never leaks past this module.

use serde::Deserialize;

/// Fallback shown for absent text fields.
pub const UNKNOWN: &str = "unknown";

/// Fallback region for records that do not report one.
pub const GLOBAL_REGION: &str = "global";

/// A value that may arrive as an integer, a float, or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LooseValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl LooseValue {
    /// Interpret as a non-negative count. Negative or unparseable values
    /// collapse to `None` so callers default them to 0.
    #[must_use]
    pub fn as_count(&self) -> Option<u32> {
        match self {
            LooseValue::Int(n) => u32::try_from(*n).ok(),
            LooseValue::Float(f) if *f >= 0.0 && f.is_finite() => Some(*f as u32),
            LooseValue::Float(_) => None,
            LooseValue::Text(s) => s.trim().parse::<u32>().ok(),
        }
    }

    /// Stringified form, matching how the original UI printed ports.
    #[must_use]
    pub fn as_display(&self) -> String {
        match self {
            LooseValue::Int(n) => n.to_string(),
            LooseValue::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            LooseValue::Text(s) => s.clone(),
        }
    }
}

/// Wire-format lobby record. Every field is optional and untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLobby {
    #[serde(rename = "lobbyId")]
    pub lobby_id: Option<LooseValue>,

    pub ip: Option<String>,

    pub port: Option<LooseValue>,

    pub players: Option<LooseValue>,

    #[serde(rename = "maxPlayers")]
    pub max_players: Option<LooseValue>,

    pub region: Option<String>,

    #[serde(rename = "steamId")]
    pub steam_id: Option<String>,

    pub version: Option<String>,
}

/// A lobby record with all fields defaulted for display and filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LobbyRecord {
    /// Identifier, display-only, never validated.
    pub lobby_id: String,
    pub ip: String,
    /// Stringified port; empty when the record carried none.
    pub port: String,
    pub players: u32,
    pub max_players: u32,
    pub region: String,
    pub steam_id: String,
    pub version: String,
}

impl LobbyRecord {
    /// Apply the per-field defaulting rules to a wire record.
    #[must_use]
    pub fn from_raw(raw: RawLobby) -> Self {
        Self {
            lobby_id: raw
                .lobby_id
                .map(|v| v.as_display())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            ip: default_text(raw.ip, UNKNOWN),
            port: raw.port.map(|v| v.as_display()).unwrap_or_default(),
            players: raw.players.and_then(|v| v.as_count()).unwrap_or(0),
            max_players: raw.max_players.and_then(|v| v.as_count()).unwrap_or(0),
            region: default_text(raw.region, GLOBAL_REGION),
            steam_id: default_text(raw.steam_id, UNKNOWN),
            version: default_text(raw.version, UNKNOWN),
        }
    }

    /// Connection address in `ip:port` form.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// Whether the record carries a Steam ID usable for joining.
    #[must_use]
    pub fn has_steam_id(&self) -> bool {
        self.steam_id != UNKNOWN && !self.steam_id.is_empty()
    }
}

fn default_text(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(s) if !s.is_empty() => s,
        _ => fallback.to_string(),
    }
}
