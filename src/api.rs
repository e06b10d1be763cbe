//! HTTP interface to the lobby listing endpoint.
//!
//! The endpoint returns the full current record set as a JSON array on every
//! call; there is no pagination or authentication at this boundary. Failures
//! are non-fatal and carry only a human-readable message - transport errors
//! and non-2xx statuses are distinguished by text, not handled differently
//! upstream.

use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::Value;
use thiserror::Error;

use crate::models::{LobbyRecord, RawLobby};

/// A fetch that produced no usable record list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP-level failure (non-2xx status)
    #[error("Network error {0}")]
    Status(u16),

    /// Transport-level failure (DNS, connect, timeout, body read)
    #[error("{0}")]
    Transport(String),

    /// Response body was not valid JSON
    #[error("malformed response: {0}")]
    Parse(String),
}

/// Client for the lobby listing endpoint.
#[derive(Debug, Clone)]
pub struct LobbyClient {
    http: reqwest::Client,
    endpoint: String,
}

impl LobbyClient {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch the current lobby list.
    ///
    /// A 2xx response whose body is valid JSON but not an array yields an
    /// empty list rather than an error; individual malformed array elements
    /// degrade to fully-defaulted records instead of rejecting the response.
    pub async fn fetch_lobbies(&self) -> std::result::Result<Vec<LobbyRecord>, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, "fetching lobby list");

        let response = self
            .http
            .get(&self.endpoint)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "lobby list request failed");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_records(&body)
    }
}

/// Parse a response body into lobby records.
fn parse_records(body: &str) -> std::result::Result<Vec<LobbyRecord>, FetchError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let elements = match value {
        Value::Array(elements) => elements,
        other => {
            tracing::debug!(
                kind = json_kind(&other),
                "listing body was not an array, substituting empty list"
            );
            return Ok(Vec::new());
        }
    };

    let records = elements
        .into_iter()
        .map(|element| {
            let raw = serde_json::from_value::<RawLobby>(element).unwrap_or_else(|e| {
                tracing::debug!("malformed lobby element tolerated: {}", e);
                RawLobby::default()
            });
            LobbyRecord::from_raw(raw)
        })
        .collect();

    Ok(records)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array_of_records() {
        let body = r#"[
            {"lobbyId":"L1","ip":"10.0.0.1","port":27015,"players":3,"maxPlayers":8,"region":"eu","steamId":"765","version":"1.2"},
            {"ip":"10.0.0.2"}
        ]"#;
        let records = parse_records(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].region, "eu");
        assert_eq!(records[1].region, "global");
        assert_eq!(records[1].players, 0);
    }

    #[test]
    fn test_parse_non_array_substitutes_empty() {
        for body in [r#"{"error":"maintenance"}"#, "42", "\"soon\"", "null"] {
            let records = parse_records(body).unwrap();
            assert!(records.is_empty(), "body {body:?} should yield empty list");
        }
    }

    #[test]
    fn test_parse_invalid_json_is_failure() {
        let err = parse_records("<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, FetchError::Parse(_)));
    }

    #[test]
    fn test_parse_tolerates_malformed_elements() {
        let body = r#"[{"ip":"10.0.0.1"}, "garbage", 7]"#;
        let records = parse_records(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].ip, "10.0.0.1");
        assert_eq!(records[1].ip, "unknown");
    }

    #[test]
    fn test_status_error_message() {
        assert_eq!(FetchError::Status(503).to_string(), "Network error 503");
        assert_eq!(FetchError::Status(500).to_string(), "Network error 500");
    }
}
