//! Configuration types for lobbymon.
//!
//! Configuration is layered: built-in defaults, then `/etc/lobbymon/config.toml`,
//! then the user config file, then `LOBBYMON_*` environment overrides. Invalid
//! values are corrected to defaults with a warning unless
//! `LOBBYMON_STRICT_CONFIG=1` is set, in which case they are fatal.

use serde::{Deserialize, Serialize};

/// Minimum allowed refresh interval in milliseconds (prevents tight polling loops)
const MIN_REFRESH_INTERVAL_MS: u64 = 250;

/// Minimum request timeout in seconds
const MIN_TIMEOUT_SECS: u64 = 1;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct LobbyConfig {
    pub server: ServerConfig,

    pub refresh: RefreshConfig,

    pub display: DisplayConfig,

    pub behavior: BehaviorConfig,
}

/// Listing endpoint settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// URL of the lobby listing endpoint
    pub endpoint: String,

    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://server.ctksystem.com/lobby/list".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// Auto-refresh interval in milliseconds
    pub interval_ms: u64,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_ms: 5000 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Records per page
    pub page_size: usize,

    /// Theme name ("dark" or "light")
    pub theme: String,

    /// Sort order on startup: players_desc, players_asc, or unordered
    pub default_sort: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            theme: "dark".to_string(),
            default_sort: "players_desc".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Start with auto-refresh enabled
    pub auto_refresh: bool,

    /// Enable clipboard support for yanking Steam IDs
    pub copy_to_clipboard: bool,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            auto_refresh: false,
            copy_to_clipboard: true,
        }
    }
}

impl LobbyConfig {
    /// Get the user config file path, respecting XDG_CONFIG_HOME
    ///
    /// Resolution order:
    /// 1. $XDG_CONFIG_HOME/lobbymon/config.toml (if XDG_CONFIG_HOME is set)
    /// 2. $HOME/.config/lobbymon/config.toml (if HOME is set)
    /// 3. dirs::config_dir()/lobbymon/config.toml (fallback using dirs crate)
    /// 4. None if no config directory can be determined
    #[must_use]
    pub fn user_config_path() -> Option<std::path::PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            if !xdg_config.is_empty() {
                return Some(std::path::PathBuf::from(xdg_config).join("lobbymon/config.toml"));
            }
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Some(std::path::PathBuf::from(home).join(".config/lobbymon/config.toml"));
        }

        dirs::config_dir().map(|dir| dir.join("lobbymon/config.toml"))
    }

    /// Load configuration from files and environment.
    /// Returns the config and any warnings encountered during loading.
    pub fn load() -> (Self, Vec<String>) {
        let mut config = Self::default();
        let mut warnings = Vec::new();
        let strict = Self::is_strict_mode();

        Self::load_config_file(&mut config, "/etc/lobbymon/config.toml", &mut warnings);

        if let Some(user_path) = Self::user_config_path() {
            Self::load_config_file(&mut config, &user_path.to_string_lossy(), &mut warnings);
        }

        config.apply_env_overrides();

        match config.validate(strict) {
            Ok(validation_warnings) => warnings.extend(validation_warnings),
            Err(err) => {
                eprintln!("Error: {}", err);
                eprintln!("(LOBBYMON_STRICT_CONFIG is set - config errors are fatal)");
                std::process::exit(1);
            }
        }

        (config, warnings)
    }

    /// Validate configuration values.
    /// Returns warnings for values that were corrected to defaults.
    /// If `strict` is true, returns Err instead of correcting values.
    pub fn validate(&mut self, strict: bool) -> Result<Vec<String>, String> {
        let mut warnings = Vec::new();

        correct_min(
            &mut self.refresh.interval_ms,
            MIN_REFRESH_INTERVAL_MS,
            RefreshConfig::default().interval_ms,
            "refresh.interval_ms",
            "ms",
            strict,
            &mut warnings,
        )?;

        correct_min(
            &mut self.server.timeout_secs,
            MIN_TIMEOUT_SECS,
            ServerConfig::default().timeout_secs,
            "server.timeout_secs",
            "second(s)",
            strict,
            &mut warnings,
        )?;

        if self.display.page_size == 0 {
            let default = DisplayConfig::default().page_size;
            let msg = "display.page_size must be at least 1, got 0".to_string();
            if strict {
                return Err(msg);
            }
            warnings.push(format!("{msg} - using default ({default})"));
            self.display.page_size = default;
        }

        if self.server.endpoint.is_empty() {
            let msg = "server.endpoint must not be empty".to_string();
            if strict {
                return Err(msg);
            }
            warnings.push(format!("{msg} - using default"));
            self.server.endpoint = ServerConfig::default().endpoint;
        }

        Ok(warnings)
    }

    /// Check if strict config mode is enabled via LOBBYMON_STRICT_CONFIG
    fn is_strict_mode() -> bool {
        std::env::var("LOBBYMON_STRICT_CONFIG")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// Load a config file, collecting warnings on parse errors but not on missing files.
    /// If LOBBYMON_STRICT_CONFIG=1 is set, parse errors cause immediate exit.
    fn load_config_file(config: &mut Self, path: &str, warnings: &mut Vec<String>) {
        let strict = Self::is_strict_mode();

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<LobbyConfig>(&content) {
                Ok(parsed) => config.merge(parsed),
                Err(e) => {
                    if strict {
                        eprintln!("Error: Failed to parse config file '{}': {}", path, e);
                        eprintln!("(LOBBYMON_STRICT_CONFIG is set - config errors are fatal)");
                        std::process::exit(1);
                    } else {
                        warnings.push(format!("Config parse error in '{}': {}", path, e));
                    }
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Missing config files are expected
            }
            Err(e) => {
                if strict {
                    eprintln!("Error: Could not read config file '{}': {}", path, e);
                    eprintln!("(LOBBYMON_STRICT_CONFIG is set - config errors are fatal)");
                    std::process::exit(1);
                } else {
                    warnings.push(format!("Could not read config '{}': {}", path, e));
                }
            }
        }
    }

    fn merge(&mut self, other: LobbyConfig) {
        self.server = other.server;
        self.refresh = other.refresh;
        self.display = other.display;
        self.behavior = other.behavior;
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("LOBBYMON_ENDPOINT") {
            if !val.is_empty() {
                self.server.endpoint = val;
            }
        }

        if let Ok(val) = std::env::var("LOBBYMON_REFRESH_MS") {
            match val.parse::<u64>() {
                Ok(ms) if ms >= MIN_REFRESH_INTERVAL_MS => self.refresh.interval_ms = ms,
                _ => eprintln!(
                    "Warning: Invalid value '{}' for LOBBYMON_REFRESH_MS, expected an integer >= {} - using default",
                    val, MIN_REFRESH_INTERVAL_MS
                ),
            }
        }

        if let Ok(val) = std::env::var("LOBBYMON_PAGE_SIZE") {
            match val.parse::<usize>() {
                Ok(n) if n >= 1 => self.display.page_size = n,
                _ => eprintln!(
                    "Warning: Invalid value '{}' for LOBBYMON_PAGE_SIZE, expected a positive integer - using default",
                    val
                ),
            }
        }

        if let Ok(val) = std::env::var("LOBBYMON_THEME") {
            self.display.theme = val;
        }
        if std::env::var("LOBBYMON_NO_CLIPBOARD").is_ok() {
            self.behavior.copy_to_clipboard = false;
        }
    }
}

/// Correct a numeric value below its minimum to the default, warning in
/// non-strict mode and erroring in strict mode.
fn correct_min(
    value: &mut u64,
    min: u64,
    default: u64,
    field: &str,
    unit: &str,
    strict: bool,
    warnings: &mut Vec<String>,
) -> Result<(), String> {
    if *value < min {
        let msg = format!("{field} must be at least {min} {unit}, got {value}");
        if strict {
            return Err(msg);
        }
        warnings.push(format!("{msg} - using default ({default})"));
        *value = default;
    }
    Ok(())
}
