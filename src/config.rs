//! Environment configuration.
//!
//! | Variable                       | Default       | Meaning                          |
//! |--------------------------------|---------------|----------------------------------|
//! | `APP_MODE`                     | `development` | `development`, `production`, `test` |
//! | `LOG_LEVEL`                    | by mode       | `none`, `trace` .. `error`       |
//! | `CACHE_DIR`                    | unset         | enables the session cache file   |
//! | `TMP_DIR`                      | `/tmp`        | scratch space for rendered boards |
//! | `WORDLE_TURN_COOLDOWN_MINUTES` | `0`           | per-player wait between guesses  |
//! | `WORDLE_GAME_COOLDOWN_HOURS`   | `0`           | wait before a finished round restarts |
//! | `WORDLE_SHORTHAND`             | `false`       | allow `/w` in group conversations |

use std::path::PathBuf;

use serde::Serialize;

use crate::error::{ConfigError, Result};
use crate::state::CooldownConfig;

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
    Test,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Test => "test",
        }
    }

    /// Log level used when none is configured.
    pub fn default_log_level(&self) -> LogLevel {
        match self {
            Self::Development => LogLevel::Debug,
            Self::Production => LogLevel::Info,
            Self::Test => LogLevel::None,
        }
    }

    fn parse(value: &str) -> std::result::Result<Self, ConfigError> {
        match value {
            "development" => Ok(Self::Development),
            "production" => Ok(Self::Production),
            "test" => Ok(Self::Test),
            _ => Err(ConfigError::UnknownVariant {
                key: "APP_MODE",
                value: value.to_string(),
            }),
        }
    }
}

/// Logging verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    None,
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter(&self) -> &'static str {
        match self {
            Self::None => "off",
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    fn parse(value: &str) -> std::result::Result<Self, ConfigError> {
        match value {
            "none" | "off" => Ok(Self::None),
            "trace" | "silly" => Ok(Self::Trace),
            "debug" | "verbose" | "http" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(ConfigError::UnknownVariant {
                key: "LOG_LEVEL",
                value: value.to_string(),
            }),
        }
    }
}

/// Game rules settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    #[serde(flatten)]
    pub cooldowns: CooldownConfig,

    /// Accept `/w` outside private conversations
    pub shorthand: bool,
}

/// Full process configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub mode: Mode,
    pub log_level: LogLevel,
    pub cache_dir: Option<PathBuf>,
    pub tmp_dir: PathBuf,
    pub game: GameConfig,
}

impl Default for Config {
    fn default() -> Self {
        let mode = Mode::default();
        Self {
            mode,
            log_level: mode.default_log_level(),
            cache_dir: None,
            tmp_dir: PathBuf::from("/tmp"),
            game: GameConfig::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| std::env::var(key).ok())?)
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = get("APP_MODE")
            .map(|v| Mode::parse(v.trim()))
            .transpose()?
            .unwrap_or_default();

        let log_level = get("LOG_LEVEL")
            .map(|v| LogLevel::parse(v.trim()))
            .transpose()?
            .unwrap_or_else(|| mode.default_log_level());

        let turn_cooldown_ms = scaled(
            "WORDLE_TURN_COOLDOWN_MINUTES",
            get("WORDLE_TURN_COOLDOWN_MINUTES"),
            MINUTE_MS,
        )?;
        let game_cooldown_ms = scaled(
            "WORDLE_GAME_COOLDOWN_HOURS",
            get("WORDLE_GAME_COOLDOWN_HOURS"),
            HOUR_MS,
        )?;

        Ok(Self {
            mode,
            log_level,
            cache_dir: get("CACHE_DIR").map(PathBuf::from),
            tmp_dir: get("TMP_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("/tmp")),
            game: GameConfig {
                cooldowns: CooldownConfig::new(turn_cooldown_ms, game_cooldown_ms),
                shorthand: get("WORDLE_SHORTHAND").is_some_and(|v| v.trim() == "true"),
            },
        })
    }
}

/// Parse a non-negative whole number of units and convert to milliseconds.
fn scaled(
    key: &'static str,
    value: Option<String>,
    unit_ms: u64,
) -> std::result::Result<u64, ConfigError> {
    let Some(value) = value else {
        return Ok(0);
    };
    let invalid = || ConfigError::InvalidNumber {
        key,
        value: value.clone(),
    };
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| invalid())?
        .checked_mul(unit_ms)
        .ok_or_else(invalid)
}
