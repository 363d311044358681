//! # Watchdog configuration.
//!
//! Provides [`Config`], loaded once at startup from the process environment
//! (optionally pre-populated from a `.env` file).
//!
//! ## Keys
//! | Key                   | Required | Default | Field                  |
//! |-----------------------|----------|---------|------------------------|
//! | `CONTAINER_NAME`      | yes      |         | `container_name`       |
//! | `ERROR_MSG`           | yes      |         | `pattern`              |
//! | `SETTLE_DELAY_SECS`   | no       | `10`    | `settle`               |
//! | `COOLDOWN_SECS`       | no       | `2`     | `cooldown.interval`    |
//! | `COOLDOWN_JITTER`     | no       | `none`  | `cooldown.jitter`      |
//! | `SHUTDOWN_GRACE_SECS` | no       | `30`    | `grace`                |
//! | `LOG_TAIL`            | no       | `1`     | `log_tail`             |
//!
//! Required keys that are unset **or empty** are fatal ([`ConfigError::Missing`]).
//! Durations accept fractional seconds.

use std::path::PathBuf;
use std::time::Duration;

use crate::actuator::RestartActuator;
use crate::error::ConfigError;
use crate::policies::{CooldownPolicy, JitterPolicy};
use crate::scanner::TriggerPattern;

pub const CONTAINER_NAME: &str = "CONTAINER_NAME";
pub const ERROR_MSG: &str = "ERROR_MSG";
pub const SETTLE_DELAY_SECS: &str = "SETTLE_DELAY_SECS";
pub const COOLDOWN_SECS: &str = "COOLDOWN_SECS";
pub const COOLDOWN_JITTER: &str = "COOLDOWN_JITTER";
pub const SHUTDOWN_GRACE_SECS: &str = "SHUTDOWN_GRACE_SECS";
pub const LOG_TAIL: &str = "LOG_TAIL";

/// Runtime configuration of the watchdog.
#[derive(Clone, Debug)]
pub struct Config {
    /// Name or id of the container to supervise.
    pub container_name: String,

    /// Substring that triggers a restart.
    pub pattern: TriggerPattern,

    /// Delay between stop and start of one actuation.
    pub settle: Duration,

    /// Delay between two log sessions.
    pub cooldown: CooldownPolicy,

    /// Maximum wait for the supervisor loop on shutdown.
    pub grace: Duration,

    /// Existing log lines replayed when a stream opens (`"all"` or a number).
    pub log_tail: String,

    /// Capacity of the event bus ring buffer (min 1; clamped by `Bus`).
    pub bus_capacity: usize,
}

impl Config {
    /// Creates a configuration with defaults for every optional field.
    pub fn new(container_name: impl Into<String>, pattern: TriggerPattern) -> Self {
        Self {
            container_name: container_name.into(),
            pattern,
            settle: RestartActuator::DEFAULT_SETTLE,
            cooldown: CooldownPolicy::default(),
            grace: Duration::from_secs(30),
            log_tail: "1".to_string(),
            bus_capacity: 1024,
        }
    }

    /// Loads `.env` (if present), then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing { key })
        };

        let container_name = required(CONTAINER_NAME)?;
        let pattern = TriggerPattern::new(required(ERROR_MSG)?)?;
        let mut cfg = Self::new(container_name, pattern);

        if let Some(v) = lookup(SETTLE_DELAY_SECS) {
            cfg.settle = parse_secs(SETTLE_DELAY_SECS, &v)?;
        }
        if let Some(v) = lookup(COOLDOWN_SECS) {
            cfg.cooldown.interval = parse_secs(COOLDOWN_SECS, &v)?;
        }
        if let Some(v) = lookup(COOLDOWN_JITTER) {
            cfg.cooldown.jitter = v.parse::<JitterPolicy>().map_err(|()| ConfigError::Invalid {
                key: COOLDOWN_JITTER,
                value: v.clone(),
            })?;
        }
        if let Some(v) = lookup(SHUTDOWN_GRACE_SECS) {
            cfg.grace = parse_secs(SHUTDOWN_GRACE_SECS, &v)?;
        }
        if let Some(v) = lookup(LOG_TAIL) {
            cfg.log_tail = parse_tail(&v)?;
        }
        Ok(cfg)
    }
}

/// Loads a `.env` file from the working directory (or its parents) into the environment.
///
/// Absence is not an error: a warning is logged and the process environment is used as is.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::debug!(path = %path.display(), "loaded .env file");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(error = %e, "error loading .env file, using system environment instead");
            None
        }
    }
}

fn parse_secs(key: &'static str, raw: &str) -> Result<Duration, ConfigError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        .ok_or_else(|| ConfigError::Invalid {
            key,
            value: raw.to_string(),
        })
}

fn parse_tail(raw: &str) -> Result<String, ConfigError> {
    let tail = raw.trim();
    if tail.eq_ignore_ascii_case("all") {
        return Ok("all".to_string());
    }
    tail.parse::<u64>()
        .map(|n| n.to_string())
        .map_err(|_| ConfigError::Invalid {
            key: LOG_TAIL,
            value: raw.to_string(),
        })
}
