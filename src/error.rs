//! Error types used by logvisor.
//!
//! This module defines the error enums of the watchdog:
//!
//! - [`ConfigError`] invalid or missing startup configuration (fatal).
//! - [`GatewayError`] failures reported by the container runtime.
//! - [`RuntimeError`] failures of the supervision runtime itself (shutdown).
//! - [`Error`] top-level error returned by the lifecycle controller.
//!
//! Every enum provides `as_label` returning a short stable label for logs.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced while loading configuration.
///
/// All of them are fatal: the process exits before touching the runtime.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required key is unset or empty.
    #[error("environment variable {key} not set")]
    Missing {
        /// Name of the missing key.
        key: &'static str,
    },

    /// The trigger pattern is empty and would match every line.
    #[error("trigger pattern must not be empty")]
    EmptyPattern,

    /// An optional key is present but cannot be parsed.
    #[error("invalid value {value:?} for {key}")]
    Invalid {
        /// Name of the offending key.
        key: &'static str,
        /// Raw value as found in the environment.
        value: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use logvisor::ConfigError;
    ///
    /// let err = ConfigError::Missing { key: "ERROR_MSG" };
    /// assert_eq!(err.as_label(), "config_missing");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Missing { .. } => "config_missing",
            ConfigError::EmptyPattern => "config_empty_pattern",
            ConfigError::Invalid { .. } => "config_invalid",
        }
    }
}

/// # Errors produced by the container runtime gateway.
///
/// Messages are kept as strings so that gateway implementations other than
/// Docker (including in-memory ones) can report them.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// The runtime client could not be constructed.
    #[error("cannot connect to container runtime: {error}")]
    Connect {
        /// The underlying error message.
        error: String,
    },

    /// No running container matches the requested name.
    #[error("container {name} not found or not running")]
    NotFound {
        /// Name (or id) that was looked up.
        name: String,
    },

    /// The runtime could not answer a lookup.
    #[error("container runtime unavailable: {error}")]
    Unavailable {
        /// The underlying error message.
        error: String,
    },

    /// The log stream could not be opened or broke while reading.
    #[error("log stream for container {id} failed: {error}")]
    Stream {
        /// Container identifier.
        id: String,
        /// The underlying error message.
        error: String,
    },

    /// The runtime rejected a stop request.
    #[error("error stopping container {id}: {error}")]
    Stop {
        /// Container identifier.
        id: String,
        /// The underlying error message.
        error: String,
    },

    /// The runtime rejected a start request.
    #[error("error starting container {id}: {error}")]
    Start {
        /// Container identifier.
        id: String,
        /// The underlying error message.
        error: String,
    },
}

impl GatewayError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use logvisor::GatewayError;
    ///
    /// let err = GatewayError::NotFound { name: "web-1".into() };
    /// assert_eq!(err.as_label(), "gateway_not_found");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            GatewayError::Connect { .. } => "gateway_connect",
            GatewayError::NotFound { .. } => "gateway_not_found",
            GatewayError::Unavailable { .. } => "gateway_unavailable",
            GatewayError::Stream { .. } => "gateway_stream",
            GatewayError::Stop { .. } => "gateway_stop",
            GatewayError::Start { .. } => "gateway_start",
        }
    }
}

/// # Errors produced by the supervision runtime.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// The supervisor loop did not stop within the shutdown grace period.
    #[error("shutdown timeout {grace:?} exceeded; forcing termination")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
    },

    /// The supervisor task panicked or was aborted.
    #[error("supervisor task failed: {error}")]
    Join {
        /// The underlying join error message.
        error: String,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use logvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5) };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
            RuntimeError::Join { .. } => "runtime_join",
        }
    }
}

/// # Top-level error of the watchdog process.
///
/// Returned by [`Lifecycle`](crate::Lifecycle) and by configuration loading;
/// any value of this type ends the process with a non-zero status.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The runtime could not be reached or the target could not be resolved.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The supervision runtime failed during shutdown.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    /// OS signal handlers could not be installed.
    #[error("cannot install signal handlers: {0}")]
    Signal(#[from] std::io::Error),
}

impl Error {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            Error::Config(e) => e.as_label(),
            Error::Gateway(e) => e.as_label(),
            Error::Runtime(e) => e.as_label(),
            Error::Signal(_) => "signal_install",
        }
    }
}
