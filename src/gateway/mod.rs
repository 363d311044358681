//! # Container runtime gateway.
//!
//! The four operations the watchdog needs from a container runtime, behind the
//! [`RuntimeGateway`] trait:
//!
//! ```text
//! resolve(name)        ──► ContainerId        (NotFound if absent / not running)
//! open_log_stream(id)  ──► LogStream          (stdout+stderr lines, follow mode)
//! stop(id)             ──► ()                 ("already stopped" is success)
//! start(id)            ──► ()
//! ```
//!
//! [`DockerGateway`] implements it over the Docker Engine API.

mod docker;
mod lines;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::GatewayError;

pub use docker::DockerGateway;
pub use lines::split_lines;

/// Lazy, unbounded sequence of log lines from one streaming session.
///
/// An `Err` item means the stream broke; the session is over.
pub type LogStream = BoxStream<'static, Result<String, GatewayError>>;

/// Runtime-assigned container identifier (opaque, stable for the container's lifetime).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ContainerId(Arc<str>);

impl ContainerId {
    /// Wraps a raw identifier.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a shared handle to the identifier (for events).
    pub fn as_arc(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The supervised container: operator-supplied name plus resolved id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerRef {
    /// Name (or id) as configured.
    pub name: String,
    /// Identifier returned by the runtime.
    pub id: ContainerId,
}

/// Capability set the watchdog consumes from the container runtime.
///
/// Implementations must be safe for concurrent use.
#[async_trait]
pub trait RuntimeGateway: Send + Sync + 'static {
    /// Resolves a container name (or id) to the id of a running container.
    async fn resolve(&self, name: &str) -> Result<ContainerId, GatewayError>;

    /// Opens a follow-mode log stream (stdout and stderr interleaved).
    async fn open_log_stream(&self, id: &ContainerId) -> Result<LogStream, GatewayError>;

    /// Requests a graceful stop.
    async fn stop(&self, id: &ContainerId) -> Result<(), GatewayError>;

    /// Requests a start.
    async fn start(&self, id: &ContainerId) -> Result<(), GatewayError>;
}

