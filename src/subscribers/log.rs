//! # LogWriter: renders events as log lines
//!
//! Translates every [`Event`] into one `tracing` record. This is the console
//! output of the watchdog: trigger notices, restart outcomes, stream errors and
//! the shutdown notice all come from here.
//!
//! ## Example output
//! ```text
//! INFO  container resolved name="web-1" container=4f1c0e
//! INFO  criteria found, restarting container pattern="OOM" container=4f1c0e session=1
//! INFO  container restarted successfully container=4f1c0e
//! WARN  error reading logs container=4f1c0e session=2 error="..."
//! INFO  shutting down gracefully
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event-to-tracing subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let container = e.container.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");
        match e.kind {
            EventKind::ContainerResolved => {
                info!(name = reason, container, "container resolved");
            }
            EventKind::SessionOpening => {
                debug!(container, session = e.session, "opening log stream");
            }
            EventKind::StreamOpenFailed => {
                warn!(container, session = e.session, error = reason, "error fetching logs");
            }
            EventKind::StreamEnded => {
                debug!(container, session = e.session, "log stream ended");
            }
            EventKind::StreamFailed => {
                warn!(container, session = e.session, error = reason, "error reading logs");
            }
            EventKind::TriggerMatched => {
                info!(
                    pattern = e.pattern.as_deref().unwrap_or(""),
                    container,
                    session = e.session,
                    line = e.line.as_deref().unwrap_or(""),
                    "criteria found, restarting container"
                );
            }
            EventKind::CooldownScheduled => {
                debug!(container, session = e.session, delay_ms = e.delay_ms, "cooling down");
            }
            EventKind::Restarted => {
                info!(container, "container restarted successfully");
            }
            EventKind::StopFailed => {
                error!(container, error = reason, "error stopping container");
            }
            EventKind::StartFailed => {
                error!(container, error = reason, "error starting container");
            }
            EventKind::ShutdownRequested => {
                info!("shutting down gracefully");
            }
            EventKind::AllStoppedWithin => {
                debug!("supervisor stopped within grace");
            }
            EventKind::GraceExceeded => {
                warn!(grace_ms = e.delay_ms, "supervisor did not stop within grace");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log-writer"
    }
}
