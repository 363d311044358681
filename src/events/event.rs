//! # Runtime events emitted by the lifecycle controller and the supervisor loop.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Session events**: log stream flow (opening, ended, failed, trigger matched)
//! - **Actuation events**: restart outcome (restarted, stop failed, start failed)
//! - **Lifecycle events**: resolution and shutdown
//!
//! The [`Event`] struct carries additional metadata such as timestamps, container
//! id, session number, reasons and cooldown delays.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use logvisor::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::TriggerMatched)
//!     .with_container("4f1c0e")
//!     .with_pattern("OOM")
//!     .with_session(3);
//!
//! assert_eq!(ev.kind, EventKind::TriggerMatched);
//! assert_eq!(ev.container.as_deref(), Some("4f1c0e"));
//! assert_eq!(ev.session, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Lifecycle events ===
    /// Target container resolved at startup.
    ///
    /// Sets:
    /// - `container`: resolved container id
    /// - `reason`: operator-supplied name
    ContainerResolved,

    /// Shutdown requested (OS signal observed).
    ShutdownRequested,

    /// Supervisor loop stopped within the configured grace period.
    AllStoppedWithin,

    /// Grace period exceeded; the supervisor loop did not stop in time.
    ///
    /// Sets:
    /// - `delay_ms`: configured grace (ms)
    GraceExceeded,

    // === Session events ===
    /// A new log session is starting.
    ///
    /// Sets:
    /// - `container`, `session`
    SessionOpening,

    /// The log stream could not be opened.
    ///
    /// Sets:
    /// - `container`, `session`
    /// - `reason`: gateway error
    StreamOpenFailed,

    /// The log stream closed without a match.
    ///
    /// Sets:
    /// - `container`, `session`
    StreamEnded,

    /// Reading the log stream failed.
    ///
    /// Sets:
    /// - `container`, `session`
    /// - `reason`: gateway error
    StreamFailed,

    /// A log line contained the trigger pattern.
    ///
    /// Sets:
    /// - `container`, `session`, `pattern`
    /// - `line`: the matching log line
    TriggerMatched,

    /// Cooldown before the next session.
    ///
    /// Sets:
    /// - `container`, `session`: the session that just ended
    /// - `delay_ms`: cooldown delay (ms)
    CooldownScheduled,

    // === Actuation events ===
    /// Container stopped and started again.
    ///
    /// Sets:
    /// - `container`
    Restarted,

    /// Stop was rejected; start was not attempted.
    ///
    /// Sets:
    /// - `container`
    /// - `reason`: gateway error
    StopFailed,

    /// Stop succeeded but start was rejected.
    ///
    /// Sets:
    /// - `container`
    /// - `reason`: gateway error
    StartFailed,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Container id, if applicable.
    pub container: Option<Arc<str>>,
    /// Session number (starting from 1).
    pub session: Option<u64>,
    /// Trigger pattern (for `TriggerMatched`).
    pub pattern: Option<Arc<str>>,
    /// Matching log line (for `TriggerMatched`).
    pub line: Option<Arc<str>>,
    /// Delay in milliseconds (compact).
    pub delay_ms: Option<u32>,
    /// Human-readable reason (errors, names).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            container: None,
            session: None,
            pattern: None,
            line: None,
            delay_ms: None,
            reason: None,
        }
    }

    /// Attaches a container id.
    #[inline]
    pub fn with_container(mut self, id: impl Into<Arc<str>>) -> Self {
        self.container = Some(id.into());
        self
    }

    /// Attaches a session number.
    #[inline]
    pub fn with_session(mut self, n: u64) -> Self {
        self.session = Some(n);
        self
    }

    /// Attaches the trigger pattern.
    #[inline]
    pub fn with_pattern(mut self, pattern: impl Into<Arc<str>>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Attaches a log line.
    #[inline]
    pub fn with_line(mut self, line: impl Into<Arc<str>>) -> Self {
        self.line = Some(line.into());
        self
    }

    /// Attaches a delay (stored as milliseconds).
    #[inline]
    pub fn with_delay(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.delay_ms = Some(ms);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Returns the delay as a [`Duration`], if set.
    #[inline]
    pub fn delay(&self) -> Option<Duration> {
        self.delay_ms.map(|ms| Duration::from_millis(u64::from(ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::new(EventKind::SessionOpening);
        let b = Event::new(EventKind::StreamEnded);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_delay_saturates() {
        let ev = Event::new(EventKind::CooldownScheduled).with_delay(Duration::from_secs(u64::MAX));
        assert_eq!(ev.delay_ms, Some(u32::MAX));

        let ev = Event::new(EventKind::CooldownScheduled).with_delay(Duration::from_millis(2000));
        assert_eq!(ev.delay(), Some(Duration::from_secs(2)));
    }
}
