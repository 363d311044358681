//! # Run a single log session.
//!
//! Opens one log stream, scans it, and actuates a restart on match.
//! Publishes lifecycle events to the [`Bus`].
//!
//! ## Event flow
//!
//! ```text
//! Open failure:
//!   open_log_stream() → Err → publish StreamOpenFailed
//!
//! Match:
//!   scan() → Matched → publish TriggerMatched → actuator.restart() → Restarted/StopFailed/StartFailed
//!
//! No match:
//!   scan() → StreamEnded  → publish StreamEnded
//!   scan() → StreamFailed → publish StreamFailed
//!
//! Cancellation:
//!   open or read interrupted → no event
//! ```
//!
//! ## Rules
//! - Publishes **at most one** `TriggerMatched` per session
//! - The stream is dropped **before** the actuation starts (one live stream at a time)
//! - The actuation itself is **not** interrupted by cancellation

use tokio_util::sync::CancellationToken;

use crate::{
    actuator::{RestartActuator, RestartOutcome},
    error::GatewayError,
    events::{Bus, Event, EventKind},
    gateway::{ContainerRef, RuntimeGateway},
    scanner::{ScanOutcome, TriggerPattern, scan},
};

/// How one session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The pattern matched and an actuation ran (whatever its outcome).
    Restarted(RestartOutcome),
    /// The stream closed without a match.
    StreamEnded,
    /// The stream broke while reading.
    StreamFailed(GatewayError),
    /// The stream could not be opened.
    OpenFailed(GatewayError),
    /// Cancellation interrupted the open or a read.
    Cancelled,
}

/// Borrowed context of one session.
pub(crate) struct SessionCtx<'a, G: RuntimeGateway + ?Sized> {
    pub gateway: &'a G,
    pub target: &'a ContainerRef,
    pub pattern: &'a TriggerPattern,
    pub actuator: &'a RestartActuator,
    pub bus: &'a Bus,
}

/// Executes session number `session`.
pub(crate) async fn run_session<G>(
    ctx: &SessionCtx<'_, G>,
    session: u64,
    token: &CancellationToken,
) -> SessionOutcome
where
    G: RuntimeGateway + ?Sized,
{
    let id = &ctx.target.id;

    let opened = tokio::select! {
        biased;
        _ = token.cancelled() => return SessionOutcome::Cancelled,
        res = ctx.gateway.open_log_stream(id) => res,
    };
    let mut lines = match opened {
        Ok(lines) => lines,
        Err(e) => {
            publish(ctx.bus, EventKind::StreamOpenFailed, ctx.target, session, Some(&e));
            return SessionOutcome::OpenFailed(e);
        }
    };

    let scanned = scan(&mut lines, ctx.pattern, token).await;
    drop(lines);

    match scanned {
        ScanOutcome::Matched { line } => {
            ctx.bus.publish(
                Event::new(EventKind::TriggerMatched)
                    .with_container(id.as_arc())
                    .with_session(session)
                    .with_pattern(ctx.pattern.as_arc())
                    .with_line(line),
            );
            let outcome = ctx.actuator.restart(ctx.gateway, ctx.target).await;
            SessionOutcome::Restarted(outcome)
        }
        ScanOutcome::StreamEnded => {
            publish(ctx.bus, EventKind::StreamEnded, ctx.target, session, None);
            SessionOutcome::StreamEnded
        }
        ScanOutcome::StreamFailed(e) => {
            publish(ctx.bus, EventKind::StreamFailed, ctx.target, session, Some(&e));
            SessionOutcome::StreamFailed(e)
        }
        ScanOutcome::Cancelled => SessionOutcome::Cancelled,
    }
}

fn publish(
    bus: &Bus,
    kind: EventKind,
    target: &ContainerRef,
    session: u64,
    err: Option<&GatewayError>,
) {
    let mut ev = Event::new(kind)
        .with_container(target.id.as_arc())
        .with_session(session);
    if let Some(e) = err {
        ev = ev.with_reason(e.to_string());
    }
    bus.publish(ev);
}
