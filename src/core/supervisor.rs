//! # Supervisor: the log-triggered restart loop.
//!
//! Supervises one container with:
//! - repeated log sessions (see [`run_session`]),
//! - restarts through the [`RestartActuator`] on match,
//! - a constant cooldown per [`CooldownPolicy`] between sessions,
//! - cooperative cancellation via [`CancellationToken`].
//!
//! ## State machine
//! ```text
//!            ┌──────────────────────────────────────────┐
//!            ▼                                          │
//!      ┌───────────┐  Matched → restart (to completion) │
//!      │ Streaming │  StreamEnded / StreamFailed        │
//!      └─────┬─────┘  OpenFailed                        │
//!            ▼                                          │
//!      ┌───────────┐                                    │
//!      │ Cooldown  │── sleep(cooldown.next()) ──────────┘
//!      └───────────┘
//!
//! token cancelled (open, read or cooldown) ──► exit
//! ```
//!
//! ## Rules
//! - Sessions run **sequentially**; at most one actuation in flight
//! - No terminal state: every outcome except cancellation leads to `Cooldown`
//! - Session counter **increments on each stream open** (monotonic, never resets)
//! - The loop never branches on the actuation outcome

use std::sync::Arc;

use tokio::{select, time};
use tokio_util::sync::CancellationToken;

use crate::{
    actuator::RestartActuator,
    core::session::{SessionCtx, SessionOutcome, run_session},
    events::{Bus, Event, EventKind},
    gateway::{ContainerRef, RuntimeGateway},
    policies::CooldownPolicy,
    scanner::TriggerPattern,
};

/// Long-lived context of the supervisor loop, built once at startup.
pub struct Supervisor<G: RuntimeGateway + ?Sized> {
    /// Runtime capability set (shared, read-only).
    pub gateway: Arc<G>,
    /// Resolved target container.
    pub target: ContainerRef,
    /// Trigger substring.
    pub pattern: TriggerPattern,
    /// Stop/settle/start performer.
    pub actuator: RestartActuator,
    /// Delay between sessions.
    pub cooldown: CooldownPolicy,
    /// Event bus.
    pub bus: Bus,
}

impl<G: RuntimeGateway + ?Sized> Supervisor<G> {
    /// Runs the loop until `token` is cancelled.
    ///
    /// ### Cancellation semantics
    /// `token` is observed at **safe points** only:
    /// - while opening a stream,
    /// - while waiting for the next log line,
    /// - during the cooldown sleep.
    ///
    /// An actuation in progress finishes before the loop notices cancellation.
    pub async fn run(self, token: CancellationToken) {
        let ctx = SessionCtx {
            gateway: self.gateway.as_ref(),
            target: &self.target,
            pattern: &self.pattern,
            actuator: &self.actuator,
            bus: &self.bus,
        };
        let mut session: u64 = 0;

        loop {
            if token.is_cancelled() {
                break;
            }

            session += 1;
            self.bus.publish(
                Event::new(EventKind::SessionOpening)
                    .with_container(self.target.id.as_arc())
                    .with_session(session),
            );

            let outcome = run_session(&ctx, session, &token).await;
            if matches!(outcome, SessionOutcome::Cancelled) {
                break;
            }

            let delay = self.cooldown.next();
            self.bus.publish(
                Event::new(EventKind::CooldownScheduled)
                    .with_container(self.target.id.as_arc())
                    .with_session(session)
                    .with_delay(delay),
            );

            let sleep = time::sleep(delay);
            tokio::pin!(sleep);
            select! {
                _ = &mut sleep => {}
                _ = token.cancelled() => { break; }
            }
        }
    }
}
