//! # Restart actuator: one stop → settle → start cycle.
//!
//! ```text
//! restart(target)
//!   ├─► gateway.stop(id) ── Err ──► publish StopFailed, return StopFailed   (no start)
//!   ├─► sleep(settle)                                                        (fixed, not a poll)
//!   └─► gateway.start(id) ─ Err ──► publish StartFailed, return StartFailed
//!                         └ Ok  ──► publish Restarted,   return Restarted
//! ```
//!
//! ## Rules
//! - `stop` always precedes `start`; `start` is never issued after a failed `stop`.
//! - The settle delay is unconditional. The container is not polled for its
//!   stopped state, so a runtime whose stop outlasts the delay can see `start`
//!   overlap it.
//! - No retries: the outcome is published and returned, never acted upon here.
//! - Not cancellable: once started, an actuation runs to completion so the
//!   container is never left stopped.

use std::time::Duration;

use crate::error::GatewayError;
use crate::events::{Bus, Event, EventKind};
use crate::gateway::{ContainerRef, RuntimeGateway};

/// Result of one actuation.
#[derive(Debug, PartialEq, Eq)]
pub enum RestartOutcome {
    /// Both stop and start were accepted.
    Restarted,
    /// Stop was rejected; start was not attempted.
    StopFailed(GatewayError),
    /// Stop was accepted; start was rejected.
    StartFailed(GatewayError),
}

impl RestartOutcome {
    /// Returns `true` for [`RestartOutcome::Restarted`].
    pub fn is_restarted(&self) -> bool {
        matches!(self, RestartOutcome::Restarted)
    }
}

/// Performs stop → settle → start against a gateway.
#[derive(Clone, Debug)]
pub struct RestartActuator {
    settle: Duration,
    bus: Bus,
}

impl RestartActuator {
    /// Default delay between stop and start.
    pub const DEFAULT_SETTLE: Duration = Duration::from_secs(10);

    /// Creates an actuator publishing its outcomes on `bus`.
    pub fn new(settle: Duration, bus: Bus) -> Self {
        Self { settle, bus }
    }

    /// Runs one actuation against `target`.
    pub async fn restart<G>(&self, gateway: &G, target: &ContainerRef) -> RestartOutcome
    where
        G: RuntimeGateway + ?Sized,
    {
        let id = &target.id;

        if let Err(e) = gateway.stop(id).await {
            self.bus.publish(
                Event::new(EventKind::StopFailed)
                    .with_container(id.as_arc())
                    .with_reason(e.to_string()),
            );
            return RestartOutcome::StopFailed(e);
        }

        tokio::time::sleep(self.settle).await;

        match gateway.start(id).await {
            Ok(()) => {
                self.bus
                    .publish(Event::new(EventKind::Restarted).with_container(id.as_arc()));
                RestartOutcome::Restarted
            }
            Err(e) => {
                self.bus.publish(
                    Event::new(EventKind::StartFailed)
                        .with_container(id.as_arc())
                        .with_reason(e.to_string()),
                );
                RestartOutcome::StartFailed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ContainerId;
    use crate::gateway::fake::{Call, FakeGateway};

    fn target() -> ContainerRef {
        ContainerRef {
            name: "web-1".into(),
            id: ContainerId::new("c0ffee"),
        }
    }

    fn rejected_stop() -> GatewayError {
        GatewayError::Stop {
            id: "c0ffee".into(),
            error: "permission denied".into(),
        }
    }

    #[tokio::test]
    async fn test_stop_then_start() {
        let gw = FakeGateway::new();
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let actuator = RestartActuator::new(Duration::ZERO, bus);

        let out = actuator.restart(&gw, &target()).await;

        assert_eq!(out, RestartOutcome::Restarted);
        assert_eq!(
            gw.calls(),
            vec![Call::Stop("c0ffee".into()), Call::Start("c0ffee".into())]
        );
        assert_eq!(rx.recv().await.unwrap().kind, EventKind::Restarted);
    }

    #[tokio::test]
    async fn test_stop_failure_skips_start() {
        let gw = FakeGateway::new();
        gw.push_stop(Err(rejected_stop()));
        let actuator = RestartActuator::new(Duration::ZERO, Bus::new(16));

        let out = actuator.restart(&gw, &target()).await;

        assert_eq!(out, RestartOutcome::StopFailed(rejected_stop()));
        assert_eq!(gw.calls(), vec![Call::Stop("c0ffee".into())]);
    }

    #[tokio::test]
    async fn test_start_failure_is_reported() {
        let gw = FakeGateway::new();
        let err = GatewayError::Start {
            id: "c0ffee".into(),
            error: "port already allocated".into(),
        };
        gw.push_start(Err(err.clone()));
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let actuator = RestartActuator::new(Duration::ZERO, bus);

        let out = actuator.restart(&gw, &target()).await;

        assert_eq!(out, RestartOutcome::StartFailed(err));
        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::StartFailed);
        assert_eq!(ev.container.as_deref(), Some("c0ffee"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_delay_separates_stop_and_start() {
        let gw = FakeGateway::new();
        let actuator = RestartActuator::new(RestartActuator::DEFAULT_SETTLE, Bus::new(16));

        let begin = tokio::time::Instant::now();
        let out = actuator.restart(&gw, &target()).await;

        assert!(out.is_restarted());
        assert!(begin.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_back_to_back_actuations_keep_order() {
        let gw = FakeGateway::new();
        let actuator = RestartActuator::new(Duration::ZERO, Bus::new(16));

        for _ in 0..3 {
            actuator.restart(&gw, &target()).await;
        }

        let calls = gw.calls();
        assert_eq!(calls.len(), 6);
        for pair in calls.chunks(2) {
            assert_eq!(pair[0], Call::Stop("c0ffee".into()));
            assert_eq!(pair[1], Call::Start("c0ffee".into()));
        }
    }
}
