//! # Lifecycle: startup, supervision and graceful shutdown.
//!
//! The [`Lifecycle`] owns the configuration, the gateway handle, the event bus
//! and the subscribers. It resolves the target once, spawns the [`Supervisor`]
//! loop and waits for a termination request.
//!
//! ## Flow
//! ```text
//! run_with(lookup, connect, ..)
//!   ├─► Config::from_lookup(lookup)          ── Err ──► fatal (connect never called)
//!   ├─► connect(&cfg)                        ── Err ──► fatal
//!   └─► Lifecycle::run_until(shutdown)
//!
//! run() / run_until(shutdown)
//!   ├─► gateway.resolve(container_name)      ── Err ──► fatal (no stream opened)
//!   ├─► subscriber listener: Bus ─► SubscriberSet (LogWriter, ...)
//!   ├─► publish ContainerResolved
//!   ├─► spawn Supervisor::run(child_token)
//!   ├─► await shutdown signal (or unexpected loop exit)
//!   ├─► publish ShutdownRequested             (signal received only)
//!   ├─► runtime_token.cancel()              → propagates to the loop
//!   ├─► wait for the loop within cfg.grace:
//!   │      ├─ Ok (joined)        → publish AllStoppedWithin
//!   │      └─ Timeout exceeded   → publish GraceExceeded, abort, Err(GraceExceeded)
//!   └─► drain subscribers
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::{
    actuator::RestartActuator,
    config::Config,
    core::{shutdown, supervisor::Supervisor},
    error::{Error, GatewayError, RuntimeError},
    events::{Bus, Event, EventKind},
    gateway::{ContainerRef, RuntimeGateway},
    subscribers::{Subscribe, SubscriberSet},
};

/// Process-level controller of the watchdog.
pub struct Lifecycle<G: RuntimeGateway + ?Sized> {
    cfg: Config,
    gateway: Arc<G>,
    bus: Bus,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<G: RuntimeGateway + ?Sized> Lifecycle<G> {
    /// Creates a controller for the given configuration and gateway.
    pub fn new(cfg: Config, gateway: Arc<G>) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        Self {
            cfg,
            gateway,
            bus,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers (e.g. [`LogWriter`](crate::LogWriter)).
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Returns the event bus, e.g. to subscribe before [`run`](Self::run).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs until SIGINT/SIGTERM (Ctrl-C on non-Unix).
    pub async fn run(self) -> Result<(), Error> {
        self.run_until(shutdown::wait_for_shutdown_signal()).await
    }

    /// Runs until `shutdown` completes.
    ///
    /// Returns an error if the target cannot be resolved (before any stream is
    /// opened), if `shutdown` fails, or if the loop outlives the grace period.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), Error>
    where
        F: Future<Output = std::io::Result<()>>,
    {
        let id = self.gateway.resolve(&self.cfg.container_name).await?;
        let target = ContainerRef {
            name: self.cfg.container_name.clone(),
            id,
        };

        let listener_token = CancellationToken::new();
        let listener = self.subscriber_listener(listener_token.clone());

        self.bus.publish(
            Event::new(EventKind::ContainerResolved)
                .with_container(target.id.as_arc())
                .with_reason(target.name.as_str()),
        );

        let runtime_token = CancellationToken::new();
        let supervisor = Supervisor {
            gateway: Arc::clone(&self.gateway),
            target,
            pattern: self.cfg.pattern.clone(),
            actuator: RestartActuator::new(self.cfg.settle, self.bus.clone()),
            cooldown: self.cfg.cooldown,
            bus: self.bus.clone(),
        };
        let mut handle = tokio::spawn(supervisor.run(runtime_token.child_token()));

        let waited: Result<(), Error> = tokio::select! {
            res = shutdown => res.map_err(Error::from),
            joined = &mut handle => Err(unexpected_exit(joined).into()),
        };

        match &waited {
            Ok(()) => self.bus.publish(Event::new(EventKind::ShutdownRequested)),
            Err(e) => tracing::error!(
                label = e.as_label(),
                error = %e,
                "stopping watchdog without a shutdown request"
            ),
        }
        runtime_token.cancel();
        let stopped = if handle.is_finished() {
            Ok(())
        } else {
            self.wait_with_grace(handle).await
        };

        listener_token.cancel();
        let _ = listener.await;

        waited?;
        stopped.map_err(Error::from)
    }

    /// Forwards bus events to the subscriber set until `token` is cancelled,
    /// then drains what is already queued and waits for subscribers to finish.
    fn subscriber_listener(&self, token: CancellationToken) -> JoinHandle<()> {
        let mut rx = self.bus.subscribe();
        let set = SubscriberSet::new(self.subscribers.clone());

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    res = rx.recv() => match res {
                        Ok(ev) => set.emit(ev),
                        Err(RecvError::Lagged(n)) => {
                            tracing::warn!(skipped = n, "event listener lagged");
                        }
                        Err(RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => {
                        while let Ok(ev) = rx.try_recv() {
                            set.emit(ev);
                        }
                        break;
                    }
                }
            }
            set.shutdown().await;
        })
    }

    /// Waits for the supervisor loop up to `cfg.grace`.
    async fn wait_with_grace(&self, mut handle: JoinHandle<()>) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(())) => {
                self.bus.publish(Event::new(EventKind::AllStoppedWithin));
                Ok(())
            }
            Ok(Err(e)) => Err(RuntimeError::Join {
                error: e.to_string(),
            }),
            Err(_elapsed) => {
                self.bus
                    .publish(Event::new(EventKind::GraceExceeded).with_delay(grace));
                handle.abort();
                Err(RuntimeError::GraceExceeded { grace })
            }
        }
    }
}

/// Startup sequence of the watchdog process.
///
/// Configuration is read through `lookup` first; `connect` is only called once
/// it is valid. The resulting [`Lifecycle`] then runs until `shutdown` completes.
pub async fn run_with<L, C, G, F>(
    lookup: L,
    connect: C,
    subscribers: Vec<Arc<dyn Subscribe>>,
    shutdown: F,
) -> Result<(), Error>
where
    L: Fn(&str) -> Option<String>,
    C: FnOnce(&Config) -> Result<Arc<G>, GatewayError>,
    G: RuntimeGateway + ?Sized,
    F: Future<Output = std::io::Result<()>>,
{
    let cfg = Config::from_lookup(lookup)?;
    tracing::info!(
        container = %cfg.container_name,
        pattern = %cfg.pattern,
        settle = ?cfg.settle,
        cooldown = ?cfg.cooldown.interval,
        "starting watchdog"
    );

    let gateway = connect(&cfg)?;
    Lifecycle::new(cfg, gateway)
        .with_subscribers(subscribers)
        .run_until(shutdown)
        .await
}

fn unexpected_exit(joined: Result<(), tokio::task::JoinError>) -> RuntimeError {
    let error = match joined {
        Ok(()) => "supervisor loop exited unexpectedly".to_string(),
        Err(e) => e.to_string(),
    };
    RuntimeError::Join { error }
}
