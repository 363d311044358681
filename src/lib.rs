//! # logvisor
//!
//! **Logvisor** is a single-container log watchdog for Docker.
//!
//! It follows the log stream of one container and restarts that container
//! (stop, settle delay, start) whenever a configured substring shows up in a
//! log line. It runs until SIGINT/SIGTERM.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌──────────────┐       ┌──────────────────────────────────────────────┐
//!   │    Config    │──────►│  Lifecycle (process controller)              │
//!   │ (.env + env) │       │  - resolve(CONTAINER_NAME) once, fatal on Err│
//!   └──────────────┘       │  - Bus (broadcast events)                    │
//!                          │  - SubscriberSet (fans out to subscribers)   │
//!                          └──────┬───────────────────────────────┬───────┘
//!                                 ▼                               │
//!                          ┌──────────────┐                       │
//!                          │  Supervisor  │                       │
//!                          │ (session loop│                       │
//!                          │  + cooldown) │                       │
//!                          └──┬────────┬──┘                       │
//!              open_log_stream│        │ Matched                  │
//!                             ▼        ▼                          │
//!                    ┌──────────┐  ┌────────────────┐             │
//!                    │ scan()   │  │RestartActuator │             │
//!                    │ (Trigger │  │ stop ─ settle ─│             │
//!                    │  Pattern)│  │ start          │             │
//!                    └────┬─────┘  └───────┬────────┘             │
//!                         │ Publishes      │ Publishes            │
//!                         │ - SessionOpening - Restarted          │
//!                         │ - TriggerMatched - StopFailed         │
//!                         │ - StreamEnded    - StartFailed        │
//!                         ▼                ▼                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                    (capacity: Config::bus_capacity)               │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │    (in Lifecycle)      │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┴─────────┐
//!                         ▼                   ▼
//!                     LogWriter            custom
//! ```
//!
//! ### Loop
//! ```text
//! loop {
//!   ├─► session += 1, publish SessionOpening
//!   ├─► open_log_stream(id)            ── Err ──► StreamOpenFailed
//!   ├─► scan(lines, pattern)
//!   │       ├─ Matched      ──► TriggerMatched, drop stream, restart (not cancellable)
//!   │       ├─ StreamEnded  ──► StreamEnded
//!   │       └─ StreamFailed ──► StreamFailed
//!   ├─► publish CooldownScheduled, sleep(cooldown) (cancellable)
//!   └─ exit: token cancelled (shutdown signal)
//! }
//! ```
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                          |
//! |-------------------|----------------------------------------------------------|---------------------------------------------|
//! | **Gateway**       | Container runtime operations (Docker via bollard).       | [`RuntimeGateway`], [`DockerGateway`]       |
//! | **Matching**      | Substring trigger over a stream of log lines.            | [`TriggerPattern`], [`scan`]                |
//! | **Actuation**     | Stop, settle, start.                                     | [`RestartActuator`], [`RestartOutcome`]     |
//! | **Supervision**   | Session loop, cooldown, graceful shutdown.               | [`Lifecycle`], [`Supervisor`]               |
//! | **Policies**      | Cooldown interval and jitter.                            | [`CooldownPolicy`], [`JitterPolicy`]        |
//! | **Subscriber API**| Hook into watchdog events (logging, custom subscribers). | [`Subscribe`], [`LogWriter`]                |
//! | **Errors**        | Typed errors for configuration, gateway and runtime.     | [`ConfigError`], [`GatewayError`], [`Error`]|
//! | **Configuration** | Environment (and `.env`) driven settings.                | [`Config`]                                  |
//!
//! ## Example
//! ```rust,no_run
//! use std::sync::Arc;
//! use logvisor::{Config, DockerGateway, Lifecycle, LogWriter, Subscribe};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), logvisor::Error> {
//!     let cfg = Config::from_env()?;
//!     let gateway = Arc::new(DockerGateway::connect(cfg.log_tail.clone())?);
//!
//!     let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
//!     Lifecycle::new(cfg, gateway)
//!         .with_subscribers(subs)
//!         .run()
//!         .await
//! }
//! ```
mod actuator;
mod config;
mod core;
mod error;
mod events;
mod gateway;
mod policies;
mod scanner;
mod subscribers;

// ---- Public re-exports ----

pub use actuator::{RestartActuator, RestartOutcome};
pub use config::{Config, load_dotenv};
pub use core::{Lifecycle, SessionOutcome, Supervisor, run_with, wait_for_shutdown_signal};
pub use error::{ConfigError, Error, GatewayError, RuntimeError};
pub use events::{Bus, Event, EventKind};
pub use gateway::{ContainerId, ContainerRef, DockerGateway, LogStream, RuntimeGateway, split_lines};
pub use policies::{CooldownPolicy, JitterPolicy};
pub use scanner::{ScanOutcome, TriggerPattern, scan};
pub use subscribers::{LogWriter, Subscribe, SubscriberSet};
