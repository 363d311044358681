//! Runtime events: types and broadcast bus.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Lifecycle`, `Supervisor`, `core::session`, `RestartActuator`.
//! - **Consumers**: the lifecycle's subscriber listener (fans out to [`Subscribe`](crate::Subscribe)
//!   implementations such as [`LogWriter`](crate::LogWriter)).

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
