//! Runtime core: orchestration and lifecycle.
//!
//! The only public entry point is [`Lifecycle`], which resolves the target,
//! drives the [`Supervisor`] loop, and handles graceful shutdown.
//!
//! Internal modules:
//! - [`lifecycle`]: startup, subscriber listener, signal wait and grace period;
//! - [`supervisor`]: the session/cooldown loop for one container;
//! - [`session`]: opens one log stream, scans it, actuates on match;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod lifecycle;
mod session;
mod shutdown;
mod supervisor;

pub use lifecycle::{Lifecycle, run_with};
pub use session::SessionOutcome;
pub use shutdown::wait_for_shutdown_signal;
pub use supervisor::Supervisor;
