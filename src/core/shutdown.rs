//! # Termination signals.
//!
//! [`wait_for_shutdown_signal`] resolves once the process is asked to stop:
//! `SIGINT` or `SIGTERM` on Unix (`docker stop`, systemd and Ctrl-C all land
//! here), Ctrl-C elsewhere.

/// Completes on the first `SIGINT` or `SIGTERM`.
///
/// Fails only if the signal handlers cannot be installed.
#[cfg(unix)]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = interrupt.recv() => tracing::debug!(signal = "SIGINT", "termination requested"),
        _ = terminate.recv() => tracing::debug!(signal = "SIGTERM", "termination requested"),
    }
    Ok(())
}

/// Completes on Ctrl-C.
#[cfg(not(unix))]
pub async fn wait_for_shutdown_signal() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
