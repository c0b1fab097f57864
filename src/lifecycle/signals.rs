//! OS signal policy.
//!
//! # Responsibilities
//! - Suppress SIGPIPE process-wide: a peer that closed its end must
//!   surface as an `EPIPE` write error to the component doing the write,
//!   never as process death
//! - Wait for a terminating signal (SIGTERM/SIGINT) and report which one
//!   arrived
//!
//! # Design Decisions
//! - Uses Tokio's signal streams for the terminating signals (async-safe)
//! - SIGPIPE disposition is set once at startup via sigaction; Tokio has
//!   no stream for "ignore"

use std::io;

use nix::sys::signal::{signal, SigHandler, Signal};
use tokio::signal::unix::{signal as signal_stream, SignalKind};

/// Set SIGPIPE to be ignored for the whole process.
pub fn ignore_sigpipe() -> io::Result<()> {
    // SAFETY: SIG_IGN carries no handler code, so there are no
    // async-signal-safety obligations to uphold.
    unsafe { signal(Signal::SIGPIPE, SigHandler::SigIgn) }.map_err(io::Error::from)?;
    Ok(())
}

/// Wait until a terminating signal (SIGTERM or SIGINT) is delivered.
///
/// Returns after logging which signal arrived; the caller decides how to
/// exit.
pub async fn wait_for_termination() -> io::Result<()> {
    let mut sigterm = signal_stream(SignalKind::terminate())?;
    let mut sigint = signal_stream(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => tracing::info!(signal = "SIGTERM", "terminating signal received"),
        _ = sigint.recv() => tracing::info!(signal = "SIGINT", "terminating signal received"),
    }
    Ok(())
}
