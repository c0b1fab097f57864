//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Ignore SIGPIPE → Bind both listeners → Start worker pool
//!         → Spawn accept loops → Wait for terminating signal
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → log, exit(0) — in-flight work is abandoned
//!     SIGPIPE        → ignored; broken peers surface as write errors
//!
//! Shutdown (shutdown.rs):
//!     Broadcast coordinator used for in-process teardown (tests)
//! ```
//!
//! # Design Decisions
//! - The daemon counts as "up" once both sockets are bound
//! - Listeners start before the worker pool consumers do any work, but
//!   the pool is started before the accept loops are spawned
//! - No graceful drain: a terminating signal exits immediately

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{Daemon, DaemonHandle, StartupError};
