//! migratord — inbound live-migration handoff daemon.
//!
//! A trusted peer process forwards a live, already-authenticated client
//! connection to this daemon by passing its file descriptor over a local
//! socket, together with a JSON description of the HTTP request that
//! produced it. The daemon decodes and validates that envelope before the
//! descriptor is used, then either hands the live connection to the memory
//! receiver or answers it with a minimal HTTP 404.
//!
//! # Data Flow
//! ```text
//! peer process
//!     → forwarded socket (net::listener)
//!     → handoff::receiver (one recvmsg: envelope bytes + SCM_RIGHTS fd)
//!     → handoff::gatekeeper (path prefix check)
//!         → migration::MemoryReceiver (accepted; owns the descriptor)
//!         → HTTP 404 onto the descriptor, then close (rejected)
//!
//! rpc socket (net::listener) → rpc::RpcDispatcher
//! ```
//!
//! Every transferred descriptor is closed exactly once: ownership moves
//! through `handoff::descriptor::TransferredFd`, which can only be closed
//! or handed off, never both.

// Core subsystems
pub mod config;
pub mod handoff;
pub mod http;
pub mod migration;
pub mod net;
pub mod rpc;

// Process-lifetime services
pub mod lifecycle;
pub mod observability;
pub mod workers;

pub use config::DaemonConfig;
pub use lifecycle::startup::Daemon;
pub use lifecycle::Shutdown;
pub use migration::{HandoffContext, MemoryLocator, MemoryReceiver};
