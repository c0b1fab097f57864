//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming local-socket connection
//!     → listener.rs (accept loop, connection limits)
//!     → connection.rs (per-connection id for log correlation)
//!     → Hand off to the handoff or rpc layer
//!
//! Forwarded-connection socket only:
//!     → fdpass.rs (one recvmsg: message bytes + SCM_RIGHTS descriptor)
//! ```
//!
//! # Design Decisions
//! - Bounded accept queue prevents resource exhaustion
//! - Descriptor passing is isolated behind the `HandleReceiver` trait so
//!   the layers above it are testable with fakes

pub mod connection;
pub mod fdpass;
pub mod listener;

pub use fdpass::{recv_with_fd, send_with_fd, HandleReceiver};
pub use listener::{Listener, ListenerError};
