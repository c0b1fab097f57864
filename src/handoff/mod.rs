//! Forwarded-connection handoff subsystem.
//!
//! # Data Flow
//! ```text
//! Accepted connection on the forwarded socket
//!     → receiver.rs (one receive: envelope bytes + optional descriptor)
//!     → envelope.rs (JSON decode, immutable ForwardedRequest)
//!     → gatekeeper.rs (path prefix check)
//!         accepted → migration::MemoryReceiver (descriptor ownership moves)
//!         rejected → HTTP 404 onto the descriptor, then close
//! ```
//!
//! # Design Decisions
//! - The envelope is decoded and validated before the descriptor is used
//!   for anything
//! - The descriptor is a single-owner token (`TransferredFd`); exactly one
//!   of {close, transfer} happens per connection, with drop as the
//!   backstop on error paths
//! - Per-connection errors never reach the accept loop

pub mod descriptor;
pub mod envelope;
pub mod gatekeeper;
pub mod receiver;

pub use descriptor::TransferredFd;
pub use envelope::{ForwardedRequest, MAX_ENVELOPE_BYTES};
pub use gatekeeper::MIGRATION_PATH_PREFIX;
