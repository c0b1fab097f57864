//! Validation and routing of decoded envelopes.
//!
//! # Responsibilities
//! - Check the envelope path against the allow-listed prefix
//! - On acceptance: derive the locator, build the handoff context, and
//!   call the memory receiver (synchronously; ownership of the
//!   descriptor moves with the context)
//! - On rejection: write the 404 response onto the transferred
//!   descriptor, then close it
//!
//! # Design Decisions
//! - Exactly one of {reject-and-close, dispatch} happens per connection
//! - A failed rejection write is logged but never skips the close
//! - Rejections are not error conditions; they log at info level

use std::os::unix::net::UnixStream;

use crate::handoff::descriptor::TransferredFd;
use crate::handoff::envelope::ForwardedRequest;
use crate::http;
use crate::migration::{HandoffContext, MemoryLocator, MemoryReceiver};
use crate::net::connection::ConnectionId;

/// Allow-listed path prefix identifying the memory-migration service.
pub const MIGRATION_PATH_PREFIX: &str = "/services/xenops/memory";

/// Whether a forwarded request path is one this daemon services.
///
/// Literal, case-sensitive byte comparison of the first
/// `MIGRATION_PATH_PREFIX.len()` bytes; shorter paths always fail.
pub fn path_allowed(path: &str) -> bool {
    path.as_bytes().starts_with(MIGRATION_PATH_PREFIX.as_bytes())
}

/// Route a decoded envelope: dispatch to the memory receiver or reject.
pub fn route(
    id: ConnectionId,
    envelope: ForwardedRequest,
    transferred: Option<TransferredFd>,
    stream: UnixStream,
    receiver: &dyn MemoryReceiver,
) {
    if !path_allowed(&envelope.path) {
        reject(id, &envelope.path, transferred);
        return;
    }

    let locator = MemoryLocator::from_path(&envelope.path);
    tracing::info!(
        connection = %id,
        vm = %locator.vm_id(),
        "dispatching forwarded connection to memory receiver"
    );

    let ctx = HandoffContext {
        stream,
        transferred_fd: transferred.map(TransferredFd::transfer),
        cookie: envelope.cookie,
    };
    if let Err(e) = receiver.receive(&locator, ctx) {
        // The context moved into the receiver; whatever it still owned is
        // closed by its drop.
        tracing::error!(connection = %id, vm = %locator.vm_id(), error = %e, "memory receive failed");
    }
}

fn reject(id: ConnectionId, path: &str, transferred: Option<TransferredFd>) {
    tracing::info!(connection = %id, path = %path, "rejecting forwarded connection");

    let Some(fd) = transferred else {
        tracing::warn!(connection = %id, "rejected request carried no descriptor to answer on");
        return;
    };

    // The response must be fully written before the descriptor closes so
    // the client sees a clean rejection, not a reset.
    if let Err(e) = fd.write_all(&http::not_found()) {
        tracing::warn!(connection = %id, error = %e, "failed to write rejection response");
    }
    fd.close();
}
