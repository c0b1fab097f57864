//! Regular API socket dispatch seam.
//!
//! Ordinary request/response calls arrive on the `.rpc` socket. What
//! happens to them — method decode, dispatch tables, responses — lives
//! outside this crate; each accepted connection is simply handed to a
//! [`RpcDispatcher`].

use std::os::unix::net::UnixStream;

/// Handler for connections accepted on the regular API socket.
///
/// Runs on a blocking execution context; the connection closes when the
/// implementation returns (or drops the stream).
pub trait RpcDispatcher: Send + Sync {
    /// Handle one accepted API connection.
    fn dispatch(&self, stream: UnixStream);
}

/// Dispatcher used until a real RPC layer is wired in: logs the
/// connection and drops it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingDispatcher;

impl RpcDispatcher for LoggingDispatcher {
    fn dispatch(&self, _stream: UnixStream) {
        tracing::debug!("rpc connection accepted; no dispatcher configured, dropping");
    }
}
