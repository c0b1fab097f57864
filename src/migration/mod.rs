//! Interface to the external memory-transfer engine.
//!
//! The actual bytes-on-the-wire transfer protocol lives outside this
//! crate; this module pins down the seam it is called through. The
//! gatekeeper builds a [`HandoffContext`], derives a [`MemoryLocator`]
//! from the accepted path, and invokes [`MemoryReceiver::receive`]
//! synchronously — the call returns only once the transfer has finished
//! or failed, and the receiver owns the transferred descriptor for that
//! whole time.

use std::collections::HashMap;
use std::io;
use std::os::fd::OwnedFd;
use std::os::unix::net::UnixStream;

use crate::handoff::gatekeeper::MIGRATION_PATH_PREFIX;

/// Structured resource locator derived from an accepted envelope path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLocator {
    path: String,
    vm_id: String,
}

impl MemoryLocator {
    /// Parse a locator from a path that passed the prefix check.
    ///
    /// The VM identifier is the first path segment after the migration
    /// prefix, with any query string stripped.
    pub fn from_path(path: &str) -> Self {
        let remainder = path.strip_prefix(MIGRATION_PATH_PREFIX).unwrap_or("");
        let remainder = remainder.split('?').next().unwrap_or("");
        let vm_id = remainder
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or("")
            .to_string();
        Self {
            path: path.to_string(),
            vm_id,
        }
    }

    /// The full original path from the envelope.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The VM identifier segment.
    pub fn vm_id(&self) -> &str {
        &self.vm_id
    }
}

/// Everything the external receiver needs to take over a forwarded
/// connection.
///
/// Dropping the context closes whatever it still owns, so a receiver
/// that fails early cannot leak the descriptor.
#[derive(Debug)]
pub struct HandoffContext {
    /// The connection from the forwarding peer.
    pub stream: UnixStream,

    /// The live client connection, if the peer sent one. The receiver is
    /// responsible for its lifetime from here on.
    pub transferred_fd: Option<OwnedFd>,

    /// Opaque authorization/context tokens from the envelope, unparsed.
    pub cookie: HashMap<String, String>,
}

/// External entry point for inbound memory transfers.
///
/// Implementations return only after the transfer completes or fails.
pub trait MemoryReceiver: Send + Sync {
    /// Take over a forwarded connection and run the transfer.
    fn receive(&self, locator: &MemoryLocator, ctx: HandoffContext) -> io::Result<()>;
}

/// Placeholder receiver used until a transfer engine is wired in.
///
/// Fails every handoff; the context drop closes the descriptor.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReceiver;

impl MemoryReceiver for NullReceiver {
    fn receive(&self, locator: &MemoryLocator, _ctx: HandoffContext) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no transfer engine configured for vm {}", locator.vm_id()),
        ))
    }
}
