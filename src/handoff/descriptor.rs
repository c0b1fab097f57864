//! Single-owner token for a transferred descriptor.

use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};

/// A file descriptor received from the forwarding peer.
///
/// The token has exactly two terminal operations, both of which consume
/// it: [`transfer`](Self::transfer) hands the descriptor to the memory
/// receiver, [`close`](Self::close) ends it after a rejection. Move
/// semantics make double-close or use-after-transfer impossible, and the
/// drop of the inner `OwnedFd` closes the descriptor on any path that
/// reaches neither operation.
#[derive(Debug)]
pub struct TransferredFd(OwnedFd);

impl TransferredFd {
    /// Take ownership of a freshly received descriptor.
    pub fn new(fd: OwnedFd) -> Self {
        Self(fd)
    }

    /// Hand the descriptor off; the caller becomes responsible for its
    /// lifetime.
    pub fn transfer(self) -> OwnedFd {
        self.0
    }

    /// Close the descriptor.
    pub fn close(self) {
        drop(self.0);
    }

    /// Write an entire buffer through the descriptor.
    ///
    /// Used for the rejection response, which must be fully written
    /// before the descriptor is closed.
    pub fn write_all(&self, buf: &[u8]) -> io::Result<()> {
        write_all_fd(self.0.as_fd(), buf)
    }
}

impl AsFd for TransferredFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.0.as_fd()
    }
}

/// Write an entire buffer to a raw descriptor, retrying on interruption.
pub fn write_all_fd(fd: BorrowedFd<'_>, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match nix::unistd::write(fd, buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    io::ErrorKind::WriteZero,
                    "descriptor accepted zero bytes",
                ))
            }
            Ok(n) => buf = &buf[n..],
            Err(nix::errno::Errno::EINTR) => continue,
            Err(e) => return Err(io::Error::from(e)),
        }
    }
    Ok(())
}
