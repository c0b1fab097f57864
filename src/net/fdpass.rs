//! File-descriptor passing over local sockets.
//!
//! # Responsibilities
//! - Receive one message plus at most one ancillary descriptor in a
//!   single `recvmsg` call (`SCM_RIGHTS`)
//! - Send the mirror message (used by tests and in-process peers)
//! - Wrap every received descriptor in an `OwnedFd` immediately, so no
//!   error path can leak it
//!
//! # Design Decisions
//! - `MSG_CMSG_CLOEXEC` on receive: transferred descriptors never leak
//!   into child processes
//! - More than one descriptor in a message is a protocol error; the
//!   strays are closed before the error is returned
//! - The `HandleReceiver` trait is the platform seam: everything above
//!   it (decode, validate, dispatch) works against the trait

use std::io::{self, IoSlice, IoSliceMut};
use std::os::fd::{AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::os::unix::net::UnixStream;

use nix::sys::socket::{recvmsg, sendmsg, ControlMessage, ControlMessageOwned, MsgFlags, UnixAddr};

/// Capability for receiving one message plus an optional descriptor.
///
/// Implemented for connected Unix stream sockets; tests substitute fakes
/// that return synthetic handles.
pub trait HandleReceiver {
    /// Receive up to `buf.len()` bytes and at most one descriptor.
    fn recv_with_handle(&mut self, buf: &mut [u8]) -> io::Result<(usize, Option<OwnedFd>)>;
}

impl HandleReceiver for UnixStream {
    fn recv_with_handle(&mut self, buf: &mut [u8]) -> io::Result<(usize, Option<OwnedFd>)> {
        recv_with_fd(self, buf)
    }
}

/// Receive raw bytes plus an optional file descriptor from a Unix stream.
pub fn recv_with_fd(stream: &UnixStream, buf: &mut [u8]) -> io::Result<(usize, Option<OwnedFd>)> {
    let mut cmsg_buf = nix::cmsg_space!([RawFd; 1]);
    let mut iov = [IoSliceMut::new(buf)];

    let msg = recvmsg::<UnixAddr>(
        stream.as_raw_fd(),
        &mut iov,
        Some(&mut cmsg_buf),
        MsgFlags::MSG_CMSG_CLOEXEC,
    )
    .map_err(io::Error::from)?;
    let bytes = msg.bytes;

    let mut fds: Vec<OwnedFd> = Vec::new();
    for cmsg in msg.cmsgs().map_err(io::Error::from)? {
        if let ControlMessageOwned::ScmRights(received) = cmsg {
            for raw in received {
                // SAFETY: the kernel just handed us this descriptor; we are
                // its only owner.
                fds.push(unsafe { OwnedFd::from_raw_fd(raw) });
            }
        }
    }

    if fds.len() > 1 {
        // Dropping the vector closes every stray descriptor.
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "received more than one file descriptor in a single message",
        ));
    }

    Ok((bytes, fds.pop()))
}

/// Send raw bytes plus an optional file descriptor over a Unix stream.
///
/// The descriptor travels as ancillary data attached to the first byte of
/// `data`, so `data` must not be empty when a descriptor is present.
pub fn send_with_fd(
    stream: &UnixStream,
    data: &[u8],
    fd: Option<BorrowedFd<'_>>,
) -> io::Result<usize> {
    if fd.is_some() && data.is_empty() {
        return Err(io::Error::other(
            "cannot send a descriptor with an empty payload",
        ));
    }

    let iov = [IoSlice::new(data)];
    let raw_fds;
    let cmsgs: Vec<ControlMessage<'_>> = match &fd {
        Some(fd) => {
            raw_fds = [fd.as_raw_fd()];
            vec![ControlMessage::ScmRights(&raw_fds)]
        }
        None => Vec::new(),
    };

    sendmsg::<UnixAddr>(stream.as_raw_fd(), &iov, &cmsgs, MsgFlags::empty(), None)
        .map_err(io::Error::from)
}
