//! Shared utilities for integration testing.

use std::collections::HashMap;
use std::io::{self, Read};
use std::os::fd::BorrowedFd;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use migratord::handoff::descriptor::write_all_fd;
use migratord::migration::{HandoffContext, MemoryLocator, MemoryReceiver};
use migratord::net::fdpass::send_with_fd;
use migratord::DaemonConfig;

static NEXT_SOCKET: AtomicU32 = AtomicU32::new(0);

/// A socket base path unique to this test within this process.
pub fn temp_socket_base(tag: &str) -> PathBuf {
    let n = NEXT_SOCKET.fetch_add(1, Ordering::Relaxed);
    std::env::temp_dir().join(format!("migratord-{}-{}-{}", std::process::id(), tag, n))
}

/// A config pointing at temp sockets, small enough for tests.
#[allow(dead_code)]
pub fn test_config(tag: &str) -> DaemonConfig {
    let mut config = DaemonConfig::default();
    config.sockets.base_path = temp_socket_base(tag);
    config.sockets.max_connections = 16;
    config.workers.pool_size = 2;
    config
}

/// Act as the forwarding peer: connect to the forwarded socket and send
/// one envelope, optionally with a descriptor attached.
#[allow(dead_code)]
pub fn forward_request(
    socket: &Path,
    envelope: &[u8],
    fd: Option<BorrowedFd<'_>>,
) -> io::Result<UnixStream> {
    let stream = UnixStream::connect(socket)?;
    send_with_fd(&stream, envelope, fd)?;
    Ok(stream)
}

/// Read a stream to EOF, panicking on I/O errors.
#[allow(dead_code)]
pub fn read_until_eof(stream: &mut UnixStream) -> Vec<u8> {
    let mut buf = Vec::new();
    stream.read_to_end(&mut buf).unwrap();
    buf
}

/// Memory receiver that records every handoff it is given.
///
/// On success it writes `reply` through the transferred descriptor (to
/// prove ownership arrived) and then drops the context, closing it. With
/// `fail` set it returns an error before touching the descriptor.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingReceiver {
    pub calls: Mutex<Vec<(MemoryLocator, HashMap<String, String>)>>,
    pub reply: Vec<u8>,
    pub fail: bool,
}

impl MemoryReceiver for RecordingReceiver {
    fn receive(&self, locator: &MemoryLocator, ctx: HandoffContext) -> io::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((locator.clone(), ctx.cookie.clone()));

        if self.fail {
            return Err(io::Error::other("transfer engine exploded"));
        }

        if let Some(fd) = &ctx.transferred_fd {
            use std::os::fd::AsFd;
            write_all_fd(fd.as_fd(), &self.reply)?;
        }
        Ok(())
    }
}
