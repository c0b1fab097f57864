//! Per-connection handling for the forwarded socket.
//!
//! # Responsibilities
//! - One receive per connection: at most 16 KiB of envelope bytes plus at
//!   most one ancillary descriptor
//! - Decode the envelope, then hand the connection to the gatekeeper
//! - Contain every error within the connection: the accept loop never
//!   sees a failure, and the descriptor is closed before an error is
//!   logged

use std::os::unix::net::UnixStream;

use crate::handoff::descriptor::TransferredFd;
use crate::handoff::envelope::{ForwardedRequest, MAX_ENVELOPE_BYTES};
use crate::handoff::gatekeeper;
use crate::migration::MemoryReceiver;
use crate::net::connection::ConnectionId;
use crate::net::fdpass::HandleReceiver;

/// Failure while receiving or decoding a forwarded request.
#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("failed to receive forwarded message: {0}")]
    Receive(#[source] std::io::Error),

    #[error("malformed request envelope: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Perform the single receive for a forwarded connection and decode the
/// envelope.
///
/// On a decode failure the received descriptor has already been dropped
/// (and therefore closed) by the time the error returns.
pub fn receive_envelope(
    rx: &mut dyn HandleReceiver,
) -> Result<(ForwardedRequest, Option<TransferredFd>), HandoffError> {
    let mut buf = vec![0u8; MAX_ENVELOPE_BYTES];
    let (n, fd) = rx.recv_with_handle(&mut buf).map_err(HandoffError::Receive)?;
    let transferred = fd.map(TransferredFd::new);

    match ForwardedRequest::decode(&buf[..n]) {
        Ok(envelope) => Ok((envelope, transferred)),
        Err(e) => {
            // `transferred` goes out of scope here, closing the descriptor
            // before the caller can observe the error.
            drop(transferred);
            Err(HandoffError::Decode(e))
        }
    }
}

/// Handle one connection accepted on the forwarded socket.
///
/// Runs on its own blocking execution context. The connection socket is
/// closed when this returns, whichever path was taken.
pub fn handle_connection(mut stream: UnixStream, receiver: &dyn MemoryReceiver) {
    let id = ConnectionId::next();

    match receive_envelope(&mut stream) {
        Ok((envelope, transferred)) => {
            gatekeeper::route(id, envelope, transferred, stream, receiver);
        }
        Err(e) => {
            tracing::error!(connection = %id, error = %e, "abandoning forwarded connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use std::os::fd::OwnedFd;

    /// Fake receive capability returning canned bytes and a synthetic
    /// handle.
    struct FakeReceiver {
        payload: Vec<u8>,
        fd: Option<OwnedFd>,
    }

    impl HandleReceiver for FakeReceiver {
        fn recv_with_handle(
            &mut self,
            buf: &mut [u8],
        ) -> std::io::Result<(usize, Option<OwnedFd>)> {
            let n = self.payload.len().min(buf.len());
            buf[..n].copy_from_slice(&self.payload[..n]);
            Ok((n, self.fd.take()))
        }
    }

    fn synthetic_handle() -> (OwnedFd, UnixStream) {
        let (ours, theirs) = UnixStream::pair().unwrap();
        (OwnedFd::from(ours), theirs)
    }

    #[test]
    fn valid_envelope_keeps_the_descriptor_open() {
        let (fd, mut peer) = synthetic_handle();
        let mut rx = FakeReceiver {
            payload: br#"{"uri": "/services/xenops/memory/vm1", "cookie": {}}"#.to_vec(),
            fd: Some(fd),
        };

        let (envelope, transferred) = receive_envelope(&mut rx).unwrap();
        assert_eq!(envelope.path, "/services/xenops/memory/vm1");
        let transferred = transferred.expect("descriptor survives a good decode");

        transferred.write_all(b"alive").unwrap();
        transferred.close();
        let mut buf = Vec::new();
        peer.read_to_end(&mut buf).unwrap();
        assert_eq!(buf, b"alive");
    }

    #[test]
    fn decode_failure_closes_the_descriptor() {
        let (fd, mut peer) = synthetic_handle();
        let mut rx = FakeReceiver {
            payload: b"definitely not json".to_vec(),
            fd: Some(fd),
        };

        let err = receive_envelope(&mut rx).unwrap_err();
        assert!(matches!(err, HandoffError::Decode(_)));

        // EOF without any bytes: the descriptor was closed and nothing was
        // written to it.
        let mut buf = Vec::new();
        peer.read_to_end(&mut buf).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn oversized_envelope_surfaces_as_decode_error() {
        // A payload larger than the receive buffer arrives truncated, so
        // the JSON no longer parses.
        let mut big = format!(r#"{{"uri": "/services/xenops/memory/vm1", "pad": "{}"#,
            "x".repeat(MAX_ENVELOPE_BYTES));
        big.push_str(r#"", "cookie": {}}"#);
        let mut rx = FakeReceiver {
            payload: big.into_bytes(),
            fd: None,
        };

        let err = receive_envelope(&mut rx).unwrap_err();
        assert!(matches!(err, HandoffError::Decode(_)));
    }

    #[test]
    fn envelope_without_descriptor_is_accepted() {
        let mut rx = FakeReceiver {
            payload: br#"{"uri": "/other", "cookie": {}}"#.to_vec(),
            fd: None,
        };
        let (envelope, transferred) = receive_envelope(&mut rx).unwrap();
        assert_eq!(envelope.path, "/other");
        assert!(transferred.is_none());
    }
}
