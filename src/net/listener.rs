//! Local-socket listener with backpressure.
//!
//! # Responsibilities
//! - Bind to a configured filesystem path (unlinking a stale socket file)
//! - Accept incoming connections
//! - Enforce max_connections limit via semaphore
//! - Graceful handling of accept errors

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Semaphore;

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to the socket path.
    Bind(std::io::Error),
    /// Failed to accept a connection.
    Accept(std::io::Error),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
            ListenerError::Accept(e) => write!(f, "Failed to accept: {}", e),
        }
    }
}

impl std::error::Error for ListenerError {}

/// A bounded Unix-domain listener that limits concurrent connections.
///
/// Uses a semaphore to enforce `max_connections`. When the limit is
/// reached, new connections wait until a slot becomes available.
pub struct Listener {
    /// The underlying Unix-domain listener.
    inner: UnixListener,
    /// Semaphore to limit concurrent connections.
    connection_limit: Arc<Semaphore>,
    /// Filesystem path the socket is bound to.
    path: PathBuf,
}

impl Listener {
    /// Bind to the given socket path with a connection limit.
    ///
    /// The parent directory is created if missing and a stale socket file
    /// left behind by a previous run is removed before binding.
    pub fn bind(path: &Path, max_connections: usize) -> Result<Self, ListenerError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ListenerError::Bind)?;
            }
        }
        match std::fs::remove_file(path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ListenerError::Bind(e)),
        }

        let listener = UnixListener::bind(path).map_err(ListenerError::Bind)?;

        tracing::info!(
            path = %path.display(),
            max_connections,
            "Listener bound"
        );

        Ok(Self {
            inner: listener,
            connection_limit: Arc::new(Semaphore::new(max_connections)),
            path: path.to_path_buf(),
        })
    }

    /// Accept a new connection, respecting the connection limit.
    ///
    /// This waits if the connection limit has been reached. Returns the
    /// stream and a permit that must be held for the connection's lifetime.
    pub async fn accept(&self) -> Result<(UnixStream, ConnectionPermit), ListenerError> {
        // Acquire permit first (backpressure)
        let permit = self
            .connection_limit
            .clone()
            .acquire_owned()
            .await
            .expect("Semaphore closed unexpectedly");

        // Then accept the connection
        let (stream, _addr) = self.inner.accept().await.map_err(ListenerError::Accept)?;

        tracing::debug!(
            path = %self.path.display(),
            available_permits = self.connection_limit.available_permits(),
            "Connection accepted"
        );

        Ok((stream, ConnectionPermit { _permit: permit }))
    }

    /// Filesystem path this listener is bound to.
    pub fn local_path(&self) -> &Path {
        &self.path
    }

    /// Get current available connection slots.
    pub fn available_permits(&self) -> usize {
        self.connection_limit.available_permits()
    }
}

/// A permit representing a connection slot.
///
/// When dropped, the connection slot is released back to the listener.
/// This keeps backpressure intact even if the connection handler panics.
#[derive(Debug)]
pub struct ConnectionPermit {
    _permit: tokio::sync::OwnedSemaphorePermit,
}
