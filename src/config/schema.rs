//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! daemon. All types derive Serde traits for deserialization from config
//! files.

use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::path::PathBuf;

/// Suffix appended to the socket base path for the regular RPC socket.
pub const RPC_SOCKET_SUFFIX: &str = ".rpc";

/// Suffix appended to the socket base path for the socket that receives
/// forwarded connections (envelope plus descriptor).
pub const FORWARDED_SOCKET_SUFFIX: &str = ".forwarded";

/// Root configuration for the daemon.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DaemonConfig {
    /// Local socket configuration (base path, connection limits).
    pub sockets: SocketConfig,

    /// Worker pool settings.
    pub workers: WorkerConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Local socket configuration.
///
/// Both listening sockets live next to each other on the filesystem:
/// `<base_path>.rpc` for ordinary request/response calls and
/// `<base_path>.forwarded` for connections forwarded by the trusted peer.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SocketConfig {
    /// Base filesystem path for the daemon's listening sockets.
    pub base_path: PathBuf,

    /// Maximum concurrent connections per listener (backpressure).
    pub max_connections: usize,
}

impl SocketConfig {
    /// Path of the regular RPC socket.
    pub fn rpc_path(&self) -> PathBuf {
        self.with_suffix(RPC_SOCKET_SUFFIX)
    }

    /// Path of the forwarded-connection socket.
    pub fn forwarded_path(&self) -> PathBuf {
        self.with_suffix(FORWARDED_SOCKET_SUFFIX)
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        let mut path = OsString::from(self.base_path.as_os_str());
        path.push(suffix);
        PathBuf::from(path)
    }
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("/var/run/migratord/server"),
            max_connections: 1024,
        }
    }
}

/// Worker pool settings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Number of long-lived task-processing workers.
    pub pool_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self { pool_size: 4 }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), overridable via
    /// `RUST_LOG`.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
