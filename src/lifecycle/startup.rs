//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind both listening sockets (the daemon is "up" once this is done)
//! - Start the worker pool with the configured size
//! - Spawn one accept loop per listener; each accepted connection is
//!   handled on its own blocking execution context
//! - Park the main task until a terminating signal arrives
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - An accept failure ends that listener only; the sibling listener and
//!   the worker pool keep running

use std::io;
use std::sync::Arc;

use tokio::sync::broadcast;

use crate::config::DaemonConfig;
use crate::handoff;
use crate::lifecycle::shutdown::Shutdown;
use crate::lifecycle::signals;
use crate::migration::MemoryReceiver;
use crate::net::listener::{Listener, ListenerError};
use crate::rpc::RpcDispatcher;
use crate::workers::TaskPool;

/// Error type for daemon startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("listener setup failed: {0}")]
    Listener(#[from] ListenerError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// The daemon core: configuration plus its two external collaborators.
pub struct Daemon {
    config: DaemonConfig,
    receiver: Arc<dyn MemoryReceiver>,
    dispatcher: Arc<dyn RpcDispatcher>,
}

/// Keeps the daemon's process-lifetime services alive.
///
/// Dropping the handle tears the worker pool's queue down; the real
/// daemon holds it until process exit, tests hold it for a scenario.
pub struct DaemonHandle {
    pool: TaskPool,
}

impl DaemonHandle {
    /// The running worker pool.
    pub fn pool(&self) -> &TaskPool {
        &self.pool
    }
}

impl Daemon {
    /// Assemble a daemon from its configuration and collaborators.
    pub fn new(
        config: DaemonConfig,
        receiver: Arc<dyn MemoryReceiver>,
        dispatcher: Arc<dyn RpcDispatcher>,
    ) -> Self {
        Self {
            config,
            receiver,
            dispatcher,
        }
    }

    /// Bind the sockets, start the worker pool, and spawn the accept
    /// loops. Returns once the daemon is up; connection handling happens
    /// on spawned contexts.
    pub async fn start(&self, shutdown: &Shutdown) -> Result<DaemonHandle, StartupError> {
        let sockets = &self.config.sockets;
        let forwarded = Listener::bind(&sockets.forwarded_path(), sockets.max_connections)?;
        let rpc = Listener::bind(&sockets.rpc_path(), sockets.max_connections)?;
        // Both sockets are bound: the daemon is up from here on.

        let pool = TaskPool::new();
        pool.start(self.config.workers.pool_size)?;

        let receiver = Arc::clone(&self.receiver);
        tokio::spawn(run_accept_loop(
            "forwarded",
            forwarded,
            shutdown.subscribe(),
            move |stream| handoff::receiver::handle_connection(stream, receiver.as_ref()),
        ));

        let dispatcher = Arc::clone(&self.dispatcher);
        tokio::spawn(run_accept_loop(
            "rpc",
            rpc,
            shutdown.subscribe(),
            move |stream| dispatcher.dispatch(stream),
        ));

        Ok(DaemonHandle { pool })
    }

    /// Run the daemon until a terminating signal arrives, then exit the
    /// process. In-flight connections are abandoned; no drain.
    pub async fn serve(self) -> Result<(), StartupError> {
        signals::ignore_sigpipe()?;

        let shutdown = Shutdown::new();
        let _handle = self.start(&shutdown).await?;

        signals::wait_for_termination().await?;
        tracing::info!("exiting");
        std::process::exit(0);
    }
}

/// Accept connections forever, dispatching each to `handle` on its own
/// blocking context. An accept error is fatal for this loop only.
async fn run_accept_loop<F>(
    name: &'static str,
    listener: Listener,
    mut shutdown: broadcast::Receiver<()>,
    handle: F,
) where
    F: Fn(std::os::unix::net::UnixStream) + Clone + Send + Sync + 'static,
{
    loop {
        tokio::select! {
            _ = shutdown.recv() => {
                tracing::debug!(listener = name, "listener stopping");
                break;
            }
            accepted = listener.accept() => match accepted {
                Ok((stream, permit)) => {
                    let handle = handle.clone();
                    tokio::task::spawn_blocking(move || {
                        let _permit = permit;
                        match into_blocking(stream) {
                            Ok(stream) => handle(stream),
                            Err(e) => tracing::error!(
                                listener = name,
                                error = %e,
                                "failed to prepare accepted connection"
                            ),
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(
                        listener = name,
                        error = %e,
                        "accept failed; listener stopping"
                    );
                    break;
                }
            }
        }
    }
}

/// Convert an accepted stream to a blocking one for its handler thread.
fn into_blocking(stream: tokio::net::UnixStream) -> io::Result<std::os::unix::net::UnixStream> {
    let stream = stream.into_std()?;
    stream.set_nonblocking(false)?;
    Ok(stream)
}
