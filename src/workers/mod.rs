//! Worker pool lifecycle.
//!
//! # Responsibilities
//! - Start a fixed-size set of long-lived worker threads once, at daemon
//!   startup, after the listeners are bound
//! - Feed them from a multi-consumer task queue
//!
//! # Design Decisions
//! - Task semantics are opaque here: a task is any boxed closure
//! - No dynamic resizing; the pool lives for the process lifetime
//! - Workers exit when the queue closes (only happens when the pool is
//!   dropped, i.e. in tests)

use std::thread;

use crossbeam_channel::{unbounded, Receiver, Sender};

/// A unit of work consumed by the pool.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Fixed-size pool of long-lived task-processing workers.
pub struct TaskPool {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

impl TaskPool {
    /// Create a pool with an empty queue and no workers yet.
    pub fn new() -> Self {
        let (tx, rx) = unbounded();
        Self { tx, rx }
    }

    /// Spawn exactly `workers` worker threads against the queue.
    pub fn start(&self, workers: usize) -> std::io::Result<()> {
        for index in 0..workers {
            let rx = self.rx.clone();
            thread::Builder::new()
                .name(format!("worker-{index}"))
                .spawn(move || worker_loop(index, rx))?;
        }
        tracing::info!(workers, "worker pool started");
        Ok(())
    }

    /// Queue a task for the pool.
    pub fn submit(&self, task: impl FnOnce() + Send + 'static) {
        // Send only fails once every receiver is gone, which means the
        // pool itself is being torn down.
        let _ = self.tx.send(Box::new(task));
    }

    /// Number of tasks waiting in the queue.
    pub fn queued(&self) -> usize {
        self.rx.len()
    }
}

impl Default for TaskPool {
    fn default() -> Self {
        Self::new()
    }
}

fn worker_loop(index: usize, rx: Receiver<Task>) {
    tracing::debug!(worker = index, "worker started");
    while let Ok(task) = rx.recv() {
        task();
    }
    tracing::debug!(worker = index, "task queue closed; worker exiting");
}
