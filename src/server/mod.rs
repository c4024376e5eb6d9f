//! Server orchestration
//!
//! Wires the channel, queue, catalog and the three workers together.
//!
//! ## Workers
//! - `dispatcher`: reads the pipe, replies immediately or enqueues
//! - `worker`: drains the queue, applies deferred mutations
//! - `console`: local operator commands (`stop`, `report`)
//!
//! ## Lifecycle
//!
//! ```text
//! Running ──(operator "stop" | inbound Quit)──► Draining ──► Stopped
//! ```
//!
//! Draining: the dispatcher exits its loop and drops the queue producer;
//! the worker finishes every queued item before observing the disconnect.
//! Stopped: all workers are joined, the pipe endpoints are closed and
//! unlinked, and the optional report snapshot is written.

mod console;
mod dispatcher;
mod worker;

pub use console::OperatorConsole;
pub use dispatcher::Dispatcher;
pub use worker::QueueWorker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crate::catalog::CatalogStore;
use crate::channel::ServerChannel;
use crate::config::ServerConfig;
use crate::error::{LibrisError, Result};
use crate::queue::bounded_queue;

/// The lending server
pub struct Server {
    config: ServerConfig,
    catalog: Arc<CatalogStore>,
    shutdown: Arc<AtomicBool>,
}

impl Server {
    /// Set up a server: open and validate the catalog
    ///
    /// Channel endpoints are bound in [`run`](Self::run) because the write
    /// end cannot open before a client connects.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let catalog = Arc::new(CatalogStore::open(&config.catalog_path)?);

        Ok(Self {
            config,
            catalog,
            shutdown: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Serve until shutdown (blocking)
    ///
    /// Binds the channel, spawns the queue worker and operator console,
    /// runs the dispatcher on the calling thread, then joins everything.
    pub fn run(&mut self) -> Result<()> {
        let mut channel = ServerChannel::bind(&self.config.pipe_dir, &self.config.token)?;
        let (producer, consumer) = bounded_queue(self.config.queue_capacity);

        tracing::info!(
            "serving token {} over catalog {}",
            self.config.token,
            self.config.catalog_path.display()
        );

        let worker = QueueWorker::new(Arc::clone(&self.catalog), self.config.worker_pacing);
        let worker_handle = thread::Builder::new()
            .name("queue-worker".to_string())
            .spawn(move || worker.run(consumer))?;

        let console = OperatorConsole::new(Arc::clone(&self.catalog), Arc::clone(&self.shutdown));
        let console_handle = thread::Builder::new()
            .name("operator-console".to_string())
            .spawn(move || console.run())?;

        // The dispatcher owns the producer; returning from `run` drops it,
        // which is what lets the worker drain and stop
        let dispatcher = Dispatcher::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.shutdown),
            self.config.poll_interval,
        );
        let dispatch_result = dispatcher.run(&mut channel, producer);

        // A channel failure leaves the flag down; raise it so the console
        // still exits and the joins below cannot hang
        self.shutdown.store(true, Ordering::SeqCst);

        worker_handle
            .join()
            .map_err(|_| LibrisError::Channel("queue worker panicked".to_string()))?;
        console_handle
            .join()
            .map_err(|_| LibrisError::Channel("operator console panicked".to_string()))?;

        if let Some(report_path) = &self.config.report_path {
            self.catalog.write_report(report_path)?;
            tracing::info!("report snapshot written to {}", report_path.display());
        }

        // Dropping the channel unlinks both FIFO paths
        drop(channel);

        dispatch_result
    }

    /// Shared catalog handle (for tests and the console)
    pub fn catalog(&self) -> &Arc<CatalogStore> {
        &self.catalog
    }
}
