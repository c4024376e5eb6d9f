//! Configuration for the Libris server
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;
use std::time::Duration;

use crate::queue;

/// Main configuration for a Libris server instance
#[derive(Debug, Clone)]
pub struct ServerConfig {
    // -------------------------------------------------------------------------
    // Transport Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the session's named pipes
    /// Paths are derived as `{pipe_dir}/{token}_CS` and `{pipe_dir}/{token}_SC`
    pub pipe_dir: PathBuf,

    /// Receiver token shared with the client
    pub token: String,

    // -------------------------------------------------------------------------
    // Catalog Configuration
    // -------------------------------------------------------------------------
    /// Path to the flat-file catalog
    pub catalog_path: PathBuf,

    /// Optional end-of-run report snapshot path
    pub report_path: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Queue / Scheduling Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the deferred-request queue
    pub queue_capacity: usize,

    /// Dispatcher sleep between empty pipe polls
    pub poll_interval: Duration,

    /// Queue worker pause between processed items (rate limit)
    pub worker_pacing: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            pipe_dir: std::env::temp_dir(),
            token: "libris".to_string(),
            catalog_path: PathBuf::from("./catalog.txt"),
            report_path: None,
            queue_capacity: queue::DEFAULT_CAPACITY,
            poll_interval: Duration::from_millis(50),
            worker_pacing: Duration::from_millis(100),
        }
    }
}

impl ServerConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for ServerConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: ServerConfig,
}

impl ConfigBuilder {
    /// Set the directory holding the named pipes
    pub fn pipe_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.pipe_dir = dir.into();
        self
    }

    /// Set the receiver token shared with the client
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    /// Set the catalog file path
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog_path = path.into();
        self
    }

    /// Set the optional end-of-run report path
    pub fn report_path(mut self, path: Option<PathBuf>) -> Self {
        self.config.report_path = path;
        self
    }

    /// Set the deferred-request queue capacity
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Set the dispatcher poll interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the queue worker pacing delay
    pub fn worker_pacing(mut self, pacing: Duration) -> Self {
        self.config.worker_pacing = pacing;
        self
    }

    pub fn build(self) -> ServerConfig {
        self.config
    }
}
