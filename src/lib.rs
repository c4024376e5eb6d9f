//! # Libris
//!
//! A two-process library-lending service:
//! - Fixed-record binary requests over a pair of named pipes
//! - Bounded producer-consumer queue for deferred catalog updates
//! - Flat-file catalog with atomic search-then-rewrite mutation
//! - Cooperative shutdown draining the queue before exit
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Client                               │
//! │              (menu / scripted replay file)                   │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  named pipes (<tmp>/<token>_CS / _SC)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Dispatcher                              │
//! │     (immediate replies; defers Return/Renew into queue)      │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            │ Borrow (inline)              │ Return/Renew
//!            ▼                              ▼
//!     ┌─────────────┐              ┌─────────────────┐
//!     │   Catalog   │◄─────────────│  Bounded Queue  │
//!     │ (flat file) │  QueueWorker │  (capacity 10)  │
//!     └─────────────┘              └─────────────────┘
//!            ▲
//!            │ report / stop
//!     ┌──────┴──────────┐
//!     │ OperatorConsole │
//!     └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod channel;
pub mod queue;
pub mod catalog;
pub mod server;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LibrisError, Result};
pub use config::ServerConfig;
pub use server::Server;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of Libris
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
