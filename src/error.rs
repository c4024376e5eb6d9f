//! Error types for Libris
//!
//! Provides a unified error type for all operations.
//!
//! A missing isbn or a group with no copy in the required state is *not* an
//! error: those are ordinary outcomes surfaced through
//! [`crate::catalog::Applied`] and answered with a normal reply.

use thiserror::Error;

/// Result type alias using LibrisError
pub type Result<T> = std::result::Result<T, LibrisError>;

/// Unified error type for Libris operations
#[derive(Debug, Error)]
pub enum LibrisError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Setup Errors (fatal before serving begins)
    // -------------------------------------------------------------------------
    #[error("Setup error: {0}")]
    Setup(String),

    // -------------------------------------------------------------------------
    // Channel Errors (fatal to the owning process; no retry, no reconnect)
    // -------------------------------------------------------------------------
    #[error("Channel error: {0}")]
    Channel(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("Catalog error: {0}")]
    Catalog(String),
}
