//! Request definitions
//!
//! Represents lending requests from clients.

use crate::error::{LibrisError, Result};

/// Maximum byte length of a title or isbn field (one byte is reserved for
/// the NUL terminator in the 30-byte wire slot)
pub const MAX_FIELD_LEN: usize = 29;

/// Operation kinds, with their wire bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpKind {
    /// Return a borrowed copy
    Return = b'D',

    /// Renew the due date of a borrowed copy
    Renew = b'R',

    /// Borrow an available copy
    Borrow = b'P',

    /// End the session (receives no reply)
    Quit = b'Q',
}

impl OpKind {
    /// Get the wire byte for this operation
    pub fn wire_byte(self) -> u8 {
        self as u8
    }

    /// Parse an operation from its wire byte
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            b'D' => Some(OpKind::Return),
            b'R' => Some(OpKind::Renew),
            b'P' => Some(OpKind::Borrow),
            b'Q' => Some(OpKind::Quit),
            _ => None,
        }
    }

    /// Whether the operation is acknowledged immediately and applied later
    /// by the queue worker (Return/Renew), as opposed to handled inline
    pub fn is_deferred(self) -> bool {
        matches!(self, OpKind::Return | OpKind::Renew)
    }
}

/// A parsed lending request
///
/// Immutable once built; moved by value into queue slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Operation kind
    pub op: OpKind,

    /// Book title (≤ 29 bytes)
    pub title: String,

    /// Book isbn (≤ 29 bytes)
    pub isbn: String,
}

impl Request {
    /// Build a request, validating field lengths
    pub fn new(op: OpKind, title: impl Into<String>, isbn: impl Into<String>) -> Result<Self> {
        let title = title.into();
        let isbn = isbn.into();

        if title.len() > MAX_FIELD_LEN {
            return Err(LibrisError::Protocol(format!(
                "title too long: {} bytes (max {})",
                title.len(),
                MAX_FIELD_LEN
            )));
        }
        if isbn.len() > MAX_FIELD_LEN {
            return Err(LibrisError::Protocol(format!(
                "isbn too long: {} bytes (max {})",
                isbn.len(),
                MAX_FIELD_LEN
            )));
        }

        Ok(Self { op, title, isbn })
    }

    /// Build the Quit request (fields carry placeholder dashes on the wire)
    pub fn quit() -> Self {
        Self {
            op: OpKind::Quit,
            title: "-".to_string(),
            isbn: "-".to_string(),
        }
    }
}
