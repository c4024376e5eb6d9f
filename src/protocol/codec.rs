//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format (client → server, fixed 61 bytes)
//! ```text
//! ┌──────────┬──────────────────────┬──────────────────────┐
//! │ Op (1)   │ Title (30, NUL-pad)  │ Isbn (30, NUL-pad)   │
//! └──────────┴──────────────────────┴──────────────────────┘
//! ```
//! `Op ∈ {'D', 'R', 'P', 'Q'}` for Return/Renew/Borrow/Quit.
//!
//! ### Reply Format (server → client)
//! Variable-length NUL-terminated text, at most 256 bytes including the
//! terminator.

use std::io::{Read, Write};

use crate::error::{LibrisError, Result};
use super::{OpKind, Request, MAX_FIELD_LEN};

/// Size of one NUL-padded string field on the wire
pub const FIELD_SIZE: usize = 30;

/// Total size of a request record: op byte + title + isbn
pub const REQUEST_SIZE: usize = 1 + 2 * FIELD_SIZE;

/// Maximum reply size, NUL terminator included
pub const MAX_REPLY_SIZE: usize = 256;

// =============================================================================
// Request Encoding/Decoding
// =============================================================================

/// Encode a request into its fixed 61-byte record
pub fn encode_request(request: &Request) -> [u8; REQUEST_SIZE] {
    let mut record = [0u8; REQUEST_SIZE];
    record[0] = request.op.wire_byte();

    // Fields validated ≤ MAX_FIELD_LEN at construction; the slot's trailing
    // bytes stay NUL
    let title = request.title.as_bytes();
    record[1..1 + title.len()].copy_from_slice(title);

    let isbn = request.isbn.as_bytes();
    record[1 + FIELD_SIZE..1 + FIELD_SIZE + isbn.len()].copy_from_slice(isbn);

    record
}

/// Decode a request from a 61-byte record
pub fn decode_request(bytes: &[u8]) -> Result<Request> {
    if bytes.len() < REQUEST_SIZE {
        return Err(LibrisError::Protocol(format!(
            "incomplete request record: expected {} bytes, got {}",
            REQUEST_SIZE,
            bytes.len()
        )));
    }

    let op = OpKind::from_wire(bytes[0]).ok_or_else(|| {
        LibrisError::Protocol(format!("unknown operation byte: 0x{:02x}", bytes[0]))
    })?;

    let title = decode_field(&bytes[1..1 + FIELD_SIZE], "title")?;
    let isbn = decode_field(&bytes[1 + FIELD_SIZE..1 + 2 * FIELD_SIZE], "isbn")?;

    Request::new(op, title, isbn)
}

/// Decode one NUL-padded string field
fn decode_field(slot: &[u8], name: &str) -> Result<String> {
    let end = slot
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(MAX_FIELD_LEN.min(slot.len()));

    std::str::from_utf8(&slot[..end])
        .map(str::to_string)
        .map_err(|_| LibrisError::Protocol(format!("{name} field is not valid UTF-8")))
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply as NUL-terminated text
pub fn encode_reply(text: &str) -> Result<Vec<u8>> {
    if text.len() + 1 > MAX_REPLY_SIZE {
        return Err(LibrisError::Protocol(format!(
            "reply too long: {} bytes (max {} including terminator)",
            text.len(),
            MAX_REPLY_SIZE
        )));
    }
    if text.as_bytes().contains(&0) {
        return Err(LibrisError::Protocol(
            "reply text contains an embedded NUL".to_string(),
        ));
    }

    let mut bytes = Vec::with_capacity(text.len() + 1);
    bytes.extend_from_slice(text.as_bytes());
    bytes.push(0);
    Ok(bytes)
}

/// Decode a reply buffer up to its NUL terminator
pub fn decode_reply(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read a complete request record from a stream
///
/// Blocks until the full record is received or an error occurs
pub fn read_request<R: Read>(reader: &mut R) -> Result<Request> {
    let mut record = [0u8; REQUEST_SIZE];
    reader.read_exact(&mut record)?;
    decode_request(&record)
}

/// Write a request record to a stream
pub fn write_request<W: Write>(writer: &mut W, request: &Request) -> Result<()> {
    let record = encode_request(request);
    writer.write_all(&record)?;
    writer.flush()?;
    Ok(())
}

/// Read one reply from a stream
///
/// Reads a single chunk of at most [`MAX_REPLY_SIZE`] bytes and returns the
/// text up to its NUL terminator. Returns a channel error on end-of-stream.
pub fn read_reply<R: Read>(reader: &mut R) -> Result<String> {
    let mut buf = [0u8; MAX_REPLY_SIZE];
    let n = reader.read(&mut buf)?;
    if n == 0 {
        return Err(LibrisError::Channel(
            "reply stream closed by peer".to_string(),
        ));
    }
    Ok(decode_reply(&buf[..n]))
}

/// Write one NUL-terminated reply to a stream
pub fn write_reply<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let bytes = encode_reply(text)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
