//! Codec Tests
//!
//! These tests verify:
//! - Request record encoding/decoding (fixed 61-byte layout)
//! - NUL padding of the title/isbn slots
//! - Field length and op-byte validation
//! - Reply encoding/decoding (NUL-terminated text)
//! - Stream helpers

use std::io::Cursor;

use libris::protocol::{
    decode_reply, decode_request, encode_reply, encode_request, read_reply, read_request,
    write_reply, write_request, OpKind, Request, FIELD_SIZE, MAX_FIELD_LEN, MAX_REPLY_SIZE,
    REQUEST_SIZE,
};

// =============================================================================
// Request Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_encode_decode_borrow() {
    let request = Request::new(OpKind::Borrow, "The Trial", "978-0805209990").unwrap();
    let encoded = encode_request(&request);
    let decoded = decode_request(&encoded).unwrap();

    assert_eq!(decoded.op, OpKind::Borrow);
    assert_eq!(decoded.title, "The Trial");
    assert_eq!(decoded.isbn, "978-0805209990");
}

#[test]
fn test_encode_decode_all_ops() {
    for (op, byte) in [
        (OpKind::Return, b'D'),
        (OpKind::Renew, b'R'),
        (OpKind::Borrow, b'P'),
        (OpKind::Quit, b'Q'),
    ] {
        let request = Request::new(op, "Title", "111").unwrap();
        let encoded = encode_request(&request);

        assert_eq!(encoded[0], byte);
        assert_eq!(decode_request(&encoded).unwrap().op, op);
    }
}

#[test]
fn test_record_is_exactly_61_bytes() {
    assert_eq!(REQUEST_SIZE, 61);
    assert_eq!(FIELD_SIZE, 30);

    let request = Request::new(OpKind::Borrow, "A", "1").unwrap();
    assert_eq!(encode_request(&request).len(), 61);
}

#[test]
fn test_fields_are_nul_padded() {
    let request = Request::new(OpKind::Return, "abc", "12").unwrap();
    let encoded = encode_request(&request);

    // Title slot: bytes then NULs
    assert_eq!(&encoded[1..4], b"abc");
    assert!(encoded[4..1 + FIELD_SIZE].iter().all(|&b| b == 0));

    // Isbn slot likewise
    assert_eq!(&encoded[31..33], b"12");
    assert!(encoded[33..61].iter().all(|&b| b == 0));
}

#[test]
fn test_max_length_fields_round_trip() {
    let title = "t".repeat(MAX_FIELD_LEN);
    let isbn = "9".repeat(MAX_FIELD_LEN);
    let request = Request::new(OpKind::Renew, title.clone(), isbn.clone()).unwrap();

    let decoded = decode_request(&encode_request(&request)).unwrap();
    assert_eq!(decoded.title, title);
    assert_eq!(decoded.isbn, isbn);
}

#[test]
fn test_oversized_title_rejected() {
    let result = Request::new(OpKind::Borrow, "t".repeat(MAX_FIELD_LEN + 1), "1");
    assert!(result.is_err());
}

#[test]
fn test_oversized_isbn_rejected() {
    let result = Request::new(OpKind::Borrow, "t", "9".repeat(MAX_FIELD_LEN + 1));
    assert!(result.is_err());
}

#[test]
fn test_unknown_op_byte_rejected() {
    let request = Request::new(OpKind::Borrow, "Title", "111").unwrap();
    let mut encoded = encode_request(&request);
    encoded[0] = b'X';

    assert!(decode_request(&encoded).is_err());
}

#[test]
fn test_truncated_record_rejected() {
    let request = Request::new(OpKind::Borrow, "Title", "111").unwrap();
    let encoded = encode_request(&request);

    assert!(decode_request(&encoded[..REQUEST_SIZE - 1]).is_err());
}

#[test]
fn test_quit_placeholder_fields() {
    let decoded = decode_request(&encode_request(&Request::quit())).unwrap();

    assert_eq!(decoded.op, OpKind::Quit);
    assert_eq!(decoded.title, "-");
    assert_eq!(decoded.isbn, "-");
}

// =============================================================================
// Reply Encoding/Decoding Tests
// =============================================================================

#[test]
fn test_reply_is_nul_terminated() {
    let bytes = encode_reply("hello").unwrap();

    assert_eq!(bytes, b"hello\0");
    assert_eq!(decode_reply(&bytes), "hello");
}

#[test]
fn test_reply_decode_ignores_trailing_garbage() {
    let mut bytes = encode_reply("short").unwrap();
    bytes.extend_from_slice(b"leftover");

    assert_eq!(decode_reply(&bytes), "short");
}

#[test]
fn test_reply_at_size_limit() {
    let text = "x".repeat(MAX_REPLY_SIZE - 1);
    let bytes = encode_reply(&text).unwrap();

    assert_eq!(bytes.len(), MAX_REPLY_SIZE);
    assert_eq!(decode_reply(&bytes), text);
}

#[test]
fn test_reply_over_size_limit_rejected() {
    let text = "x".repeat(MAX_REPLY_SIZE);
    assert!(encode_reply(&text).is_err());
}

#[test]
fn test_reply_with_embedded_nul_rejected() {
    assert!(encode_reply("a\0b").is_err());
}

// =============================================================================
// Stream Helper Tests
// =============================================================================

#[test]
fn test_write_read_request_stream() {
    let request = Request::new(OpKind::Return, "Momo", "978-0140317534").unwrap();

    let mut buf = Vec::new();
    write_request(&mut buf, &request).unwrap();
    assert_eq!(buf.len(), REQUEST_SIZE);

    let decoded = read_request(&mut Cursor::new(buf)).unwrap();
    assert_eq!(decoded, request);
}

#[test]
fn test_write_read_reply_stream() {
    let mut buf = Vec::new();
    write_reply(&mut buf, "The book Momo is not available").unwrap();

    let text = read_reply(&mut Cursor::new(buf)).unwrap();
    assert_eq!(text, "The book Momo is not available");
}

#[test]
fn test_read_reply_empty_stream_is_error() {
    let mut empty = Cursor::new(Vec::new());
    assert!(read_reply(&mut empty).is_err());
}
