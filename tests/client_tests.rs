//! Tests for the client session helpers
//!
//! These tests verify the replay-file line parser.

use libris::client::parse_script_line;
use libris::protocol::OpKind;

// =============================================================================
// Script Line Parsing Tests
// =============================================================================

#[test]
fn test_parse_each_operation() {
    for (text, op) in [
        ("D, Alpha, 111", OpKind::Return),
        ("R, Alpha, 111", OpKind::Renew),
        ("P, Alpha, 111", OpKind::Borrow),
        ("Q, -, -", OpKind::Quit),
    ] {
        let request = parse_script_line(text).unwrap();
        assert_eq!(request.op, op);
    }
}

#[test]
fn test_parse_trims_whitespace() {
    let request = parse_script_line("  P ,  The Trial ,  978-0805209990  ").unwrap();

    assert_eq!(request.op, OpKind::Borrow);
    assert_eq!(request.title, "The Trial");
    assert_eq!(request.isbn, "978-0805209990");
}

#[test]
fn test_parse_blank_line_is_skipped() {
    assert!(parse_script_line("").is_none());
    assert!(parse_script_line("   ").is_none());
}

#[test]
fn test_parse_unknown_operation_is_skipped() {
    assert!(parse_script_line("X, Alpha, 111").is_none());
}

#[test]
fn test_parse_missing_fields_is_skipped() {
    assert!(parse_script_line("P, Alpha").is_none());
    assert!(parse_script_line("P").is_none());
}

#[test]
fn test_parse_multichar_op_is_skipped() {
    assert!(parse_script_line("PQ, Alpha, 111").is_none());
}

#[test]
fn test_parse_overlong_field_is_skipped() {
    let line = format!("P, {}, 111", "t".repeat(40));
    assert!(parse_script_line(&line).is_none());
}
