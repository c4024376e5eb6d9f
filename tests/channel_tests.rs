//! Tests for the named-pipe channel
//!
//! These tests verify:
//! - Path derivation from the receiver token
//! - Server/client rendezvous over real FIFOs
//! - Request/reply round-trips
//! - Non-blocking receive returning nothing when idle

use std::thread;
use std::time::Duration;

use libris::channel::{pipe_paths, ClientChannel, ServerChannel};
use libris::protocol::{OpKind, Request};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Poll the server endpoint until a request shows up
fn receive_blocking(channel: &mut ServerChannel) -> Request {
    for _ in 0..1000 {
        if let Some(request) = channel.try_receive().unwrap() {
            return request;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("no request arrived");
}

// =============================================================================
// Path Derivation Tests
// =============================================================================

#[test]
fn test_pipe_paths_derive_from_token() {
    let (cs, sc) = pipe_paths("/tmp".as_ref(), "session42");

    assert_eq!(cs.to_str().unwrap(), "/tmp/session42_CS");
    assert_eq!(sc.to_str().unwrap(), "/tmp/session42_SC");
}

// =============================================================================
// Round-trip Tests
// =============================================================================

#[test]
fn test_request_reply_round_trip() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();

    let client_dir = dir.clone();
    let client = thread::spawn(move || {
        let mut channel = ClientChannel::connect(&client_dir, "rt").unwrap();
        let request = Request::new(OpKind::Borrow, "Alpha", "111").unwrap();
        channel.send(&request).unwrap();
        channel.receive_reply().unwrap()
    });

    let mut server = ServerChannel::bind(&dir, "rt").unwrap();
    let request = receive_blocking(&mut server);
    assert_eq!(request.op, OpKind::Borrow);
    assert_eq!(request.title, "Alpha");
    assert_eq!(request.isbn, "111");

    server.send_reply("The book Alpha is available").unwrap();
    assert_eq!(client.join().unwrap(), "The book Alpha is available");
}

#[test]
fn test_multiple_requests_arrive_in_order() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();

    let client_dir = dir.clone();
    let client = thread::spawn(move || {
        let mut channel = ClientChannel::connect(&client_dir, "seq").unwrap();
        for i in 0..5 {
            let request = Request::new(OpKind::Return, format!("b{i}"), "1").unwrap();
            channel.send(&request).unwrap();
        }
        // Keep the write end open until the server has read everything
        thread::sleep(Duration::from_millis(300));
    });

    let mut server = ServerChannel::bind(&dir, "seq").unwrap();
    for i in 0..5 {
        let request = receive_blocking(&mut server);
        assert_eq!(request.title, format!("b{i}"));
    }
    client.join().unwrap();
}

#[test]
fn test_try_receive_idle_returns_none() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();

    let client_dir = dir.clone();
    let client = thread::spawn(move || {
        let channel = ClientChannel::connect(&client_dir, "idle").unwrap();
        thread::sleep(Duration::from_millis(200));
        drop(channel);
    });

    let mut server = ServerChannel::bind(&dir, "idle").unwrap();
    // Connected but silent
    assert!(server.try_receive().unwrap().is_none());
    client.join().unwrap();
}

#[test]
fn test_server_drop_unlinks_pipes() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().to_path_buf();
    let (cs, sc) = pipe_paths(&dir, "gone");

    let client_dir = dir.clone();
    let client = thread::spawn(move || {
        let _channel = ClientChannel::connect(&client_dir, "gone").unwrap();
        thread::sleep(Duration::from_millis(100));
    });

    let server = ServerChannel::bind(&dir, "gone").unwrap();
    assert!(cs.exists());
    assert!(sc.exists());

    client.join().unwrap();
    drop(server);
    assert!(!cs.exists());
    assert!(!sc.exists());
}
