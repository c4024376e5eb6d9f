//! Request channel
//!
//! Duplex byte transport over a pair of named pipes (FIFOs).
//!
//! Both paths derive from a receiver token shared between the two processes:
//! `{dir}/{token}_CS` carries requests client → server and `{dir}/{token}_SC`
//! carries replies server → client.
//!
//! The server opens its read end non-blocking so the dispatcher can poll it
//! without stalling the console or the queue worker; the client opens both
//! ends blocking and rendezvouses with the server in the kernel.

use std::ffi::CString;
use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::os::unix::ffi::OsStrExt;
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{LibrisError, Result};
use crate::protocol::{
    decode_request, encode_reply, read_reply, write_request, Request, REQUEST_SIZE,
};

/// FIFO permission bits, owner read/write + group read
const FIFO_MODE: libc::mode_t = 0o640;

/// Sleep between connect retries
const CONNECT_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Give the peer five minutes to show up before calling setup failed
const CONNECT_RETRY_LIMIT: u32 = 6000;

/// Derive the pipe paths for a session token
///
/// Returns `(client_to_server, server_to_client)`
pub fn pipe_paths(dir: &Path, token: &str) -> (PathBuf, PathBuf) {
    (
        dir.join(format!("{token}_CS")),
        dir.join(format!("{token}_SC")),
    )
}

/// Create a FIFO at `path`, tolerating one that already exists
fn make_fifo(path: &Path) -> Result<()> {
    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| LibrisError::Setup(format!("pipe path contains NUL: {}", path.display())))?;

    let rc = unsafe { libc::mkfifo(c_path.as_ptr(), FIFO_MODE) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() != Some(libc::EEXIST) {
            return Err(LibrisError::Setup(format!(
                "mkfifo {} failed: {err}",
                path.display()
            )));
        }
    }
    Ok(())
}

// =============================================================================
// Server endpoint
// =============================================================================

/// Server side of the request channel
///
/// Owns both FIFO paths; they are unlinked on drop.
pub struct ServerChannel {
    /// Client→server read end, opened non-blocking
    incoming: File,

    /// Server→client write end
    outgoing: File,

    /// Partially received request record carried across polls
    pending: Vec<u8>,

    cs_path: PathBuf,
    sc_path: PathBuf,
}

impl ServerChannel {
    /// Create both FIFOs and open the server's endpoints
    ///
    /// The read end opens immediately. The write end cannot open before the
    /// client holds its read end (ENXIO), so it is retried on an interval;
    /// a client that never connects is a setup failure.
    pub fn bind(dir: &Path, token: &str) -> Result<Self> {
        let (cs_path, sc_path) = pipe_paths(dir, token);
        make_fifo(&cs_path)?;
        make_fifo(&sc_path)?;

        let incoming = OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NONBLOCK)
            .open(&cs_path)
            .map_err(|e| {
                LibrisError::Setup(format!("opening {} for reading: {e}", cs_path.display()))
            })?;

        let mut attempts = 0;
        let outgoing = loop {
            match OpenOptions::new()
                .write(true)
                .custom_flags(libc::O_NONBLOCK)
                .open(&sc_path)
            {
                Ok(file) => break file,
                Err(e) if e.raw_os_error() == Some(libc::ENXIO) => {
                    attempts += 1;
                    if attempts > CONNECT_RETRY_LIMIT {
                        return Err(LibrisError::Setup(format!(
                            "no client opened {} for reading",
                            sc_path.display()
                        )));
                    }
                    std::thread::sleep(CONNECT_RETRY_INTERVAL);
                }
                Err(e) => {
                    return Err(LibrisError::Setup(format!(
                        "opening {} for writing: {e}",
                        sc_path.display()
                    )))
                }
            }
        };

        tracing::debug!("channel bound on token {token}");

        Ok(Self {
            incoming,
            outgoing,
            pending: Vec::with_capacity(REQUEST_SIZE),
            cs_path,
            sc_path,
        })
    }

    /// Poll for one request without blocking the caller
    ///
    /// Returns `Ok(None)` when no data is pending or no writer is connected.
    /// A record is 61 bytes and FIFO writes that small are atomic, so a
    /// partial read only happens around a writer crash; the remainder of a
    /// started record is awaited before returning.
    pub fn try_receive(&mut self) -> Result<Option<Request>> {
        let mut chunk = [0u8; REQUEST_SIZE];
        loop {
            let needed = REQUEST_SIZE - self.pending.len();
            match self.incoming.read(&mut chunk[..needed]) {
                Ok(0) => {
                    // No writer holds the pipe (yet, or anymore)
                    return if self.pending.is_empty() {
                        Ok(None)
                    } else {
                        Err(LibrisError::Channel(
                            "client closed the pipe mid-record".to_string(),
                        ))
                    };
                }
                Ok(n) => {
                    self.pending.extend_from_slice(&chunk[..n]);
                    if self.pending.len() == REQUEST_SIZE {
                        let request = decode_request(&self.pending)?;
                        self.pending.clear();
                        return Ok(Some(request));
                    }
                }
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    if self.pending.is_empty() {
                        return Ok(None);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(LibrisError::Channel(format!("pipe read failed: {e}")));
                }
            }
        }
    }

    /// Send one NUL-terminated reply to the client
    ///
    /// A broken pipe here is fatal to the server; there is no retry.
    pub fn send_reply(&mut self, text: &str) -> Result<()> {
        let bytes = encode_reply(text)?;
        let mut written = 0;
        while written < bytes.len() {
            match self.outgoing.write(&bytes[written..]) {
                Ok(0) => {
                    return Err(LibrisError::Channel(
                        "reply pipe closed by client".to_string(),
                    ))
                }
                Ok(n) => written += n,
                Err(e) if e.kind() == ErrorKind::WouldBlock => {
                    // Pipe buffer full; the client drains it
                    std::thread::sleep(Duration::from_millis(1));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => {
                    return Err(LibrisError::Channel(format!("pipe write failed: {e}")));
                }
            }
        }
        Ok(())
    }
}

impl Drop for ServerChannel {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.cs_path);
        let _ = std::fs::remove_file(&self.sc_path);
    }
}

// =============================================================================
// Client endpoint
// =============================================================================

/// Client side of the request channel
pub struct ClientChannel {
    /// Client→server write end
    outgoing: File,

    /// Server→client read end
    incoming: File,
}

impl ClientChannel {
    /// Connect to a server session
    ///
    /// The server creates the FIFOs; connecting before it has is retried on
    /// an interval. Both opens then block until the matching server end is
    /// held, which is the session rendezvous.
    pub fn connect(dir: &Path, token: &str) -> Result<Self> {
        let (cs_path, sc_path) = pipe_paths(dir, token);

        let mut attempts = 0;
        let outgoing = loop {
            match OpenOptions::new().write(true).open(&cs_path) {
                Ok(file) => break file,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    attempts += 1;
                    if attempts > CONNECT_RETRY_LIMIT {
                        return Err(LibrisError::Setup(format!(
                            "no server created {}",
                            cs_path.display()
                        )));
                    }
                    std::thread::sleep(CONNECT_RETRY_INTERVAL);
                }
                Err(e) => {
                    return Err(LibrisError::Setup(format!(
                        "opening {} for writing: {e}",
                        cs_path.display()
                    )))
                }
            }
        };

        let incoming = OpenOptions::new().read(true).open(&sc_path).map_err(|e| {
            LibrisError::Setup(format!("opening {} for reading: {e}", sc_path.display()))
        })?;

        Ok(Self { outgoing, incoming })
    }

    /// Send one request record
    pub fn send(&mut self, request: &Request) -> Result<()> {
        write_request(&mut self.outgoing, request)
            .map_err(|e| LibrisError::Channel(format!("sending request: {e}")))
    }

    /// Receive one reply, blocking until the server answers
    pub fn receive_reply(&mut self) -> Result<String> {
        read_reply(&mut self.incoming)
    }
}
