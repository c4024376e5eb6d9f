//! Operator Console
//!
//! Line-oriented local commands, independent of the network channel:
//!
//! - `stop`: raise the shutdown flag; the dispatcher observes it at its
//!   loop head and exits, which wakes the queue worker through the queue
//! - `report`: print the catalog availability report
//! - anything else: ignored
//!
//! Stdin is polled with a timeout instead of blocking in `read_line`, so
//! the thread observes the shutdown flag and stays joinable even when
//! shutdown was initiated by a network Quit.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::catalog::CatalogStore;

/// Poll tick for operator input
const CONSOLE_POLL_MS: i32 = 200;

/// Local operator command loop
pub struct OperatorConsole {
    catalog: Arc<CatalogStore>,
    shutdown: Arc<AtomicBool>,
}

impl OperatorConsole {
    pub fn new(catalog: Arc<CatalogStore>, shutdown: Arc<AtomicBool>) -> Self {
        Self { catalog, shutdown }
    }

    /// Command loop; exits on shutdown or stdin EOF
    pub fn run(self) {
        let stdin = std::io::stdin();

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                break;
            }
            if !stdin_ready(CONSOLE_POLL_MS) {
                continue;
            }

            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) => break, // EOF: no more operator input
                Ok(_) => self.handle(line.trim()),
                Err(e) => {
                    tracing::warn!("console read failed: {e}");
                    break;
                }
            }
        }

        tracing::debug!("operator console stopped");
    }

    fn handle(&self, command: &str) {
        match command {
            "stop" => {
                tracing::info!("operator requested stop");
                self.shutdown.store(true, Ordering::SeqCst);
            }
            "report" => match self.catalog.report() {
                Ok(report) => print!("{report}"),
                Err(e) => tracing::error!("report failed: {e}"),
            },
            "" => {}
            other => {
                tracing::debug!("ignoring console input {other:?}");
            }
        }
    }
}

/// Wait up to `timeout_ms` for stdin to become readable
fn stdin_ready(timeout_ms: i32) -> bool {
    let mut pfd = libc::pollfd {
        fd: libc::STDIN_FILENO,
        events: libc::POLLIN,
        revents: 0,
    };
    let rc = unsafe { libc::poll(&mut pfd, 1, timeout_ms) };
    // POLLHUP still needs a read to surface the EOF
    rc > 0 && (pfd.revents & (libc::POLLIN | libc::POLLHUP)) != 0
}
