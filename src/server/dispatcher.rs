//! Request Dispatcher
//!
//! Reads the channel and routes each request by operation kind.
//!
//! - Return/Renew: acknowledge immediately (without touching the catalog),
//!   then enqueue for the worker
//! - Borrow: availability must be confirmed before any reply, so the whole
//!   search+mutate runs inline
//! - Quit: raise the shutdown flag, send no reply
//!
//! Any channel I/O failure is fatal to the whole process; there is no
//! per-message retry.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::catalog::{Applied, CatalogStore, Update};
use crate::channel::ServerChannel;
use crate::error::Result;
use crate::protocol::{OpKind, Request};
use crate::queue::QueueProducer;

/// Channel reader and per-operation router
pub struct Dispatcher {
    catalog: Arc<CatalogStore>,
    shutdown: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl Dispatcher {
    pub fn new(
        catalog: Arc<CatalogStore>,
        shutdown: Arc<AtomicBool>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            catalog,
            shutdown,
            poll_interval,
        }
    }

    /// Poll-and-dispatch loop; returns once shutdown is observed
    ///
    /// Takes the queue producer by value: it drops when the loop exits,
    /// which is the worker's signal to drain and stop.
    pub fn run(&self, channel: &mut ServerChannel, queue: QueueProducer) -> Result<()> {
        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                tracing::info!("dispatcher: shutdown observed, no longer accepting requests");
                break;
            }

            let Some(request) = channel.try_receive()? else {
                thread::sleep(self.poll_interval);
                continue;
            };

            tracing::debug!(
                "received: {:?}, {}, {}",
                request.op,
                request.title,
                request.isbn
            );

            match request.op {
                OpKind::Quit => {
                    // Quit gets no reply
                    self.shutdown.store(true, Ordering::SeqCst);
                    tracing::info!("dispatcher: client quit, shutting down");
                    break;
                }
                OpKind::Return | OpKind::Renew => {
                    channel.send_reply(&deferred_ack(&request))?;
                    // Suspends while the queue is full; nothing is dropped
                    queue.push(request)?;
                }
                OpKind::Borrow => {
                    let reply = match self.catalog.apply(&request.isbn, Update::Borrow)? {
                        Applied::Done { due, .. } => format!(
                            "The book {} is available, it is due back on {}",
                            request.title, due
                        ),
                        Applied::NoCopyInState | Applied::UnknownIsbn => {
                            format!("The book {} is not available", request.title)
                        }
                    };
                    channel.send_reply(&reply)?;
                }
            }
        }

        Ok(())
    }
}

/// Acknowledgment text for the deferred operations
fn deferred_ack(request: &Request) -> String {
    match request.op {
        OpKind::Return => format!("The library has received the book {}", request.title),
        _ => format!(
            "The library has renewed the due date for the book {}",
            request.title
        ),
    }
}
