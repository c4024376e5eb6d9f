//! Bounded request queue
//!
//! Fixed-capacity FIFO of pending mutating requests, shared between the
//! dispatcher (single producer) and the queue worker (single consumer).
//!
//! ## Contract
//! - Strict FIFO: item *i* dequeues before item *i+1*
//! - `push` suspends while the queue is full (backpressure); items are never
//!   dropped or rejected
//! - `pop` suspends while the queue is empty
//! - Dropping the producer is the shutdown signal: a blocked `pop` wakes,
//!   the remaining buffered items drain in order, then `pop` returns `None`

use crossbeam::channel::{bounded, Receiver, Sender};

use crate::error::{LibrisError, Result};
use crate::protocol::Request;

/// Default queue capacity
pub const DEFAULT_CAPACITY: usize = 10;

/// Create a bounded request queue, split into its two endpoints
pub fn bounded_queue(capacity: usize) -> (QueueProducer, QueueConsumer) {
    let (tx, rx) = bounded(capacity);
    (QueueProducer { tx }, QueueConsumer { rx })
}

/// Producer endpoint, owned by the dispatcher
pub struct QueueProducer {
    tx: Sender<Request>,
}

impl QueueProducer {
    /// Enqueue a request, suspending until a slot is free
    ///
    /// Fails only when the consumer is gone, which means the worker died
    /// while the server was still dispatching.
    pub fn push(&self, request: Request) -> Result<()> {
        self.tx
            .send(request)
            .map_err(|_| LibrisError::Channel("queue consumer is gone".to_string()))
    }

    /// Number of requests currently waiting
    pub fn len(&self) -> usize {
        self.tx.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.tx.is_empty()
    }
}

/// Consumer endpoint, owned by the queue worker
pub struct QueueConsumer {
    rx: Receiver<Request>,
}

impl QueueConsumer {
    /// Dequeue the oldest request, suspending until one is available
    ///
    /// Returns `None` once the producer has been dropped and the queue is
    /// fully drained.
    pub fn pop(&self) -> Option<Request> {
        self.rx.recv().ok()
    }

    /// Number of requests currently waiting
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    /// Whether the queue is currently empty
    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }
}
