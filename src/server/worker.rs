//! Queue Worker
//!
//! Drains the bounded queue and applies deferred mutations to the catalog.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::catalog::{Applied, CatalogStore, Update};
use crate::protocol::OpKind;
use crate::queue::QueueConsumer;

/// Consumer of deferred Return/Renew requests
pub struct QueueWorker {
    catalog: Arc<CatalogStore>,
    pacing: Duration,
}

impl QueueWorker {
    pub fn new(catalog: Arc<CatalogStore>, pacing: Duration) -> Self {
        Self { catalog, pacing }
    }

    /// Drain loop; exits once the producer is gone and the queue is empty
    ///
    /// Items already queued at shutdown are still processed (the Draining
    /// state). The pacing pause is a rate limit, not a correctness
    /// requirement. Catalog failures on a deferred item are reported locally
    /// and do not stop the drain.
    pub fn run(self, queue: QueueConsumer) {
        while let Some(request) = queue.pop() {
            let update = match request.op {
                OpKind::Return => Update::Return,
                OpKind::Renew => Update::Renew,
                other => {
                    tracing::warn!("non-deferred operation {other:?} found in queue, skipping");
                    continue;
                }
            };

            match self.catalog.apply(&request.isbn, update) {
                Ok(Applied::Done { copy, due }) => {
                    tracing::debug!(
                        "deferred {:?} applied: isbn {}, copy {}, due {}",
                        request.op,
                        request.isbn,
                        copy,
                        due
                    );
                }
                Ok(Applied::UnknownIsbn) => {
                    tracing::info!("deferred {:?}: isbn {} not in catalog", request.op, request.isbn);
                }
                Ok(Applied::NoCopyInState) => {
                    tracing::info!(
                        "deferred {:?}: isbn {} has no borrowed copy",
                        request.op,
                        request.isbn
                    );
                }
                Err(e) => {
                    tracing::error!("deferred {:?} for isbn {} failed: {e}", request.op, request.isbn);
                }
            }

            thread::sleep(self.pacing);
        }

        tracing::debug!("queue worker: drained and stopped");
    }
}
