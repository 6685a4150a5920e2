//! Snapshot hub: lifecycle flag, latest snapshot and pending requests
//!
//! All state of a service instance lives behind one lock, so activation,
//! snapshot replacement and the pending-request drain are atomic with
//! respect to each other. Pending requests are fulfilled in arrival order.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

use crate::error::{Result, ServiceError};

type Reply<T> = oneshot::Sender<Result<T>>;

struct HubState<T> {
    is_active: bool,
    /// Bumped on every activation; stale acquisition tasks compare against it
    generation: u64,
    cancel: CancellationToken,
    snapshot: Option<T>,
    published_at: Option<DateTime<Utc>>,
    pending: Vec<Reply<T>>,
}

pub struct SnapshotHub<T> {
    label: String,
    state: Mutex<HubState<T>>,
}

impl<T: Clone + Send + 'static> SnapshotHub<T> {
    pub fn new(label: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            label: label.into(),
            state: Mutex::new(HubState {
                is_active: false,
                generation: 0,
                cancel: CancellationToken::new(),
                snapshot: None,
                published_at: None,
                pending: Vec::new(),
            }),
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Flip to active. Returns a publisher for the new acquisition cycle,
    /// or `None` when the hub was already active.
    pub fn activate(self: &Arc<Self>) -> Option<Publisher<T>> {
        let mut state = self.state.lock();
        if state.is_active {
            return None;
        }

        state.is_active = true;
        state.generation += 1;
        state.cancel = CancellationToken::new();

        log::info!("[{}] service activated", self.label);

        Some(Publisher {
            hub: Arc::clone(self),
            generation: state.generation,
            cancel: state.cancel.clone(),
        })
    }

    /// Flip to inactive: cancel acquisition, drop the snapshot and fail
    /// every pending request. No-op when already inactive.
    pub fn deactivate(&self) -> bool {
        let pending = {
            let mut state = self.state.lock();
            if !state.is_active {
                return false;
            }

            state.is_active = false;
            state.cancel.cancel();
            state.snapshot = None;
            state.published_at = None;
            std::mem::take(&mut state.pending)
        };

        if !pending.is_empty() {
            log::info!(
                "[{}] failing {} pending request(s) on throttle",
                self.label,
                pending.len()
            );
        }
        for reply in pending {
            let _ = reply.send(Err(ServiceError::Throttled));
        }

        log::info!("[{}] service throttled", self.label);
        true
    }

    /// Register a request. Answered at once when a snapshot exists,
    /// otherwise queued until the next publication.
    pub fn request(&self) -> oneshot::Receiver<Result<T>> {
        let (reply, receiver) = oneshot::channel();
        let mut state = self.state.lock();

        match &state.snapshot {
            Some(snapshot) => {
                let _ = reply.send(Ok(snapshot.clone()));
            }
            None => {
                // Callers that timed out or gave up leave closed senders behind
                state.pending.retain(|pending| !pending.is_closed());
                state.pending.push(reply);
            }
        }

        receiver
    }

    fn publish(&self, generation: u64, snapshot: T) -> Option<usize> {
        let mut state = self.state.lock();
        if !state.is_active || state.generation != generation {
            return None;
        }

        state.snapshot = Some(snapshot.clone());
        state.published_at = Some(Utc::now());

        let pending = std::mem::take(&mut state.pending);
        let count = pending.len();
        for reply in pending {
            let _ = reply.send(Ok(snapshot.clone()));
        }

        Some(count)
    }

    fn clear(&self, generation: u64) -> bool {
        let mut state = self.state.lock();
        if !state.is_active || state.generation != generation {
            return false;
        }
        state.snapshot = None;
        state.published_at = None;
        true
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().is_active
    }

    pub fn snapshot(&self) -> Option<T> {
        self.state.lock().snapshot.clone()
    }

    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        self.state.lock().published_at
    }

    /// Requests still waiting for a snapshot
    pub fn pending_count(&self) -> usize {
        self.state
            .lock()
            .pending
            .iter()
            .filter(|reply| !reply.is_closed())
            .count()
    }
}

/// Write handle of one acquisition cycle.
///
/// Publications from a cycle that has since been throttled (or replaced by
/// a newer activation) are ignored.
pub struct Publisher<T> {
    hub: Arc<SnapshotHub<T>>,
    generation: u64,
    cancel: CancellationToken,
}

impl<T: Clone + Send + 'static> Publisher<T> {
    pub fn label(&self) -> &str {
        self.hub.label()
    }

    /// Replace the snapshot and release every pending request
    pub fn publish(&self, snapshot: T) -> bool {
        match self.hub.publish(self.generation, snapshot) {
            Some(drained) => {
                if drained > 0 {
                    log::debug!(
                        "[{}] released {} pending request(s)",
                        self.hub.label(),
                        drained
                    );
                }
                true
            }
            None => {
                log::debug!("[{}] dropping snapshot of a stale cycle", self.hub.label());
                false
            }
        }
    }

    /// Drop the snapshot; later requests queue until the next publication
    pub fn clear(&self) -> bool {
        let cleared = self.hub.clear(self.generation);
        if cleared {
            log::info!("[{}] snapshot cleared", self.hub.label());
        }
        cleared
    }

    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
