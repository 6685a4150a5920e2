//! Service contract and the shared service shell
//!
//! A service couples a [`SnapshotHub`] with a [`SnapshotSource`], the
//! chain-specific acquisition strategy. The shell owns the lifecycle; each
//! source only knows how to produce engines.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::time::MissedTickBehavior;

use crate::hub::{Publisher, SnapshotHub};
use crate::operation::{CalculatorOperation, SharedEngine};

/// Uniform entry point for every chain's reward calculator
pub trait RewardCalculatorService: Send + Sync {
    /// Start background acquisition. Idempotent.
    fn setup(&self);

    /// Stop acquisition and fail pending requests. No-op when inactive.
    fn throttle(&self);

    /// Engine built from the current snapshot, or from the next one when
    /// none is available yet
    fn fetch_calculator_operation(&self) -> CalculatorOperation;
}

/// Chain-specific acquisition strategy.
///
/// `acquire` runs for as long as the service stays active and publishes a
/// new engine whenever fresh chain state arrives. It is dropped at the next
/// await point once the service is throttled.
#[async_trait::async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn acquire(self: Arc<Self>, publisher: Publisher<SharedEngine>);
}

pub struct CalculatorService<S> {
    hub: Arc<SnapshotHub<SharedEngine>>,
    source: Arc<S>,
    runtime: Handle,
    request_timeout: Duration,
}

impl<S: SnapshotSource> CalculatorService<S> {
    pub fn new(
        label: impl Into<String>,
        source: S,
        runtime: Handle,
        request_timeout: Duration,
    ) -> Self {
        Self {
            hub: SnapshotHub::new(label),
            source: Arc::new(source),
            runtime,
            request_timeout,
        }
    }

    pub fn hub(&self) -> &Arc<SnapshotHub<SharedEngine>> {
        &self.hub
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: SnapshotSource> RewardCalculatorService for CalculatorService<S> {
    fn setup(&self) {
        let Some(publisher) = self.hub.activate() else {
            log::debug!("[{}] setup ignored, already active", self.hub.label());
            return;
        };

        let cancel = publisher.cancellation();
        let source = Arc::clone(&self.source);
        let label = self.hub.label().to_string();

        self.runtime.spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    log::debug!("[{}] acquisition cancelled", label);
                }
                _ = source.acquire(publisher) => {
                    log::debug!("[{}] acquisition finished", label);
                }
            }
        });
    }

    fn throttle(&self) {
        self.hub.deactivate();
    }

    fn fetch_calculator_operation(&self) -> CalculatorOperation {
        CalculatorOperation::pending(self.hub.request(), self.request_timeout)
    }
}

impl<S> Drop for CalculatorService<S> {
    fn drop(&mut self) {
        self.hub.deactivate();
    }
}

/// Run `cycle` now and then once per `period`
pub(crate) async fn poll_every<F, Fut>(period: Duration, mut cycle: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        cycle().await;
    }
}
