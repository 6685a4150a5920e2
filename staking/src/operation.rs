//! Awaitable unit of work yielding a calculator engine

use futures::future::BoxFuture;
use futures::FutureExt;
use stake_economics::RewardCalculatorEngine;
use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{timeout_at, Instant};

use crate::error::{Result, ServiceError};

/// Engine shared by every caller served from the same snapshot
pub type SharedEngine = Arc<dyn RewardCalculatorEngine>;

/// Result of a calculator request.
///
/// Await it directly, or hand it to [`CalculatorOperation::on_complete`] to
/// receive the engine through a callback on a chosen runtime.
#[must_use = "a calculator operation does nothing unless awaited or completed"]
pub struct CalculatorOperation {
    inner: BoxFuture<'static, Result<SharedEngine>>,
}

impl CalculatorOperation {
    /// Wait for a hub reply, giving up `wait` after the request was made.
    ///
    /// A `wait` reaching past the clock's range never expires.
    pub fn pending(receiver: oneshot::Receiver<Result<SharedEngine>>, wait: Duration) -> Self {
        let deadline = Instant::now().checked_add(wait);

        Self::from_future(async move {
            let reply = match deadline {
                Some(deadline) => match timeout_at(deadline, receiver).await {
                    Ok(reply) => reply,
                    Err(_) => return Err(ServiceError::TimedOut(wait.as_secs())),
                },
                None => receiver.await,
            };

            // Reply dropped without an answer: the hub went away
            reply.unwrap_or(Err(ServiceError::Throttled))
        })
    }

    /// Already resolved operation
    pub fn ready(result: Result<SharedEngine>) -> Self {
        Self::from_future(futures::future::ready(result))
    }

    pub fn from_future<F>(future: F) -> Self
    where
        F: Future<Output = Result<SharedEngine>> + Send + 'static,
    {
        Self {
            inner: future.boxed(),
        }
    }

    /// Run the operation on `handle` and deliver the result to `callback`
    /// there.
    pub fn on_complete<F>(self, handle: &Handle, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<SharedEngine>) + Send + 'static,
    {
        handle.spawn(async move {
            let result = self.inner.await;
            callback(result);
        })
    }
}

impl IntoFuture for CalculatorOperation {
    type Output = Result<SharedEngine>;
    type IntoFuture = BoxFuture<'static, Result<SharedEngine>>;

    fn into_future(self) -> Self::IntoFuture {
        self.inner
    }
}

impl std::fmt::Debug for CalculatorOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorOperation").finish_non_exhaustive()
    }
}
