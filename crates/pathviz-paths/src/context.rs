//! Cooperative cancellation for running searches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    done: AtomicBool,
    wake: Notify,
}

/// A cancellation token shared between a search task and its owner.
///
/// Cloning yields another handle to the same token.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    inner: Arc<Inner>,
}

impl CancelToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether cancellation has been requested.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.done.load(Ordering::Acquire)
    }

    /// Request cancellation and wake a task parked in [`pause`](CancelToken::pause).
    pub fn cancel(&self) {
        self.inner.done.store(true, Ordering::Release);
        self.inner.wake.notify_waiters();
    }

    /// Suspend for `delay`, or just yield when `delay` is zero.
    ///
    /// Returns `true` if the token was cancelled before or during the pause.
    pub async fn pause(&self, delay: Duration) -> bool {
        if delay.is_zero() {
            if self.is_cancelled() {
                return true;
            }
            tokio::task::yield_now().await;
            return self.is_cancelled();
        }
        let notified = self.inner.wake.notified();
        tokio::pin!(notified);
        // register before the check so a concurrent cancel cannot be missed
        notified.as_mut().enable();
        if self.is_cancelled() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = &mut notified => {}
        }
        self.is_cancelled()
    }
}
