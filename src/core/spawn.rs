//! Runtime abstraction for background timers.

use std::fmt;
use std::future::Future;

/// Abstraction for spawning timer tasks on a runtime.
///
/// Each call returns a [`TimerHandle`] that can stop the spawned task before
/// it completes.
///
/// The scheduler calls `spawn` while it holds the resource's state lock, and
/// the future locks that state again when it fires. Implementations must hand
/// the future to a runtime and return without polling it. A spawner that runs
/// the future inline deadlocks on the non-reentrant `parking_lot::Mutex`.
pub trait Spawn: Clone + Send + Sync + 'static {
    /// Spawn a detached future and return a handle able to cancel it.
    fn spawn<F>(&self, fut: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static;
}

/// Cancellation handle for exactly one in-flight timer.
///
/// Dropping the handle does not cancel the timer; only [`TimerHandle::cancel`]
/// does. A timer that is already running its callback when cancelled is not
/// interrupted, so callbacks still re-check the resource generation.
pub struct TimerHandle {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl TimerHandle {
    /// Wrap a runtime-specific cancel action.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// A handle whose timer cannot be stopped early.
    pub const fn detached() -> Self {
        Self { cancel: None }
    }

    /// Stop the underlying timer if the runtime still can.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerHandle")
            .field("cancellable", &self.cancel.is_some())
            .finish()
    }
}
