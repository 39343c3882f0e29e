//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use crate::core::{Spawn, TimerHandle};

/// Tokio-based spawner that runs timers on a tokio runtime.
#[derive(Clone)]
pub struct TokioSpawner {
    handle: Arc<tokio::runtime::Handle>,
}

impl TokioSpawner {
    /// Create a new `TokioSpawner` from a tokio runtime handle.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Spawner for the runtime the caller is running on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F) -> TimerHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let abort = self.handle.spawn(fut).abort_handle();
        TimerHandle::new(move || abort.abort())
    }
}
