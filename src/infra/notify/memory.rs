//! In-memory notification sink.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::{Notice, NotificationSink, SchedulerError};
use crate::util::serde::NotifyTarget;

/// Records every notice, for development and testing.
///
/// Clones share the same buffer.
#[derive(Clone, Default)]
pub struct InMemoryNotificationSink {
    delivered: Arc<Mutex<Vec<(NotifyTarget, Notice)>>>,
}

impl InMemoryNotificationSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices delivered so far, oldest first.
    pub fn delivered(&self) -> Vec<(NotifyTarget, Notice)> {
        self.delivered.lock().clone()
    }

    /// Notices delivered to `target`, oldest first.
    pub fn for_target(&self, target: &NotifyTarget) -> Vec<Notice> {
        self.delivered
            .lock()
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, n)| n.clone())
            .collect()
    }

    /// Number of notices delivered.
    pub fn len(&self) -> usize {
        self.delivered.lock().len()
    }

    /// Whether nothing has been delivered.
    pub fn is_empty(&self) -> bool {
        self.delivered.lock().is_empty()
    }

    /// Forget everything delivered so far.
    pub fn clear(&self) {
        self.delivered.lock().clear();
    }
}

impl NotificationSink for InMemoryNotificationSink {
    fn notify(&self, target: &NotifyTarget, notice: Notice) -> Result<(), SchedulerError> {
        self.delivered.lock().push((target.clone(), notice));
        Ok(())
    }
}
