//! Notification sink that only logs.

use crate::core::{Notice, NotificationSink, SchedulerError};
use crate::util::serde::NotifyTarget;

/// Writes each notice to the tracing subscriber at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotificationSink;

impl NotificationSink for TracingNotificationSink {
    fn notify(&self, target: &NotifyTarget, notice: Notice) -> Result<(), SchedulerError> {
        tracing::info!(%target, ?notice, "{}", notice);
        Ok(())
    }
}
