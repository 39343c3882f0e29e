//! Channel-backed notification sink.
//!
//! The scheduler side never blocks: notices go into an unbounded tokio
//! channel and a chat front-end drains the receiver at its own pace.

use tokio::sync::mpsc;

use crate::core::{Notice, NotificationSink, SchedulerError};
use crate::util::serde::NotifyTarget;

/// One notice addressed to one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Destination.
    pub target: NotifyTarget,
    /// What to tell it.
    pub notice: Notice,
}

/// Forwards notices into an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelNotificationSink {
    tx: mpsc::UnboundedSender<Delivery>,
}

impl ChannelNotificationSink {
    /// Create a sink and the receiver that drains it.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Delivery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl NotificationSink for ChannelNotificationSink {
    fn notify(&self, target: &NotifyTarget, notice: Notice) -> Result<(), SchedulerError> {
        self.tx
            .send(Delivery {
                target: target.clone(),
                notice,
            })
            .map_err(|_| SchedulerError::Backend("notice receiver dropped".into()))
    }
}
