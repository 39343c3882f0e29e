//! Infrastructure adapters for notice delivery.

pub mod notify;
pub use notify::{ChannelNotificationSink, Delivery, InMemoryNotificationSink, TracingNotificationSink};
