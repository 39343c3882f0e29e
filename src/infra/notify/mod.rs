//! Notification sink backends.

pub mod channel;
pub mod log;
pub mod memory;

pub use channel::{ChannelNotificationSink, Delivery};
pub use log::TracingNotificationSink;
pub use memory::InMemoryNotificationSink;
