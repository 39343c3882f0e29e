//! Tests for notification sinks

use bathroom_scheduler::core::{Notice, NotificationSink};
use bathroom_scheduler::infra::{ChannelNotificationSink, InMemoryNotificationSink, TracingNotificationSink};
use bathroom_scheduler::util::{NotifyTarget, ResourceId};

fn already_free() -> Notice {
    Notice::AlreadyFree {
        resource: ResourceId::new("bathroom"),
    }
}

#[test]
fn test_in_memory_sink_records_per_target() {
    let sink = InMemoryNotificationSink::new();
    let a = NotifyTarget::new("a");
    let b = NotifyTarget::new("b");

    sink.notify(&a, already_free()).unwrap();
    sink.notify(&b, already_free()).unwrap();
    sink.notify(&a, already_free()).unwrap();

    assert_eq!(sink.len(), 3);
    assert_eq!(sink.for_target(&a).len(), 2);
    assert_eq!(sink.for_target(&b).len(), 1);

    sink.clear();
    assert!(sink.is_empty());
}

#[test]
fn test_in_memory_sink_clones_share_buffer() {
    let sink = InMemoryNotificationSink::new();
    let clone = sink.clone();
    clone.notify(&NotifyTarget::new("a"), already_free()).unwrap();
    assert_eq!(sink.delivered().len(), 1);
}

#[test]
fn test_tracing_sink_never_fails() {
    assert!(TracingNotificationSink
        .notify(&NotifyTarget::new("a"), already_free())
        .is_ok());
}

#[tokio::test]
async fn test_channel_sink_preserves_order() {
    let (sink, mut rx) = ChannelNotificationSink::new();
    let target = NotifyTarget::new("a");
    sink.notify(&target, already_free()).unwrap();
    sink.notify(
        &target,
        Notice::OccupancyEnded {
            resource: ResourceId::new("bathroom"),
            holder: "Alice".into(),
        },
    )
    .unwrap();

    assert_eq!(rx.recv().await.unwrap().notice, already_free());
    assert!(matches!(
        rx.recv().await.unwrap().notice,
        Notice::OccupancyEnded { .. }
    ));
}
