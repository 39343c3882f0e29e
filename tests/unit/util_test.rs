//! Tests for utility functions

use std::time::Duration;

use bathroom_scheduler::util::{
    ceil_minutes, floor_minutes, init_tracing, now_ms, NotifyTarget, ResourceId, UserId,
};

#[test]
fn test_id_types_display_inner_value() {
    assert_eq!(ResourceId::new("bathroom").to_string(), "bathroom");
    assert_eq!(UserId::from("Alice").as_str(), "Alice");
    assert_eq!(NotifyTarget::from(String::from("42")), NotifyTarget::new("42"));
}

#[test]
fn test_id_types_serialize_transparently() {
    assert_eq!(serde_json::to_string(&UserId::new("Alice")).unwrap(), r#""Alice""#);
    let id: ResourceId = serde_json::from_str(r#""bathroom""#).unwrap();
    assert_eq!(id, ResourceId::new("bathroom"));
}

#[test]
fn test_minute_rounding() {
    assert_eq!(floor_minutes(Duration::from_secs(899)), 14);
    assert_eq!(ceil_minutes(Duration::from_secs(899)), 15);
}

#[test]
fn test_now_ms_is_after_epoch() {
    assert!(now_ms() > 1_600_000_000_000);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    tracing::info!("subscriber installed");
}
