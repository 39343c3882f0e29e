//! Tests for building schedulers from configuration

use std::collections::HashMap;

use bathroom_scheduler::builders::build_registry;
use bathroom_scheduler::config::{ResourceConfig, SchedulerConfig};
use bathroom_scheduler::core::{SchedulerError, StatusView};
use bathroom_scheduler::infra::InMemoryNotificationSink;
use bathroom_scheduler::runtime::{status_of, TokioSpawner};
use bathroom_scheduler::util::{NotifyTarget, ResourceId, UserId};

fn two_resources() -> SchedulerConfig {
    SchedulerConfig {
        resources: HashMap::from([
            ("downstairs".to_string(), ResourceConfig::default()),
            (
                "upstairs".to_string(),
                ResourceConfig {
                    onset_delay_secs: 60,
                    allowed_durations_minutes: vec![5],
                },
            ),
        ]),
    }
}

#[tokio::test(start_paused = true)]
async fn test_registry_builds_one_scheduler_per_resource() {
    let sink = InMemoryNotificationSink::new();
    let registry = build_registry(&two_resources(), |_, _| Ok(sink.clone()), TokioSpawner::current()).unwrap();

    assert_eq!(registry.len(), 2);
    assert_eq!(
        registry.ids(),
        vec![ResourceId::new("downstairs"), ResourceId::new("upstairs")]
    );
    let upstairs = registry.get(&ResourceId::new("upstairs")).unwrap();
    assert_eq!(upstairs.limits().allowed_minutes, vec![5]);
}

#[tokio::test(start_paused = true)]
async fn test_resources_are_independent() {
    let sink = InMemoryNotificationSink::new();
    let registry = build_registry(&two_resources(), |_, _| Ok(sink.clone()), TokioSpawner::current()).unwrap();
    let downstairs = ResourceId::new("downstairs");
    let upstairs = ResourceId::new("upstairs");

    registry
        .get(&downstairs)
        .unwrap()
        .reserve(UserId::new("Alice"), 15, NotifyTarget::new("chat"))
        .unwrap();
    registry
        .get(&upstairs)
        .unwrap()
        .reserve(UserId::new("Bob"), 5, NotifyTarget::new("chat"))
        .unwrap();

    assert!(matches!(
        status_of(&registry, &downstairs).unwrap().status,
        StatusView::Reserved { .. }
    ));
    registry.get(&upstairs).unwrap().release(UserId::new("Bob"), NotifyTarget::new("chat"));
    assert_eq!(status_of(&registry, &upstairs).unwrap().status, StatusView::Free);
    assert!(matches!(
        status_of(&registry, &downstairs).unwrap().status,
        StatusView::Reserved { .. }
    ));

    registry.shutdown();
    assert_eq!(status_of(&registry, &downstairs).unwrap().status, StatusView::Free);
}

#[tokio::test(start_paused = true)]
async fn test_unknown_resource_lookup() {
    let registry = build_registry(
        &two_resources(),
        |_, _| Ok(InMemoryNotificationSink::new()),
        TokioSpawner::current(),
    )
    .unwrap();
    let missing = ResourceId::new("sauna");

    assert!(matches!(
        registry.get(&missing),
        Err(SchedulerError::UnknownResource(ref id)) if *id == missing
    ));
    assert!(status_of(&registry, &missing).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_invalid_config_is_rejected() {
    let cfg = SchedulerConfig {
        resources: HashMap::new(),
    };
    let result = build_registry(
        &cfg,
        |_, _| Ok(InMemoryNotificationSink::new()),
        TokioSpawner::current(),
    );
    assert!(matches!(result, Err(SchedulerError::InvalidConfig(_))));
}

#[tokio::test(start_paused = true)]
async fn test_sink_factory_error_propagates() {
    let result = build_registry::<InMemoryNotificationSink, _, _>(
        &two_resources(),
        |id, _| Err(SchedulerError::Backend(format!("no chat for {id}"))),
        TokioSpawner::current(),
    );
    assert!(matches!(result, Err(SchedulerError::Backend(_))));
}
