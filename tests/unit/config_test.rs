//! Tests for configuration validation

use std::collections::HashMap;
use std::time::Duration;

use bathroom_scheduler::config::{
    ResourceConfig, SchedulerConfig, MAX_DURATION_MINUTES, MAX_ONSET_DELAY_SECS,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_resource_config_defaults() {
    let cfg = ResourceConfig::default();
    assert_eq!(cfg.onset_delay_secs, 600);
    assert_eq!(cfg.allowed_durations_minutes, vec![15, 30, 45, 60]);
    assert!(cfg.validate().is_ok());

    let limits = cfg.limits();
    assert_eq!(limits.onset_delay, Duration::from_secs(600));
    assert_eq!(limits.allowed_minutes, vec![15, 30, 45, 60]);
}

#[test]
fn test_resource_config_invalid_onset_delay() {
    let invalid = ResourceConfig {
        onset_delay_secs: 0,
        ..ResourceConfig::default()
    };
    assert!(invalid.validate().is_err());
}

#[test]
fn test_resource_config_rejects_oversized_delay() {
    let largest = ResourceConfig {
        onset_delay_secs: MAX_ONSET_DELAY_SECS,
        ..ResourceConfig::default()
    };
    assert!(largest.validate().is_ok());

    for onset_delay_secs in [MAX_ONSET_DELAY_SECS + 1, u64::MAX] {
        let invalid = ResourceConfig {
            onset_delay_secs,
            ..ResourceConfig::default()
        };
        assert!(invalid.validate().unwrap_err().contains("onset_delay_secs"));
    }
}

#[test]
fn test_resource_config_rejects_oversized_duration() {
    let largest = ResourceConfig {
        allowed_durations_minutes: vec![15, MAX_DURATION_MINUTES],
        ..ResourceConfig::default()
    };
    assert!(largest.validate().is_ok());

    let invalid = ResourceConfig {
        allowed_durations_minutes: vec![15, MAX_DURATION_MINUTES + 1],
        ..ResourceConfig::default()
    };
    assert!(invalid
        .validate()
        .unwrap_err()
        .contains("allowed_durations_minutes"));
}

#[test]
fn test_resource_config_invalid_durations() {
    for durations in [vec![], vec![0, 15], vec![15, 15]] {
        let invalid = ResourceConfig {
            allowed_durations_minutes: durations,
            ..ResourceConfig::default()
        };
        assert!(invalid.validate().is_err());
    }
}

#[test]
fn test_scheduler_config_empty_resources() {
    let config = SchedulerConfig {
        resources: HashMap::new(),
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_scheduler_config_from_json() {
    let json = r#"{
        "resources": {
            "bathroom": {
                "onset_delay_secs": 300,
                "allowed_durations_minutes": [10, 20]
            },
            "shower": {}
        }
    }"#;

    let config = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(config.resources["bathroom"].onset_delay_secs, 300);
    assert_eq!(config.resources["bathroom"].allowed_durations_minutes, vec![10, 20]);
    assert_eq!(config.resources["shower"], ResourceConfig::default());
}

#[test]
fn test_scheduler_config_from_json_rejects_invalid() {
    let json = r#"{ "resources": { "bathroom": { "onset_delay_secs": 0 } } }"#;
    let err = SchedulerConfig::from_json_str(json).unwrap_err();
    assert!(err.contains("bathroom"));

    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_scheduler_config_from_vars_defaults() {
    let config = SchedulerConfig::from_vars(lookup(&[])).unwrap();
    assert_eq!(config.resources.len(), 1);
    assert_eq!(config.resources["bathroom"], ResourceConfig::default());
}

#[test]
fn test_scheduler_config_from_vars_overrides() {
    let config = SchedulerConfig::from_vars(lookup(&[
        ("BATHROOM_RESOURCE", "upstairs"),
        ("BATHROOM_ONSET_DELAY_SECS", "120"),
        ("BATHROOM_DURATIONS", "5, 10,20"),
    ]))
    .unwrap();

    let upstairs = &config.resources["upstairs"];
    assert_eq!(upstairs.onset_delay_secs, 120);
    assert_eq!(upstairs.allowed_durations_minutes, vec![5, 10, 20]);
}

#[test]
fn test_scheduler_config_from_vars_rejects_garbage() {
    assert!(SchedulerConfig::from_vars(lookup(&[("BATHROOM_ONSET_DELAY_SECS", "soon")])).is_err());
    assert!(SchedulerConfig::from_vars(lookup(&[("BATHROOM_DURATIONS", "15,-1")])).is_err());
    assert!(SchedulerConfig::from_vars(lookup(&[("BATHROOM_DURATIONS", "")])).is_err());
}

#[test]
fn test_scheduler_config_from_vars_rejects_oversized_values() {
    let max = u64::MAX.to_string();
    let err = SchedulerConfig::from_vars(lookup(&[("BATHROOM_ONSET_DELAY_SECS", max.as_str())]))
        .unwrap_err();
    assert!(err.contains("onset_delay_secs"));

    assert!(SchedulerConfig::from_vars(lookup(&[("BATHROOM_DURATIONS", "15,4000000000")])).is_err());
    assert!(SchedulerConfig::from_vars(lookup(&[("BATHROOM_DURATIONS", "15,1441")])).is_err());
}

#[test]
fn test_scheduler_config_from_env_reports_context() {
    // Only this test touches the process environment.
    std::env::set_var("BATHROOM_ONSET_DELAY_SECS", "soon");
    let result = SchedulerConfig::from_env();
    std::env::remove_var("BATHROOM_ONSET_DELAY_SECS");

    let err = result.unwrap_err();
    assert_eq!(
        err.to_string(),
        "loading scheduler configuration from the environment"
    );
    assert!(format!("{err:#}").contains("BATHROOM_ONSET_DELAY_SECS"));
}
