//! Configuration models for resources and their timing rules.

pub mod resource;

pub use resource::{
    ResourceConfig, SchedulerConfig, MAX_DURATION_MINUTES, MAX_ONSET_DELAY_SECS,
};
