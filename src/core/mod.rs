//! Core scheduling abstractions: resource state machine, timers and sinks.

pub mod audit;
pub mod error;
pub mod notify;
pub mod scheduler;
pub mod spawn;
pub mod state;

pub use audit::{
    build_transition_event, AuditSink, InMemoryAuditSink, SharedAuditSink, TransitionEvent,
};
pub use error::{AppResult, SchedulerError};
pub use notify::{Notice, NotificationSink};
pub use scheduler::{ReleaseOutcome, Reservation, ResourceScheduler, ScheduleLimits};
pub use spawn::{Spawn, TimerHandle};
pub use state::{Holding, Phase, ResourceState, StateSnapshot, StatusView};
