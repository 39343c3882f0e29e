//! # Bathroom Scheduler
//!
//! Exclusive, time-bounded access to a shared physical resource, coordinated
//! among users of a chat front-end.
//!
//! A user reserves the resource for one of a fixed set of durations. The
//! reservation turns into occupancy after an onset delay, and occupancy ends
//! on its own once the duration runs out. Anyone may release it early.
//!
//! ```text
//! Free ──reserve──▶ Reserved ──onset delay──▶ Occupied ──duration──▶ Free
//!   ▲                  │                         │
//!   └─────release──────┴─────────release─────────┘
//! ```
//!
//! ## Key Features
//!
//! - **Single-writer state**: one `parking_lot::Mutex` per resource guards all fields
//! - **Generation-guarded timers**: a timer only ever advances the reservation it was started for
//! - **Race-free release**: pending timers are aborted and, if already firing, ignored
//! - **Fire-and-forget notices**: delivery failures are logged, never rolled back
//! - **Many resources**: one independent scheduler per configured resource id
//!
//! ```rust,ignore
//! use bathroom_scheduler::core::{ResourceScheduler, ScheduleLimits};
//! use bathroom_scheduler::infra::TracingNotificationSink;
//! use bathroom_scheduler::runtime::TokioSpawner;
//! use bathroom_scheduler::util::{NotifyTarget, ResourceId, UserId};
//!
//! let scheduler = ResourceScheduler::new(
//!     ResourceId::new("bathroom"),
//!     ScheduleLimits::default(),
//!     TracingNotificationSink,
//!     TokioSpawner::current(),
//! );
//!
//! scheduler.reserve(UserId::new("Alice"), 15, NotifyTarget::new("chat-42"))?;
//! println!("{}", scheduler.query());
//! ```
//!
//! For complete scenarios, see `tests/scheduler_lifecycle_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core state machine, timers and sink abstractions.
pub mod core;
/// Configuration models for resources and timing rules.
pub mod config;
/// Builders to construct schedulers from configuration.
pub mod builders;
/// Infrastructure adapters for notice delivery.
pub mod infra;
/// Runtime adapters, command glue and API surface.
pub mod runtime;
/// Shared utilities.
pub mod util;
