//! Asynchronous notices and the sink they are pushed through.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::core::state::Phase;
use crate::core::SchedulerError;
use crate::util::clock::{ceil_minutes, floor_minutes};
use crate::util::serde::{NotifyTarget, ResourceId, UserId};

/// Every message the scheduler pushes on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// Reservation accepted; occupancy starts after the onset delay.
    Accepted {
        /// Reserved resource.
        resource: ResourceId,
        /// Reserving user.
        holder: UserId,
        /// Time until occupancy begins.
        onset_in: Duration,
        /// Requested occupancy length.
        duration: Duration,
    },
    /// Reservation rejected because the resource is taken.
    Busy {
        /// Requested resource.
        resource: ResourceId,
        /// Phase that blocked the reservation.
        phase: Phase,
    },
    /// Onset delay elapsed; the holder now occupies the resource.
    OccupancyStarted {
        /// Occupied resource.
        resource: ResourceId,
        /// Occupying user.
        holder: UserId,
        /// Occupancy length.
        duration: Duration,
    },
    /// Occupancy ran out; the resource is free again.
    OccupancyEnded {
        /// Freed resource.
        resource: ResourceId,
        /// User whose time ran out.
        holder: UserId,
    },
    /// Someone released the resource before its timers ran out.
    Released {
        /// Freed resource.
        resource: ResourceId,
        /// User who released it.
        released_by: UserId,
        /// User who held it.
        previous_holder: UserId,
    },
    /// Release requested but nothing was held.
    AlreadyFree {
        /// Requested resource.
        resource: ResourceId,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted {
                resource,
                onset_in,
                duration,
                ..
            } => write!(
                f,
                "⏳ {resource} will be occupied in {} minutes\n⏱ Duration: {} minutes",
                ceil_minutes(*onset_in),
                floor_minutes(*duration)
            ),
            Self::Busy { resource, .. } => {
                write!(f, "❌ {resource} is already reserved or occupied!")
            }
            Self::OccupancyStarted {
                resource, holder, ..
            } => write!(f, "🛁 {resource} is now occupied by {holder}"),
            Self::OccupancyEnded { resource, .. } => {
                write!(f, "✅ Time is up! {resource} is free now.")
            }
            Self::Released { resource, .. } => write!(f, "✅ {resource} was released manually"),
            Self::AlreadyFree { resource } => write!(f, "ℹ️ {resource} is already free"),
        }
    }
}

/// Destination for notices.
///
/// Called after the state lock is released. Implementations must not block;
/// a returned error is logged by the scheduler and never undoes the transition.
pub trait NotificationSink: Send + Sync + 'static {
    /// Push `notice` towards `target`.
    fn notify(&self, target: &NotifyTarget, notice: Notice) -> Result<(), SchedulerError>;
}
