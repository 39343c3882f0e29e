//! Canonical state of one resource and its read-only projections.
//!
//! The holder, notify target and pending timer live inside the [`Claim`]
//! variant they belong to, so a free resource cannot carry a stale holder or
//! timer and only an occupied one has a deadline.

use std::fmt;
use std::mem;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use crate::core::spawn::TimerHandle;
use crate::util::clock::{ceil_minutes, floor_minutes};
use crate::util::serde::{NotifyTarget, UserId};

/// Lifecycle phase of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nobody holds the resource.
    Free,
    /// Claimed, waiting for the onset delay to elapse.
    Reserved,
    /// Actively held until its deadline.
    Occupied,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Free => "free",
            Self::Reserved => "reserved",
            Self::Occupied => "occupied",
        })
    }
}

/// Who holds the resource and under which reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Holding {
    /// Reserving/occupying user.
    pub holder: UserId,
    /// Where asynchronous notices for this holding are routed.
    pub notify_target: NotifyTarget,
    /// Occupancy length requested at reservation time.
    pub requested_duration: Duration,
    /// Reservation generation, unique per accepted reservation.
    pub generation: u64,
}

#[derive(Debug)]
enum Claim {
    Free,
    Reserved {
        holding: Holding,
        onset_at: Instant,
        timer: TimerHandle,
    },
    Occupied {
        holding: Holding,
        occupied_until: Instant,
        timer: TimerHandle,
    },
}

/// The single mutable entity owned by a scheduler.
#[derive(Debug)]
pub struct ResourceState {
    claim: Claim,
    last_generation: u64,
}

impl Default for ResourceState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceState {
    /// A free resource that has never been reserved.
    pub const fn new() -> Self {
        Self {
            claim: Claim::Free,
            last_generation: 0,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> Phase {
        match self.claim {
            Claim::Free => Phase::Free,
            Claim::Reserved { .. } => Phase::Reserved,
            Claim::Occupied { .. } => Phase::Occupied,
        }
    }

    /// Current holding, absent while free.
    pub const fn holding(&self) -> Option<&Holding> {
        match &self.claim {
            Claim::Free => None,
            Claim::Reserved { holding, .. } | Claim::Occupied { holding, .. } => Some(holding),
        }
    }

    /// Generation handed to the most recent reservation (0 before the first).
    pub const fn last_generation(&self) -> u64 {
        self.last_generation
    }

    /// Allocate the generation for a reservation about to be accepted.
    pub(crate) fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    /// Free → Reserved. Caller must have checked the phase.
    pub(crate) fn reserve(&mut self, holding: Holding, onset_at: Instant, timer: TimerHandle) {
        debug_assert_eq!(self.phase(), Phase::Free);
        self.claim = Claim::Reserved {
            holding,
            onset_at,
            timer,
        };
    }

    /// Reserved → Occupied, only for the reservation tagged `generation`.
    ///
    /// The onset timer's own handle is dropped, not cancelled: it is the
    /// task calling this. `expiry` builds the next timer for the deadline.
    /// A deadline the clock cannot represent is measured from `onset_at`
    /// instead, and failing that the occupancy expires at once.
    pub(crate) fn occupy(
        &mut self,
        generation: u64,
        now: Instant,
        expiry: impl FnOnce(Instant) -> TimerHandle,
    ) -> Option<Holding> {
        match &self.claim {
            Claim::Reserved { holding, .. } if holding.generation == generation => {}
            _ => return None,
        }
        let Claim::Reserved {
            holding, onset_at, ..
        } = mem::replace(&mut self.claim, Claim::Free)
        else {
            return None;
        };
        let occupied_until = now
            .checked_add(holding.requested_duration)
            .or_else(|| onset_at.checked_add(holding.requested_duration))
            .unwrap_or(now);
        let timer = expiry(occupied_until);
        self.claim = Claim::Occupied {
            holding: holding.clone(),
            occupied_until,
            timer,
        };
        Some(holding)
    }

    /// Occupied → Free, only for the occupancy tagged `generation`.
    pub(crate) fn expire(&mut self, generation: u64) -> Option<Holding> {
        match &self.claim {
            Claim::Occupied { holding, .. } if holding.generation == generation => {}
            _ => return None,
        }
        match mem::replace(&mut self.claim, Claim::Free) {
            Claim::Occupied { holding, .. } => Some(holding),
            _ => None,
        }
    }

    /// Any → Free, cancelling the pending timer. Returns what was released.
    pub(crate) fn release(&mut self) -> Option<(Phase, Holding)> {
        let phase = self.phase();
        match mem::replace(&mut self.claim, Claim::Free) {
            Claim::Free => None,
            Claim::Reserved { holding, timer, .. } | Claim::Occupied { holding, timer, .. } => {
                timer.cancel();
                Some((phase, holding))
            }
        }
    }

    /// Drop the claim without notifying anyone, cancelling its timer.
    pub(crate) fn clear(&mut self) {
        let _ = self.release();
    }

    /// Project the state for rendering at `now`.
    pub fn view(&self, now: Instant) -> StatusView {
        match &self.claim {
            Claim::Free => StatusView::Free,
            Claim::Reserved {
                holding, onset_at, ..
            } => StatusView::Reserved {
                holder: holding.holder.clone(),
                duration_minutes: floor_minutes(holding.requested_duration),
                minutes_until_onset: ceil_minutes(onset_at.saturating_duration_since(now)),
            },
            Claim::Occupied {
                holding,
                occupied_until,
                ..
            } => {
                if *occupied_until <= now {
                    // Expiry timer is due but has not taken the lock yet.
                    return StatusView::Free;
                }
                StatusView::Occupied {
                    holder: holding.holder.clone(),
                    minutes_remaining: floor_minutes(*occupied_until - now),
                }
            }
        }
    }

    /// Field-level snapshot used for invariant checks and diagnostics.
    pub fn snapshot(&self) -> StateSnapshot {
        let (onset_at, occupied_until, timer_pending) = match &self.claim {
            Claim::Free => (None, None, false),
            Claim::Reserved { onset_at, .. } => (Some(*onset_at), None, true),
            Claim::Occupied { occupied_until, .. } => (None, Some(*occupied_until), true),
        };
        let holding = self.holding();
        StateSnapshot {
            phase: self.phase(),
            holder: holding.map(|h| h.holder.clone()),
            notify_target: holding.map(|h| h.notify_target.clone()),
            requested_duration: holding.map(|h| h.requested_duration),
            generation: holding.map(|h| h.generation),
            onset_at,
            occupied_until,
            timer_pending,
        }
    }
}

/// Flat copy of every field of a [`ResourceState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// Current phase.
    pub phase: Phase,
    /// Holder, present iff not free.
    pub holder: Option<UserId>,
    /// Notify target, present iff not free.
    pub notify_target: Option<NotifyTarget>,
    /// Requested occupancy length, present iff not free.
    pub requested_duration: Option<Duration>,
    /// Generation of the live reservation, present iff not free.
    pub generation: Option<u64>,
    /// When occupancy is due to begin, present iff reserved.
    pub onset_at: Option<Instant>,
    /// When occupancy auto-expires, present iff occupied.
    pub occupied_until: Option<Instant>,
    /// Whether a transition timer is pending.
    pub timer_pending: bool,
}

impl StateSnapshot {
    /// Check the cross-field invariants between phase, holder, deadline and timer.
    pub const fn invariants_hold(&self) -> bool {
        let free = matches!(self.phase, Phase::Free);
        let occupied = matches!(self.phase, Phase::Occupied);
        free == self.holder.is_none()
            && free == self.notify_target.is_none()
            && free == self.generation.is_none()
            && free == !self.timer_pending
            && occupied == self.occupied_until.is_some()
            && matches!(self.phase, Phase::Reserved) == self.onset_at.is_some()
    }
}

/// What a query reports about a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum StatusView {
    /// Nobody holds the resource.
    Free,
    /// Claimed, occupancy has not started.
    Reserved {
        /// Reserving user.
        holder: UserId,
        /// Requested occupancy length in minutes.
        duration_minutes: u64,
        /// Minutes until occupancy begins, rounded up.
        minutes_until_onset: u64,
    },
    /// Actively held.
    Occupied {
        /// Occupying user.
        holder: UserId,
        /// Whole minutes left, rounded down.
        minutes_remaining: u64,
    },
}

impl StatusView {
    /// Phase this view reports.
    pub const fn phase(&self) -> Phase {
        match self {
            Self::Free => Phase::Free,
            Self::Reserved { .. } => Phase::Reserved,
            Self::Occupied { .. } => Phase::Occupied,
        }
    }
}

impl fmt::Display for StatusView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Free => write!(f, "✅ The bathroom is free"),
            Self::Reserved {
                holder,
                minutes_until_onset,
                ..
            } => write!(
                f,
                "⏳ Reserved by {holder}, occupied in about {minutes_until_onset} minutes"
            ),
            Self::Occupied {
                holder,
                minutes_remaining,
            } => write!(
                f,
                "🛁 Occupied by {holder}\n⏳ About {minutes_remaining} minutes remaining"
            ),
        }
    }
}
