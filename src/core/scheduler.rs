//! Resource scheduler: reservation, delayed onset, occupancy and expiry.
//!
//! All state lives behind one `parking_lot::Mutex`. Command handlers and
//! timer callbacks take it for the duration of a transition, never across an
//! `.await`. Notices and audit records are emitted after the lock is dropped.
//!
//! Each accepted reservation gets a fresh generation number. Timers carry the
//! generation they were started for and only act when it is still the live
//! one, so a timer that escaped cancellation cannot touch a later reservation.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::core::audit::{build_transition_event, AuditSink};
use crate::core::notify::{Notice, NotificationSink};
use crate::core::spawn::{Spawn, TimerHandle};
use crate::core::state::{Holding, Phase, ResourceState, StateSnapshot, StatusView};
use crate::core::SchedulerError;
use crate::util::serde::{NotifyTarget, ResourceId, UserId};

/// Timing rules for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleLimits {
    /// Grace period between acceptance and occupancy.
    pub onset_delay: Duration,
    /// Occupancy lengths a user may choose, in minutes.
    pub allowed_minutes: Vec<u32>,
}

impl Default for ScheduleLimits {
    fn default() -> Self {
        Self {
            onset_delay: Duration::from_secs(10 * 60),
            allowed_minutes: vec![15, 30, 45, 60],
        }
    }
}

impl ScheduleLimits {
    /// Map a requested minute count onto an allowed duration.
    pub fn validate_minutes(&self, minutes: i64) -> Result<Duration, SchedulerError> {
        u32::try_from(minutes)
            .ok()
            .filter(|m| *m > 0 && self.allowed_minutes.contains(m))
            .map(|m| Duration::from_secs(u64::from(m) * 60))
            .ok_or(SchedulerError::InvalidDuration(minutes))
    }
}

/// An accepted reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Reserved resource.
    pub resource: ResourceId,
    /// Generation tagging this reservation's timers.
    pub generation: u64,
    /// Reserving user.
    pub holder: UserId,
    /// Occupancy length.
    pub duration: Duration,
    /// Time until occupancy begins.
    pub onset_delay: Duration,
}

/// Result of a release request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseOutcome {
    /// The resource was held and is now free.
    Released {
        /// Who held it.
        previous_holder: UserId,
        /// Phase it was released from.
        previous_phase: Phase,
        /// Generation of the released reservation.
        generation: u64,
    },
    /// Nothing was held.
    AlreadyFree,
}

struct Inner<N, S> {
    resource: ResourceId,
    limits: ScheduleLimits,
    state: Mutex<ResourceState>,
    sink: N,
    spawner: S,
    audit: Mutex<Option<Box<dyn AuditSink>>>,
}

/// Owns the state of one resource and its transition timers.
///
/// Cloning yields another handle to the same resource. Once every handle is
/// dropped the pending timer is cancelled and in-flight callbacks become no-ops.
pub struct ResourceScheduler<N, S>
where
    N: NotificationSink,
    S: Spawn,
{
    inner: Arc<Inner<N, S>>,
}

impl<N, S> Clone for ResourceScheduler<N, S>
where
    N: NotificationSink,
    S: Spawn,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<N, S> ResourceScheduler<N, S>
where
    N: NotificationSink,
    S: Spawn,
{
    /// Create a scheduler for a free resource.
    pub fn new(resource: ResourceId, limits: ScheduleLimits, sink: N, spawner: S) -> Self {
        Self {
            inner: Arc::new(Inner {
                resource,
                limits,
                state: Mutex::new(ResourceState::new()),
                sink,
                spawner,
                audit: Mutex::new(None),
            }),
        }
    }

    /// Attach an audit sink.
    #[must_use]
    pub fn with_audit(self, audit: Box<dyn AuditSink>) -> Self {
        *self.inner.audit.lock() = Some(audit);
        self
    }

    /// Resource this scheduler owns.
    pub fn resource(&self) -> &ResourceId {
        &self.inner.resource
    }

    /// Timing rules in force.
    pub fn limits(&self) -> &ScheduleLimits {
        &self.inner.limits
    }

    /// Claim a free resource for `minutes` of occupancy after the onset delay.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::ResourceBusy`] when the resource is reserved or
    /// occupied, [`SchedulerError::InvalidDuration`] when `minutes` is not in
    /// the allow-list, [`SchedulerError::InvalidConfig`] when the limits put
    /// a deadline past what the clock can represent. None of them change
    /// state.
    pub fn reserve(
        &self,
        user: UserId,
        minutes: i64,
        target: NotifyTarget,
    ) -> Result<Reservation, SchedulerError> {
        let inner = &self.inner;
        let mut state = inner.state.lock();

        let phase = state.phase();
        if phase != Phase::Free {
            drop(state);
            tracing::warn!(resource = %inner.resource, %user, %phase, "reservation rejected: resource busy");
            inner.deliver(
                &target,
                Notice::Busy {
                    resource: inner.resource.clone(),
                    phase,
                },
            );
            return Err(SchedulerError::ResourceBusy {
                resource: inner.resource.clone(),
                phase,
            });
        }

        let duration = match inner.limits.validate_minutes(minutes) {
            Ok(d) => d,
            Err(e) => {
                drop(state);
                tracing::warn!(resource = %inner.resource, %user, minutes, "reservation rejected: invalid duration");
                return Err(e);
            }
        };

        let onset_delay = inner.limits.onset_delay;
        let Some(onset_at) = Instant::now()
            .checked_add(onset_delay)
            .filter(|at| at.checked_add(duration).is_some())
        else {
            drop(state);
            tracing::error!(
                resource = %inner.resource,
                %user,
                onset_delay_secs = onset_delay.as_secs(),
                duration_secs = duration.as_secs(),
                "reservation rejected: deadline out of range"
            );
            return Err(SchedulerError::InvalidConfig(format!(
                "onset delay of {}s plus {} minutes is out of range",
                onset_delay.as_secs(),
                duration.as_secs() / 60
            )));
        };

        let generation = state.next_generation();
        let timer = inner.schedule_onset(generation, onset_at);
        state.reserve(
            Holding {
                holder: user.clone(),
                notify_target: target.clone(),
                requested_duration: duration,
                generation,
            },
            onset_at,
            timer,
        );
        drop(state);

        tracing::info!(
            resource = %inner.resource,
            generation,
            holder = %user,
            onset_delay_secs = onset_delay.as_secs(),
            duration_secs = duration.as_secs(),
            "reservation accepted"
        );
        inner.record(generation, &user, "reserve", Some(format!("duration_secs={}", duration.as_secs())));
        inner.deliver(
            &target,
            Notice::Accepted {
                resource: inner.resource.clone(),
                holder: user.clone(),
                onset_in: onset_delay,
                duration,
            },
        );

        Ok(Reservation {
            resource: inner.resource.clone(),
            generation,
            holder: user,
            duration,
            onset_delay,
        })
    }

    /// Free the resource, cancelling whichever timer is pending.
    ///
    /// Any user may release. The outcome notice goes to `reply_to`; the
    /// holder's own target is told as well when it differs.
    pub fn release(&self, user: UserId, reply_to: NotifyTarget) -> ReleaseOutcome {
        let inner = &self.inner;
        let released = inner.state.lock().release();

        let Some((previous_phase, holding)) = released else {
            tracing::info!(resource = %inner.resource, %user, "release ignored: already free");
            inner.deliver(
                &reply_to,
                Notice::AlreadyFree {
                    resource: inner.resource.clone(),
                },
            );
            return ReleaseOutcome::AlreadyFree;
        };

        tracing::info!(
            resource = %inner.resource,
            generation = holding.generation,
            holder = %holding.holder,
            released_by = %user,
            phase = %previous_phase,
            "released manually"
        );
        inner.record(
            holding.generation,
            &holding.holder,
            "release",
            Some(format!("released_by={user} phase={previous_phase}")),
        );
        let notice = Notice::Released {
            resource: inner.resource.clone(),
            released_by: user,
            previous_holder: holding.holder.clone(),
        };
        if holding.notify_target != reply_to {
            inner.deliver(&holding.notify_target, notice.clone());
        }
        inner.deliver(&reply_to, notice);

        ReleaseOutcome::Released {
            previous_holder: holding.holder,
            previous_phase,
            generation: holding.generation,
        }
    }

    /// Report the current status. No side effects.
    pub fn query(&self) -> StatusView {
        self.inner.state.lock().view(Instant::now())
    }

    /// Field-level copy of the current state.
    pub fn snapshot(&self) -> StateSnapshot {
        self.inner.state.lock().snapshot()
    }

    /// Drop any claim and cancel its timer without notifying. For teardown.
    pub fn shutdown(&self) {
        self.inner.state.lock().clear();
        tracing::debug!(resource = %self.inner.resource, "scheduler shut down");
    }
}

impl<N, S> Inner<N, S>
where
    N: NotificationSink,
    S: Spawn,
{
    fn schedule_onset(self: &Arc<Self>, generation: u64, at: Instant) -> TimerHandle {
        let weak: Weak<Self> = Arc::downgrade(self);
        self.spawner.spawn(async move {
            tokio::time::sleep_until(at).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire_onset(generation);
            }
        })
    }

    fn schedule_expiry(self: &Arc<Self>, generation: u64, at: Instant) -> TimerHandle {
        let weak: Weak<Self> = Arc::downgrade(self);
        self.spawner.spawn(async move {
            tokio::time::sleep_until(at).await;
            if let Some(inner) = weak.upgrade() {
                inner.fire_expiry(generation);
            }
        })
    }

    fn fire_onset(self: &Arc<Self>, generation: u64) {
        let now = Instant::now();
        let started = self
            .state
            .lock()
            .occupy(generation, now, |until| self.schedule_expiry(generation, until));

        let Some(holding) = started else {
            tracing::debug!(resource = %self.resource, generation, "stale onset timer ignored");
            return;
        };

        tracing::info!(
            resource = %self.resource,
            generation,
            holder = %holding.holder,
            "occupancy began"
        );
        self.record(generation, &holding.holder, "onset", None);
        self.deliver(
            &holding.notify_target,
            Notice::OccupancyStarted {
                resource: self.resource.clone(),
                holder: holding.holder.clone(),
                duration: holding.requested_duration,
            },
        );
    }

    fn fire_expiry(&self, generation: u64) {
        let Some(holding) = self.state.lock().expire(generation) else {
            tracing::debug!(resource = %self.resource, generation, "stale expiry timer ignored");
            return;
        };

        tracing::info!(
            resource = %self.resource,
            generation,
            holder = %holding.holder,
            "occupancy ended"
        );
        self.record(generation, &holding.holder, "expire", None);
        self.deliver(
            &holding.notify_target,
            Notice::OccupancyEnded {
                resource: self.resource.clone(),
                holder: holding.holder,
            },
        );
    }

    fn deliver(&self, target: &NotifyTarget, notice: Notice) {
        if let Err(e) = self.sink.notify(target, notice) {
            tracing::error!(resource = %self.resource, %target, "failed to deliver notice: {}", e);
        }
    }

    fn record(&self, generation: u64, holder: &UserId, action: &str, payload: Option<String>) {
        if let Some(sink) = self.audit.lock().as_mut() {
            sink.record(build_transition_event(
                self.resource.as_str(),
                generation,
                holder.as_str(),
                action,
                payload,
            ));
        }
    }
}

impl<N, S> Drop for Inner<N, S> {
    fn drop(&mut self) {
        self.state.get_mut().clear();
    }
}
