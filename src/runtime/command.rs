//! Chat command glue: turn callback payloads into scheduler calls.
//!
//! Rendering (keyboards, markup) stays with the front-end; `Reply` only says
//! what to show.

use crate::core::{
    NotificationSink, ReleaseOutcome, ResourceScheduler, SchedulerError, Spawn, StatusView,
};
use crate::util::serde::{NotifyTarget, UserId};

const CHOOSE_PREFIX: &str = "time_";

/// A user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Any plain message: show the main menu.
    Start,
    /// Ask to reserve; the duration chooser comes next.
    Occupy,
    /// Reserve for the given number of minutes.
    Choose(i64),
    /// Release the resource.
    Free,
    /// Report status.
    Status,
}

impl Command {
    /// Parse callback data (`occupy`, `time_<minutes>`, `free`, `status`).
    /// Anything else is treated as [`Command::Start`].
    ///
    /// # Errors
    ///
    /// [`SchedulerError::InvalidDuration`] for a `time_` payload that is not
    /// an integer.
    pub fn parse(data: &str) -> Result<Self, SchedulerError> {
        let data = data.trim();
        if let Some(raw) = data.strip_prefix(CHOOSE_PREFIX) {
            return raw
                .parse::<i64>()
                .map(Self::Choose)
                .map_err(|_| SchedulerError::InvalidDuration(0));
        }
        Ok(match data {
            "occupy" => Self::Occupy,
            "free" => Self::Free,
            "status" => Self::Status,
            _ => Self::Start,
        })
    }

    /// Callback payload that parses back into this command.
    pub fn callback_data(self) -> String {
        match self {
            Self::Start => "start".into(),
            Self::Occupy => "occupy".into(),
            Self::Choose(minutes) => format!("{CHOOSE_PREFIX}{minutes}"),
            Self::Free => "free".into(),
            Self::Status => "status".into(),
        }
    }
}

/// What the front-end should show in response to a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Show the main menu.
    Menu,
    /// Offer these durations, in minutes.
    ChooseDuration(Vec<u32>),
    /// Show a status report.
    Status(StatusView),
    /// The outcome already went out through the notification sink.
    Notified,
    /// Show an error.
    Error(String),
}

impl Reply {
    /// Default text for the reply, `None` when nothing needs rendering.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Menu => Some("🚿 Bathroom control".into()),
            Self::ChooseDuration(_) => Some("⏰ Choose a duration:".into()),
            Self::Status(view) => Some(view.to_string()),
            Self::Notified => None,
            Self::Error(msg) => Some(format!("❌ {msg}")),
        }
    }
}

/// Run `command` for `user`, routing notices to `target`.
pub fn dispatch<N, S>(
    scheduler: &ResourceScheduler<N, S>,
    command: Command,
    user: UserId,
    target: NotifyTarget,
) -> Reply
where
    N: NotificationSink,
    S: Spawn,
{
    match command {
        Command::Start => Reply::Menu,
        Command::Status => Reply::Status(scheduler.query()),
        Command::Occupy => {
            let view = scheduler.query();
            if view == StatusView::Free {
                Reply::ChooseDuration(scheduler.limits().allowed_minutes.clone())
            } else {
                Reply::Error(
                    SchedulerError::ResourceBusy {
                        resource: scheduler.resource().clone(),
                        phase: view.phase(),
                    }
                    .to_string(),
                )
            }
        }
        Command::Choose(minutes) => match scheduler.reserve(user, minutes, target) {
            Ok(_) | Err(SchedulerError::ResourceBusy { .. }) => Reply::Notified,
            Err(e) => Reply::Error(e.to_string()),
        },
        Command::Free => match scheduler.release(user, target) {
            ReleaseOutcome::Released { .. } | ReleaseOutcome::AlreadyFree => Reply::Notified,
        },
    }
}
