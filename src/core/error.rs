//! Error types for scheduler operations.

use thiserror::Error;

use crate::core::state::Phase;
use crate::util::serde::ResourceId;

/// Errors produced by scheduler components.
///
/// None of these are fatal: each is returned to the command interface for
/// rendering and leaves the resource state untouched.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Requested duration is zero, negative or not in the allow-list.
    #[error("invalid duration: {0} minutes")]
    InvalidDuration(i64),
    /// Resource is already reserved or occupied.
    #[error("resource `{resource}` is already reserved or occupied ({phase})")]
    ResourceBusy {
        /// Resource that rejected the reservation.
        resource: ResourceId,
        /// Phase the resource was in.
        phase: Phase,
    },
    /// No scheduler is registered for the resource.
    #[error("unknown resource: {0}")]
    UnknownResource(ResourceId),
    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Backend-specific failure with context (e.g. notice delivery).
    #[error("backend error: {0}")]
    Backend(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
