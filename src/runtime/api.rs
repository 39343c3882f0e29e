//! API-facing response models.

use serde::{Deserialize, Serialize};

use crate::builders::ResourceRegistry;
use crate::core::{NotificationSink, SchedulerError, Spawn, StatusView};
use crate::util::serde::ResourceId;

/// Resource listing entry built from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    /// Resource identifier.
    pub name: String,
    /// Onset delay in seconds.
    pub onset_delay_secs: u64,
    /// Allowed occupancy lengths in minutes.
    pub allowed_durations_minutes: Vec<u32>,
}

/// Status response for one resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Resource identifier.
    pub resource: ResourceId,
    /// Current status.
    pub status: StatusView,
}

/// Health response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Health {
    /// Healthy flag.
    pub ok: bool,
}

/// Build resource listings from config snapshot, sorted by name.
pub fn list_resources(cfg: &crate::config::SchedulerConfig) -> Vec<ResourceSnapshot> {
    let mut out: Vec<_> = cfg
        .resources
        .iter()
        .map(|(name, resource)| ResourceSnapshot {
            name: name.clone(),
            onset_delay_secs: resource.onset_delay_secs,
            allowed_durations_minutes: resource.allowed_durations_minutes.clone(),
        })
        .collect();
    out.sort_by(|a, b| a.name.cmp(&b.name));
    out
}

/// Query one resource in a registry.
///
/// # Errors
///
/// [`SchedulerError::UnknownResource`] when `id` is not registered.
pub fn status_of<N, S>(
    registry: &ResourceRegistry<N, S>,
    id: &ResourceId,
) -> Result<StatusResponse, SchedulerError>
where
    N: NotificationSink,
    S: Spawn,
{
    let scheduler = registry.get(id)?;
    Ok(StatusResponse {
        resource: id.clone(),
        status: scheduler.query(),
    })
}

/// Return a health payload.
pub const fn health() -> Health {
    Health { ok: true }
}
