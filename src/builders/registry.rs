//! Build one scheduler per configured resource.

use std::collections::HashMap;

use crate::config::{ResourceConfig, SchedulerConfig};
use crate::core::{NotificationSink, ResourceScheduler, SchedulerError, Spawn};
use crate::util::serde::ResourceId;

/// Independent schedulers keyed by resource.
pub struct ResourceRegistry<N, S>
where
    N: NotificationSink,
    S: Spawn,
{
    schedulers: HashMap<ResourceId, ResourceScheduler<N, S>>,
}

impl<N, S> ResourceRegistry<N, S>
where
    N: NotificationSink,
    S: Spawn,
{
    /// Scheduler for `id`.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::UnknownResource`] if nothing is registered under `id`.
    pub fn get(&self, id: &ResourceId) -> Result<&ResourceScheduler<N, S>, SchedulerError> {
        self.schedulers
            .get(id)
            .ok_or_else(|| SchedulerError::UnknownResource(id.clone()))
    }

    /// Registered resource ids, sorted.
    pub fn ids(&self) -> Vec<ResourceId> {
        let mut ids: Vec<_> = self.schedulers.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Number of registered resources.
    pub fn len(&self) -> usize {
        self.schedulers.len()
    }

    /// Whether no resource is registered.
    pub fn is_empty(&self) -> bool {
        self.schedulers.is_empty()
    }

    /// Cancel every pending timer without notifying.
    pub fn shutdown(&self) {
        for scheduler in self.schedulers.values() {
            scheduler.shutdown();
        }
    }
}

/// Build schedulers from configuration using the provided sink factory.
pub fn build_registry<N, S, FN>(
    cfg: &SchedulerConfig,
    mut sink_factory: FN,
    spawner: S,
) -> Result<ResourceRegistry<N, S>, SchedulerError>
where
    N: NotificationSink,
    S: Spawn,
    FN: FnMut(&ResourceId, &ResourceConfig) -> Result<N, SchedulerError>,
{
    cfg.validate().map_err(SchedulerError::InvalidConfig)?;

    let mut schedulers = HashMap::new();
    for (name, resource_cfg) in &cfg.resources {
        let id = ResourceId::new(name.as_str());
        let sink = sink_factory(&id, resource_cfg)?;
        let scheduler = ResourceScheduler::new(id.clone(), resource_cfg.limits(), sink, spawner.clone());
        tracing::debug!(resource = %id, onset_delay_secs = resource_cfg.onset_delay_secs, "scheduler built");
        schedulers.insert(id, scheduler);
    }

    Ok(ResourceRegistry { schedulers })
}
