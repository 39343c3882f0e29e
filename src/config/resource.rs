//! Resource and scheduler configuration structures.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::core::{AppResult, ScheduleLimits};

/// Environment variable naming the single resource built by [`SchedulerConfig::from_env`].
pub const ENV_RESOURCE: &str = "BATHROOM_RESOURCE";
/// Environment variable overriding the onset delay, in seconds.
pub const ENV_ONSET_DELAY_SECS: &str = "BATHROOM_ONSET_DELAY_SECS";
/// Environment variable overriding the duration allow-list (comma-separated minutes).
pub const ENV_DURATIONS: &str = "BATHROOM_DURATIONS";

/// Longest accepted onset delay, in seconds (one day).
pub const MAX_ONSET_DELAY_SECS: u64 = 24 * 60 * 60;
/// Longest accepted occupancy, in minutes (one day).
pub const MAX_DURATION_MINUTES: u32 = 24 * 60;

const DEFAULT_RESOURCE: &str = "bathroom";

const fn default_onset_delay_secs() -> u64 {
    10 * 60
}

fn default_allowed_durations() -> Vec<u32> {
    vec![15, 30, 45, 60]
}

/// Per-resource configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Delay between acceptance and occupancy, in seconds.
    #[serde(default = "default_onset_delay_secs")]
    pub onset_delay_secs: u64,
    /// Occupancy lengths a user may choose, in minutes.
    #[serde(default = "default_allowed_durations")]
    pub allowed_durations_minutes: Vec<u32>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            onset_delay_secs: default_onset_delay_secs(),
            allowed_durations_minutes: default_allowed_durations(),
        }
    }
}

/// Root scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Map of resource name to configuration.
    pub resources: HashMap<String, ResourceConfig>,
}

impl ResourceConfig {
    /// Validate resource configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.onset_delay_secs == 0 {
            return Err("onset_delay_secs must be greater than 0".into());
        }
        if self.onset_delay_secs > MAX_ONSET_DELAY_SECS {
            return Err(format!(
                "onset_delay_secs must be at most {MAX_ONSET_DELAY_SECS}"
            ));
        }
        if self.allowed_durations_minutes.is_empty() {
            return Err("allowed_durations_minutes must not be empty".into());
        }
        if self.allowed_durations_minutes.contains(&0) {
            return Err("allowed_durations_minutes must be greater than 0".into());
        }
        if let Some(m) = self
            .allowed_durations_minutes
            .iter()
            .find(|m| **m > MAX_DURATION_MINUTES)
        {
            return Err(format!(
                "allowed_durations_minutes entry {m} exceeds {MAX_DURATION_MINUTES}"
            ));
        }
        let unique: HashSet<_> = self.allowed_durations_minutes.iter().collect();
        if unique.len() != self.allowed_durations_minutes.len() {
            return Err("allowed_durations_minutes contains duplicates".into());
        }
        Ok(())
    }

    /// Timing rules for a scheduler built from this configuration.
    pub fn limits(&self) -> ScheduleLimits {
        ScheduleLimits {
            onset_delay: Duration::from_secs(self.onset_delay_secs),
            allowed_minutes: self.allowed_durations_minutes.clone(),
        }
    }
}

impl SchedulerConfig {
    /// Validate all resources and ensure at least one exists.
    pub fn validate(&self) -> Result<(), String> {
        if self.resources.is_empty() {
            return Err("at least one resource must be defined".into());
        }
        for (name, resource) in &self.resources {
            if name.trim().is_empty() {
                return Err("resource names must not be empty".into());
            }
            resource
                .validate()
                .map_err(|e| format!("resource `{name}` invalid: {e}"))?;
        }
        Ok(())
    }

    /// Parse scheduler configuration from a JSON string and validate.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build a single-resource configuration from the process environment,
    /// loading a `.env` file first when one exists.
    pub fn from_env() -> AppResult<Self> {
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
            .map_err(anyhow::Error::msg)
            .context("loading scheduler configuration from the environment")
    }

    /// Build a single-resource configuration from a variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let mut resource = ResourceConfig::default();

        if let Some(raw) = lookup(ENV_ONSET_DELAY_SECS) {
            resource.onset_delay_secs = raw
                .trim()
                .parse()
                .map_err(|e| format!("{ENV_ONSET_DELAY_SECS}: {e}"))?;
        }
        if let Some(raw) = lookup(ENV_DURATIONS) {
            resource.allowed_durations_minutes = raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<u32>().map_err(|e| format!("{ENV_DURATIONS}: `{s}`: {e}")))
                .collect::<Result<_, _>>()?;
        }
        let name = lookup(ENV_RESOURCE).unwrap_or_else(|| DEFAULT_RESOURCE.to_owned());

        let cfg = Self {
            resources: HashMap::from([(name, resource)]),
        };
        cfg.validate()?;
        Ok(cfg)
    }
}
