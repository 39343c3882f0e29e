//! Builders to construct schedulers from configuration.

pub mod registry;

pub use registry::{build_registry, ResourceRegistry};
