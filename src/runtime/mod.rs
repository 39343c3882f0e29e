//! Runtime adapters, command glue and API surface.

pub mod api;
pub mod command;
pub mod tokio_spawner;

pub use api::{health, list_resources, status_of, Health, ResourceSnapshot, StatusResponse};
pub use command::{dispatch, Command, Reply};
pub use tokio_spawner::TokioSpawner;
