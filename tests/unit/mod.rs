//! Unit tests for individual components

mod config_test;
mod registry_test;
mod sink_test;
mod util_test;
