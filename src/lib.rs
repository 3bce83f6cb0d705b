//! activity-query - lists activities and observations from a SPARQL repository.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod store;
