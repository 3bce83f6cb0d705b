//! Query templates and listing execution for activity-query.
//!
//! This module isolates the SPARQL text and the row formatting from the
//! connection lifecycle handled by the entry point.

pub mod runner;
pub mod templates;

pub use runner::QueryRunner;
pub use templates::{QueryKind, QueryTemplates};
