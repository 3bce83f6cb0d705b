//! Triple store abstraction layer for activity-query.
//!
//! Provides a trait-based interface for SELECT evaluation, allowing a
//! remote SPARQL endpoint and an in-memory store to be used interchangeably.

mod http;
mod memory;
mod rows;
pub mod results;
mod types;

pub use http::HttpTripleStore;
pub use memory::MemoryTripleStore;
pub use rows::RowStream;
pub use types::{Literal, Row, Value, RDF_LANG_STRING, XSD_STRING};

use crate::config::EndpointConfig;
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Where the queries are evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// A remote SPARQL 1.1 protocol endpoint.
    Http(EndpointConfig),

    /// An in-process store loaded from a Turtle file.
    Memory(PathBuf),
}

impl StoreBackend {
    /// Returns a display-safe description for logs.
    pub fn display_string(&self) -> String {
        match self {
            Self::Http(endpoint) => endpoint.display_string(),
            Self::Memory(path) => format!("memory store from {}", path.display()),
        }
    }
}

/// Opens a connection to the given backend.
///
/// This is the central factory function for store connections.
pub async fn connect(backend: &StoreBackend) -> Result<Box<dyn TripleStoreClient>> {
    match backend {
        StoreBackend::Http(endpoint) => {
            let client = HttpTripleStore::connect(endpoint).await?;
            Ok(Box::new(client))
        }
        StoreBackend::Memory(path) => {
            let client = MemoryTripleStore::from_file(path)?;
            Ok(Box::new(client))
        }
    }
}

/// Trait defining the interface for triple store connections.
///
/// A client is one open connection: queries may be submitted until `close`
/// is called, after which every operation fails.
#[async_trait]
pub trait TripleStoreClient: Send + Sync {
    /// Submits a SELECT query and returns a lazy cursor over its rows.
    async fn select(&self, query: &str) -> Result<RowStream>;

    /// Closes the connection.
    async fn close(&self) -> Result<()>;

    /// Returns a display-safe description of the connection.
    fn describe(&self) -> String;
}
