//! In-memory triple store backed by oxigraph.
//!
//! Evaluates SELECT queries with oxigraph's own SPARQL engine, so filters
//! such as `xsd:dateTime` comparisons behave the way a real store would.
//! Used by `--store` and by the test suite in place of a live endpoint.
//!
//! oxigraph's solution iterator is not `Send`, so evaluation runs on a
//! blocking thread and rows cross to the cursor through a bounded channel.
//! Dropping or closing the cursor stops evaluation at the next row.

use super::{Row, RowStream, TripleStoreClient, Value};
use crate::error::{ActivityQueryError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use oxigraph::io::RdfFormat;
use oxigraph::sparql::QueryResults;
use oxigraph::store::Store;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

/// Rows evaluated ahead of the cursor.
const ROW_BUFFER: usize = 64;

/// A triple store held entirely in process memory.
pub struct MemoryTripleStore {
    store: Store,
    closed: AtomicBool,
    queries_run: AtomicUsize,
}

impl MemoryTripleStore {
    /// Creates an empty store.
    pub fn new() -> Result<Self> {
        let store = Store::new()
            .map_err(|e| ActivityQueryError::connection(format!("Cannot open memory store: {e}")))?;
        Ok(Self {
            store,
            closed: AtomicBool::new(false),
            queries_run: AtomicUsize::new(0),
        })
    }

    /// Creates a store and loads the given Turtle document into it.
    pub fn from_turtle(turtle: &str) -> Result<Self> {
        let client = Self::new()?;
        client.load_turtle(turtle)?;
        Ok(client)
    }

    /// Creates a store from a Turtle file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ActivityQueryError::connection(format!(
                "Cannot read store file {}: {e}",
                path.display()
            ))
        })?;
        let client = Self::from_turtle(&content)?;
        info!(path = %path.display(), triples = client.len(), "Loaded memory store");
        Ok(client)
    }

    /// Loads a Turtle document into the default graph.
    pub fn load_turtle(&self, turtle: &str) -> Result<()> {
        self.store
            .load_from_reader(RdfFormat::Turtle, turtle.as_bytes())
            .map_err(|e| ActivityQueryError::connection(format!("Invalid Turtle data: {e}")))
    }

    /// Number of triples in the store.
    pub fn len(&self) -> usize {
        self.store.len().unwrap_or(0)
    }

    /// Returns true if the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of SELECT queries evaluated so far.
    pub fn queries_run(&self) -> usize {
        self.queries_run.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TripleStoreClient for MemoryTripleStore {
    async fn select(&self, query: &str) -> Result<RowStream> {
        if self.is_closed() {
            return Err(ActivityQueryError::connection("Memory store is closed"));
        }
        self.queries_run.fetch_add(1, Ordering::SeqCst);
        debug!("Evaluating query in memory store");

        let store = self.store.clone();
        let query = query.to_string();
        let (header_tx, header_rx) = oneshot::channel();
        let (row_tx, row_rx) = mpsc::channel(ROW_BUFFER);
        tokio::task::spawn_blocking(move || evaluate(&store, &query, header_tx, row_tx));

        let variables = header_rx
            .await
            .map_err(|_| ActivityQueryError::internal("Query evaluation stopped unexpectedly"))??;

        let rows = stream::unfold(row_rx, |mut rx| async move {
            let row = rx.recv().await?;
            Some((row, rx))
        });
        Ok(RowStream::new(variables, rows.boxed()))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory store ({} triples)", self.len())
    }
}

/// Evaluates `query` and feeds its solutions to `rows` until the receiver
/// goes away or a solution fails.
fn evaluate(
    store: &Store,
    query: &str,
    header: oneshot::Sender<Result<Vec<String>>>,
    rows: mpsc::Sender<Result<Row>>,
) {
    let solutions = match store.query(query) {
        Ok(QueryResults::Solutions(solutions)) => solutions,
        Ok(_) => {
            let _ = header.send(Err(ActivityQueryError::query("Expected a SELECT query")));
            return;
        }
        Err(e) => {
            let _ = header.send(Err(ActivityQueryError::query(e.to_string())));
            return;
        }
    };

    let variables = solutions
        .variables()
        .iter()
        .map(|v| v.as_str().to_string())
        .collect();
    if header.send(Ok(variables)).is_err() {
        return;
    }

    for solution in solutions {
        let row = solution
            .map(|solution| {
                solution
                    .iter()
                    .map(|(var, term)| (var.as_str().to_string(), Value::from(term)))
                    .collect::<Row>()
            })
            .map_err(|e| ActivityQueryError::query(e.to_string()));
        let failed = row.is_err();
        if rows.blocking_send(row).is_err() || failed {
            debug!("Memory store evaluation stopped early");
            return;
        }
    }
}
