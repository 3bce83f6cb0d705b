//! Lazy, forward-only result cursor.

use crate::error::Result;
use crate::store::Row;
use futures::stream::{self, BoxStream, StreamExt};
use tracing::debug;

/// A cursor over the rows of one SELECT query.
///
/// Rows are pulled one at a time from the backend. Once closed the cursor
/// yields nothing more and cannot be resumed. Closing releases the backend
/// resources behind it (for HTTP, the response body); dropping an unclosed
/// cursor releases them too.
pub struct RowStream {
    variables: Vec<String>,
    inner: Option<BoxStream<'static, Result<Row>>>,
    rows_read: usize,
}

impl RowStream {
    /// Wraps a backend row stream.
    pub fn new(variables: Vec<String>, inner: BoxStream<'static, Result<Row>>) -> Self {
        Self {
            variables,
            inner: Some(inner),
            rows_read: 0,
        }
    }

    /// Creates a cursor over rows that are already in memory.
    pub fn from_rows(variables: Vec<String>, rows: Vec<Row>) -> Self {
        Self::new(variables, stream::iter(rows.into_iter().map(Ok)).boxed())
    }

    /// Creates a cursor with no rows.
    pub fn empty(variables: Vec<String>) -> Self {
        Self::from_rows(variables, Vec::new())
    }

    /// Projected variable names, in order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of rows handed out so far.
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Returns true once the cursor has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    /// Pulls the next row. Returns `None` when exhausted or closed.
    ///
    /// An error closes the cursor.
    pub async fn next_row(&mut self) -> Option<Result<Row>> {
        let inner = self.inner.as_mut()?;
        match inner.next().await {
            Some(Ok(row)) => {
                self.rows_read += 1;
                Some(Ok(row))
            }
            Some(Err(e)) => {
                self.close();
                Some(Err(e))
            }
            None => None,
        }
    }

    /// Drains the remaining rows into a vector and closes the cursor.
    pub async fn collect_rows(mut self) -> Result<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await {
            rows.push(row?);
        }
        self.close();
        Ok(rows)
    }

    /// Closes the cursor. Idempotent.
    pub fn close(&mut self) {
        if self.inner.take().is_some() {
            debug!(rows = self.rows_read, "Closed result cursor");
        }
    }
}

impl Drop for RowStream {
    fn drop(&mut self) {
        if self.inner.is_some() {
            debug!(
                rows = self.rows_read,
                "Result cursor dropped before close, releasing"
            );
        }
    }
}

impl std::fmt::Debug for RowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream")
            .field("variables", &self.variables)
            .field("rows_read", &self.rows_read)
            .field("closed", &self.is_closed())
            .finish()
    }
}
