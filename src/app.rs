//! Session lifecycle: connect, run the listings, close.
//!
//! The connection is opened once and closed exactly once, whether the
//! listings succeed or fail. A failed connect runs nothing and closes
//! nothing.

use std::future::Future;
use std::io::Write;

use tracing::{info, warn};

use crate::error::Result;
use crate::query::{QueryRunner, QueryTemplates};
use crate::store::{self, StoreBackend, TripleStoreClient};

/// Connects to `backend`, runs every listing and closes the connection.
///
/// Returns the output sink on success.
pub async fn run<W: Write>(backend: &StoreBackend, templates: QueryTemplates, out: W) -> Result<W> {
    run_with(|| store::connect(backend), templates, out).await
}

/// Like [`run`], but opens the connection with the given connector.
///
/// This is the seam tests use to inject an in-memory or failing store.
pub async fn run_with<F, Fut, W>(connect: F, templates: QueryTemplates, out: W) -> Result<W>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Box<dyn TripleStoreClient>>>,
    W: Write,
{
    let client = connect().await?;
    info!("Connected to {}", client.describe());

    let mut runner = QueryRunner::new(templates, out);
    run_on_connection(client.as_ref(), &mut runner).await?;
    Ok(runner.into_inner())
}

/// Runs all listings on an open connection, then closes it.
///
/// A listing error wins over a close error; the close error is logged.
pub async fn run_on_connection<W: Write>(
    client: &dyn TripleStoreClient,
    runner: &mut QueryRunner<W>,
) -> Result<()> {
    let outcome = runner.run_all(client).await;
    let closed = client.close().await;
    info!("Connection to {} closed", client.describe());

    match (outcome, closed) {
        (Err(e), Err(close_err)) => {
            warn!("Failed to close connection after error: {}", close_err);
            Err(e)
        }
        (Err(e), Ok(())) => Err(e),
        (Ok(()), closed) => closed,
    }
}
