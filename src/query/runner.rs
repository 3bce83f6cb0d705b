//! Listing execution.
//!
//! Each listing prints a banner, submits its query, streams the rows into
//! the output sink and closes the cursor. Errors are not caught here; they
//! propagate to the caller, and an abandoned cursor is released on drop.

use std::io::Write;

use tracing::{debug, info};

use super::templates::{QueryKind, QueryTemplates};
use crate::error::Result;
use crate::store::{Row, TripleStoreClient};

/// Minimum width of the dashed rule around a banner.
const MIN_RULE_WIDTH: usize = 32;

/// Runs the listings against a connection and writes human-readable output.
pub struct QueryRunner<W: Write> {
    templates: QueryTemplates,
    out: W,
}

impl<W: Write> QueryRunner<W> {
    /// Creates a runner writing to `out`.
    pub fn new(templates: QueryTemplates, out: W) -> Self {
        Self { templates, out }
    }

    /// Lists every activity with its start date, end date and content string.
    pub async fn list_activities(&mut self, client: &dyn TripleStoreClient) -> Result<usize> {
        self.run_listing(client, QueryKind::Activities).await
    }

    /// Lists the distinct content strings of observations.
    pub async fn list_observation_types(&mut self, client: &dyn TripleStoreClient) -> Result<usize> {
        self.run_listing(client, QueryKind::ObservationTypes).await
    }

    /// Lists the distinct content strings of observations inside the date range.
    pub async fn list_observations_in_range(
        &mut self,
        client: &dyn TripleStoreClient,
    ) -> Result<usize> {
        self.run_listing(client, QueryKind::ObservationsInRange).await
    }

    /// Runs all three listings in order, stopping at the first error.
    pub async fn run_all(&mut self, client: &dyn TripleStoreClient) -> Result<()> {
        self.list_activities(client).await?;
        self.list_observation_types(client).await?;
        self.list_observations_in_range(client).await?;
        Ok(())
    }

    /// Consumes the runner, returning the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Runs one listing and returns the number of rows printed.
    async fn run_listing(&mut self, client: &dyn TripleStoreClient, kind: QueryKind) -> Result<usize> {
        self.write_banner(kind.title())?;

        let query = self.templates.render(kind);
        debug!(listing = kind.name(), "Submitting query:\n{}", query);

        let mut rows = client.select(&query).await?;
        let mut count = 0;
        while let Some(row) = rows.next_row().await {
            let row = row?;
            match kind {
                QueryKind::Activities => write_activity(&mut self.out, &row)?,
                QueryKind::ObservationTypes | QueryKind::ObservationsInRange => {
                    write_content(&mut self.out, &row)?
                }
            }
            count += 1;
        }
        rows.close();
        self.out.flush()?;

        info!(listing = kind.name(), rows = count, "Listing complete");
        Ok(count)
    }

    fn write_banner(&mut self, title: &str) -> Result<()> {
        let rule = "-".repeat(MIN_RULE_WIDTH.max(title.len() + 1));
        writeln!(self.out, "\n{rule}\n ")?;
        writeln!(self.out, "{title} ")?;
        writeln!(self.out, "\n{rule}\n ")?;
        Ok(())
    }
}

/// Prints one activity: its short name, then one indented line per value.
fn write_activity<W: Write>(out: &mut W, row: &Row) -> Result<()> {
    let activity = row.require_iri("a")?;
    let name = activity.local_name().unwrap_or_default();
    writeln!(
        out,
        "{}\n\t has start date {}\n\t has end date {}\n\t has content string  {}",
        name,
        row.require("sd")?,
        row.require("ed")?,
        row.require("c")?
    )?;
    Ok(())
}

/// Prints the content string of one observation row.
fn write_content<W: Write>(out: &mut W, row: &Row) -> Result<()> {
    writeln!(out, "{}", row.require("c")?)?;
    Ok(())
}
