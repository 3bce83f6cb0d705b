//! SPARQL query results decoding.
//!
//! Response bodies go through sparesults' async parser, so solutions are
//! decoded one at a time as the bytes arrive.

use crate::error::{ActivityQueryError, Result};
use crate::store::{Row, RowStream, Value};
use futures::stream::{self, StreamExt};
use sparesults::{
    QueryResultsFormat, QueryResultsParseError, QueryResultsParser, QuerySolution,
    TokioAsyncReaderQueryResultsParserOutput,
};
use tokio::io::AsyncRead;

/// Media type requested from SPARQL endpoints.
pub const RESULTS_MEDIA_TYPE: &str = "text/tab-separated-values";

/// Reads the header from `reader`, then returns a cursor that decodes the
/// remaining solutions on demand.
pub async fn rows_from_reader<R>(reader: R) -> Result<RowStream>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let parsed = QueryResultsParser::from_format(QueryResultsFormat::Tsv)
        .for_tokio_async_reader(reader)
        .await
        .map_err(malformed)?;

    let TokioAsyncReaderQueryResultsParserOutput::Solutions(solutions) = parsed else {
        return Err(ActivityQueryError::result(
            "Expected SELECT results, got a boolean",
        ));
    };

    let variables = solutions
        .variables()
        .iter()
        .map(|v| v.as_str().to_string())
        .collect();

    let rows = stream::unfold(solutions, |mut solutions| async move {
        let solution = solutions.next().await?;
        Some((solution.map(row_from_solution).map_err(malformed), solutions))
    });

    Ok(RowStream::new(variables, rows.boxed()))
}

fn row_from_solution(solution: QuerySolution) -> Row {
    solution
        .iter()
        .map(|(var, term)| (var.as_str().to_string(), Value::from(term)))
        .collect()
}

fn malformed(error: QueryResultsParseError) -> ActivityQueryError {
    ActivityQueryError::result(format!("Malformed query results: {error}"))
}
