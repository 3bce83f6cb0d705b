//! Listing tests against the in-memory store.
//!
//! Exercises the three listings end to end: real query text, real
//! evaluation with typed dateTime comparison, real row formatting.

use activity_query::config::DateRangeConfig;
use activity_query::config::OntologyConfig;
use activity_query::query::{QueryRunner, QueryTemplates};
use activity_query::store::{MemoryTripleStore, TripleStoreClient};
use pretty_assertions::assert_eq;

use super::fixture_path;

fn fixture_store() -> MemoryTripleStore {
    MemoryTripleStore::from_file(&fixture_path()).unwrap()
}

/// Returns the lines printed under `title`, up to the next banner.
fn section<'a>(text: &'a str, title: &str) -> Vec<&'a str> {
    let start = text.find(title).unwrap() + title.len();
    let rest = &text[start..];
    let end = rest.find("# Listing").unwrap_or(rest.len());
    rest[..end]
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.chars().all(|c| c == '-'))
        .collect()
}

async fn run_all(client: &dyn TripleStoreClient, templates: QueryTemplates) -> String {
    let mut runner = QueryRunner::new(templates, Vec::new());
    runner.run_all(client).await.unwrap();
    String::from_utf8(runner.into_inner()).unwrap()
}

#[tokio::test]
async fn test_empty_store_prints_only_banners() {
    let client = MemoryTripleStore::new().unwrap();
    let text = run_all(&client, QueryTemplates::default()).await;

    assert!(section(&text, "# Listing all activities").is_empty());
    assert!(section(&text, "# Listing all Observation Types").is_empty());
    assert!(section(&text, "# Listing all Observation within specific date range").is_empty());
    assert_eq!(client.queries_run(), 3);
}

#[tokio::test]
async fn test_activity_listing() {
    let client = fixture_store();
    let mut runner = QueryRunner::new(QueryTemplates::default(), Vec::new());

    assert_eq!(runner.list_activities(&client).await.unwrap(), 1);

    let text = String::from_utf8(runner.into_inner()).unwrap();
    let expected = "Act_1\n\
        \t has start date \"2020-01-01T00:00:00\"^^<http://www.w3.org/2001/XMLSchema#dateTime>\n\
        \t has end date \"2020-01-02T00:00:00\"^^<http://www.w3.org/2001/XMLSchema#dateTime>\n\
        \t has content string  \"reading lamp on\"\n";
    assert!(text.ends_with(expected), "unexpected output:\n{text}");
}

#[tokio::test]
async fn test_observation_types_are_distinct() {
    let client = fixture_store();
    let text = run_all(&client, QueryTemplates::default()).await;

    let mut types = section(&text, "# Listing all Observation Types");
    types.sort_unstable();
    assert_eq!(
        types,
        vec![
            "\"door open\"",
            "\"fridge open\"",
            "\"kettle on\"",
            "\"shower running\"",
            "\"tv on\"",
            "\"window closed\"",
        ]
    );
}

#[tokio::test]
async fn test_range_listing_uses_configured_bounds() {
    let client = fixture_store();
    let text = run_all(&client, QueryTemplates::default()).await;

    let mut in_range = section(&text, "# Listing all Observation within specific date range");
    in_range.sort_unstable();
    // "shower running" ends past the upper bound, "tv on" starts after it
    assert_eq!(
        in_range,
        vec![
            "\"door open\"",
            "\"fridge open\"",
            "\"kettle on\"",
            "\"window closed\"",
        ]
    );
}

#[tokio::test]
async fn test_range_bounds_are_inclusive() {
    let client = fixture_store();
    let text = run_all(&client, QueryTemplates::default()).await;
    let in_range = section(&text, "# Listing all Observation within specific date range");

    // starts exactly on the lower bound
    assert!(in_range.contains(&"\"kettle on\""));
    // ends exactly on the upper bound
    assert!(in_range.contains(&"\"fridge open\""));
    // starts and ends exactly on the upper bound
    assert!(in_range.contains(&"\"window closed\""));
}

#[tokio::test]
async fn test_range_override_widens_listing() {
    let client = fixture_store();
    let templates = QueryTemplates::new(
        OntologyConfig::default(),
        DateRangeConfig::new("2014-05-05T18:00:00", "2014-05-05T20:00:00"),
    )
    .unwrap();

    let mut runner = QueryRunner::new(templates, Vec::new());
    let count = runner.list_observations_in_range(&client).await.unwrap();
    assert_eq!(count, 6);
}

#[tokio::test]
async fn test_other_namespace_matches_nothing() {
    let client = fixture_store();
    let templates = QueryTemplates::new(
        OntologyConfig {
            prefix: "act".to_string(),
            namespace: "http://example.org/other#".to_string(),
        },
        DateRangeConfig::default(),
    )
    .unwrap();

    let text = run_all(&client, templates).await;
    assert!(!text.contains("reading lamp on"));
    assert!(!text.contains("door open"));
}
