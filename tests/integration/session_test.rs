//! Session lifecycle tests: connect, run all listings, close.

use activity_query::app;
use activity_query::error::ActivityQueryError;
use activity_query::query::QueryTemplates;
use activity_query::store::{MemoryTripleStore, StoreBackend, TripleStoreClient};
use std::path::PathBuf;

use super::fixture_path;

#[tokio::test]
async fn test_memory_session_prints_all_sections() {
    let backend = StoreBackend::Memory(fixture_path());
    let out = app::run(&backend, QueryTemplates::default(), Vec::new())
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    let first = text.find("# Listing all activities").unwrap();
    let second = text.find("# Listing all Observation Types").unwrap();
    let third = text
        .find("# Listing all Observation within specific date range")
        .unwrap();
    assert!(first < second && second < third);

    assert!(text[first..second].contains("Act_1"));
    assert!(text[first..second].contains("\"reading lamp on\""));
    assert!(text[third..].contains("\"kettle on\""));
    assert!(!text[third..].contains("\"tv on\""));
}

#[test]
fn test_missing_store_file_fails_before_any_output() {
    let backend = StoreBackend::Memory(PathBuf::from("/nonexistent/activity.ttl"));
    let mut out = Vec::new();

    let err = tokio_test::block_on(app::run(&backend, QueryTemplates::default(), &mut out))
        .unwrap_err();

    assert!(matches!(err, ActivityQueryError::Connection(_)));
    assert_eq!(err.category(), "Connection Error");
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_injected_connector() {
    let turtle = std::fs::read_to_string(fixture_path()).unwrap();
    let out = app::run_with(
        || async move {
            let store = MemoryTripleStore::from_turtle(&turtle)?;
            Ok(Box::new(store) as Box<dyn TripleStoreClient>)
        },
        QueryTemplates::default(),
        Vec::new(),
    )
    .await
    .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("\"door open\"").count(), 2);
}
