//! Tests against a running SPARQL repository.
//!
//! Set SPARQL_ENDPOINT_URL (e.g. http://localhost:7200/repositories/activity)
//! to run them; they are skipped otherwise.

use activity_query::config::EndpointConfig;
use activity_query::query::{QueryKind, QueryTemplates};
use activity_query::store::{HttpTripleStore, TripleStoreClient};

/// Helper to get the test endpoint from the environment.
fn get_test_endpoint() -> Option<EndpointConfig> {
    let url = std::env::var("SPARQL_ENDPOINT_URL").ok()?;
    let mut endpoint = EndpointConfig::new(url);
    endpoint.apply_env_defaults();
    Some(endpoint)
}

#[tokio::test]
async fn test_live_queries_evaluate() {
    let Some(endpoint) = get_test_endpoint() else {
        eprintln!("Skipping test: SPARQL_ENDPOINT_URL not set");
        return;
    };

    let client = HttpTripleStore::connect(&endpoint).await.unwrap();
    let templates = QueryTemplates::default();

    for kind in QueryKind::ALL {
        let rows = client.select(&templates.render(kind)).await.unwrap();
        assert!(!rows.variables().is_empty(), "{}", kind.name());
        rows.collect_rows().await.unwrap();
    }

    client.close().await.unwrap();
}

#[tokio::test]
async fn test_live_select_after_close_fails() {
    let Some(endpoint) = get_test_endpoint() else {
        eprintln!("Skipping test: SPARQL_ENDPOINT_URL not set");
        return;
    };

    let client = HttpTripleStore::connect(&endpoint).await.unwrap();
    client.close().await.unwrap();
    assert!(client.select("SELECT * WHERE { ?s ?p ?o } LIMIT 1").await.is_err());
}
