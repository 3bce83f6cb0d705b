//! End-to-end tests over the SPARQL protocol against a mock endpoint.

use activity_query::app;
use activity_query::config::EndpointConfig;
use activity_query::error::ActivityQueryError;
use activity_query::query::QueryTemplates;
use activity_query::store::StoreBackend;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REPO_PATH: &str = "/repositories/activity";
const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

fn backend_for(server: &MockServer) -> StoreBackend {
    StoreBackend::Http(EndpointConfig::new(format!("{}{}", server.uri(), REPO_PATH)))
}

async fn mount_probe_ok(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(REPO_PATH))
        .and(body_string_contains("ASK"))
        .respond_with(ResponseTemplate::new(200).set_body_string("true"))
        .mount(server)
        .await;
}

fn tsv(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .insert_header("content-type", "text/tab-separated-values; charset=utf-8")
        .set_body_string(body.to_string())
}

#[tokio::test]
async fn test_full_session_over_http() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("FILTER"))
        .respond_with(tsv("?c\n\"door open\"\n"))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("Activity"))
        .respond_with(tsv(&format!(
            "?a\t?sd\t?ed\t?c\n\
             <http://www.semanticweb.org/user/ontologies/2020/1/activity#Act_1>\t\
             \"2020-01-01T00:00:00\"^^<{XSD_DATE_TIME}>\t\
             \"2020-01-02T00:00:00\"^^<{XSD_DATE_TIME}>\t\
             \"reading lamp on\"\n"
        )))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("Observation"))
        .respond_with(tsv("?c\n\"door open\"\n\"tv on\"\n"))
        .with_priority(3)
        .expect(1)
        .mount(&server)
        .await;

    let out = app::run(&backend_for(&server), QueryTemplates::default(), Vec::new())
        .await
        .unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Act_1\n\t has start date \"2020-01-01T00:00:00\"^^<"));
    assert!(text.contains("\t has content string  \"reading lamp on\"\n"));
    assert!(text.contains("\"tv on\"\n"));
    assert_eq!(text.matches("\"door open\"").count(), 2);
}

#[tokio::test]
async fn test_query_failure_stops_session() {
    let server = MockServer::start().await;
    mount_probe_ok(&server).await;

    Mock::given(method("POST"))
        .and(body_string_contains("Activity"))
        .respond_with(tsv("?a\t?sd\t?ed\t?c\n"))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(body_string_contains("SELECT"))
        .respond_with(ResponseTemplate::new(500).set_body_string("evaluation failed"))
        .with_priority(2)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let err = app::run(&backend_for(&server), QueryTemplates::default(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, ActivityQueryError::Query(_)));
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("# Listing all Observation Types"));
    assert!(!text.contains("specific date range"));
}

#[tokio::test]
async fn test_unknown_repository_runs_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let mut out = Vec::new();
    let err = app::run(&backend_for(&server), QueryTemplates::default(), &mut out)
        .await
        .unwrap_err();

    assert!(matches!(err, ActivityQueryError::Connection(_)));
    assert!(out.is_empty());
}
