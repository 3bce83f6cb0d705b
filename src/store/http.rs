//! SPARQL 1.1 protocol client.
//!
//! Provides the `HttpTripleStore` struct that implements the
//! `TripleStoreClient` trait for remote repositories (GraphDB, RDF4J, Fuseki
//! and friends) using reqwest.

use super::results::{rows_from_reader, RESULTS_MEDIA_TYPE};
use super::{RowStream, TripleStoreClient};
use crate::config::EndpointConfig;
use crate::error::{ActivityQueryError, Result};
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, StatusCode};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::io::StreamReader;
use tracing::{debug, warn};
use url::Url;

/// Base delay between connection attempts (doubles each retry).
const RETRY_BASE_DELAY_MS: u64 = 500;

/// Query used to check the repository answers before any real query runs.
const PROBE_QUERY: &str = "ASK {}";

/// Accept header for the probe.
const PROBE_ACCEPT: &str = "application/sparql-results+json, text/boolean;q=0.9, */*;q=0.1";

/// Remote SPARQL endpoint client.
#[derive(Debug)]
pub struct HttpTripleStore {
    client: Client,
    url: Url,
    endpoint: EndpointConfig,
    closed: AtomicBool,
}

impl HttpTripleStore {
    /// Creates a client for the endpoint without touching the network.
    pub fn new(endpoint: &EndpointConfig) -> Result<Self> {
        let url = endpoint.parsed_url()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .build()
            .map_err(|e| {
                ActivityQueryError::connection(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            url,
            endpoint: endpoint.clone(),
            closed: AtomicBool::new(false),
        })
    }

    /// Opens a connection, probing the repository until it answers.
    ///
    /// With `connect_attempts` above 1, unreachable hosts, timeouts and 5xx
    /// answers are retried with exponential backoff. Authentication and
    /// missing-repository answers always fail immediately.
    pub async fn connect(endpoint: &EndpointConfig) -> Result<Self> {
        let store = Self::new(endpoint)?;

        let max_attempts = endpoint.connect_attempts.max(1);
        let mut delay = Duration::from_millis(RETRY_BASE_DELAY_MS);
        let mut attempt = 1;
        loop {
            debug!("Connection attempt {} of {}", attempt, max_attempts);

            match store.probe().await {
                Ok(()) => {
                    debug!("Endpoint {} is reachable", endpoint.display_string());
                    return Ok(store);
                }
                Err(failure) => {
                    if attempt < max_attempts && failure.transient {
                        warn!(
                            "Connection attempt {} failed (transient error), retrying in {:?}",
                            attempt, delay
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                        attempt += 1;
                    } else {
                        return Err(failure.error);
                    }
                }
            }
        }
    }

    /// Sends the probe query and classifies any failure.
    async fn probe(&self) -> std::result::Result<(), ProbeFailure> {
        let response = self
            .request(PROBE_QUERY, PROBE_ACCEPT)
            .send()
            .await
            .map_err(|e| ProbeFailure {
                transient: e.is_connect() || e.is_timeout(),
                error: map_request_error(&e, &self.endpoint),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        if status.is_server_error() {
            return Err(ProbeFailure {
                transient: true,
                error: ActivityQueryError::connection(format!(
                    "Endpoint {} is unavailable ({status})",
                    self.endpoint.display_string()
                )),
            });
        }

        let body = response.text().await.unwrap_or_default();
        Err(ProbeFailure {
            transient: false,
            error: map_status_error(status, &body, &self.endpoint),
        })
    }

    /// Builds a SPARQL protocol query request (form-encoded POST).
    fn request(&self, query: &str, accept: &str) -> RequestBuilder {
        let mut request = self
            .client
            .post(self.url.clone())
            .header(ACCEPT, accept)
            .form(&[("query", query)]);

        if let Some(user) = &self.endpoint.user {
            request = request.basic_auth(user, self.endpoint.password.as_deref());
        }
        request
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(ActivityQueryError::connection(format!(
                "Connection to {} is closed",
                self.endpoint.display_string()
            )));
        }
        Ok(())
    }
}

/// A failed probe and whether it is worth retrying.
struct ProbeFailure {
    transient: bool,
    error: ActivityQueryError,
}

#[async_trait]
impl TripleStoreClient for HttpTripleStore {
    async fn select(&self, query: &str) -> Result<RowStream> {
        self.ensure_open()?;
        debug!("Submitting query to {}", self.endpoint.display_string());

        let response = self
            .request(query, RESULTS_MEDIA_TYPE)
            .send()
            .await
            .map_err(|e| map_request_error(&e, &self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_status_error(status, &body, &self.endpoint));
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| io::Error::new(io::ErrorKind::Other, e)))
            .boxed();

        rows_from_reader(StreamReader::new(body)).await
    }

    async fn close(&self) -> Result<()> {
        if !self.closed.swap(true, Ordering::SeqCst) {
            debug!("Closed connection to {}", self.endpoint.display_string());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.endpoint.display_string()
    }
}

/// Maps transport-level reqwest failures to connection errors.
fn map_request_error(error: &reqwest::Error, endpoint: &EndpointConfig) -> ActivityQueryError {
    let target = endpoint.display_string();

    if error.is_connect() {
        ActivityQueryError::connection(format!(
            "Cannot connect to {target}. Check that the server is running."
        ))
    } else if error.is_timeout() {
        ActivityQueryError::connection(format!(
            "Request to {target} timed out after {} seconds.",
            endpoint.timeout_secs
        ))
    } else {
        ActivityQueryError::connection(error.to_string())
    }
}

/// Maps a non-success HTTP status to the matching error category.
fn map_status_error(status: StatusCode, body: &str, endpoint: &EndpointConfig) -> ActivityQueryError {
    let detail = body.trim();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            let user = endpoint.user.as_deref().unwrap_or("anonymous");
            ActivityQueryError::connection(format!(
                "Authentication failed for user '{user}' ({status}). Check your credentials."
            ))
        }
        StatusCode::NOT_FOUND => ActivityQueryError::connection(format!(
            "Repository not found at {}.",
            endpoint.url
        )),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            ActivityQueryError::query(format!("Malformed query ({status}): {detail}"))
        }
        _ if detail.is_empty() => {
            ActivityQueryError::query(format!("Endpoint answered {status}"))
        }
        _ => ActivityQueryError::query(format!("Endpoint answered {status}: {detail}")),
    }
}
