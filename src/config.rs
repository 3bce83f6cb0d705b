//! Configuration management for activity-query.
//!
//! Handles loading configuration from TOML files and environment variables,
//! with support for named endpoints, the ontology namespace the queries are
//! written against, and the date range used by the range query.

use crate::error::{ActivityQueryError, Result};
use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use url::Url;

/// Endpoint used when nothing else is configured.
pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:7200/repositories/activity";

/// Namespace of the activity ontology.
pub const DEFAULT_NAMESPACE: &str = "http://www.semanticweb.org/user/ontologies/2020/1/activity#";

/// Prefix bound to the ontology namespace in every query.
pub const DEFAULT_PREFIX: &str = "a";

/// Lower bound of the observation range query.
pub const DEFAULT_RANGE_START: &str = "2014-05-05T18:34:54.000";

/// Upper bound of the observation range query.
pub const DEFAULT_RANGE_END: &str = "2014-05-05T18:55:40.000";

/// Environment variable supplying the endpoint user.
pub const ENV_USER: &str = "ACTIVITY_QUERY_USER";

/// Environment variable supplying the endpoint password.
pub const ENV_PASSWORD: &str = "ACTIVITY_QUERY_PASSWORD";

/// Main configuration structure for activity-query.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Named SPARQL endpoints.
    #[serde(default)]
    pub endpoints: HashMap<String, EndpointConfig>,

    /// Ontology namespace settings.
    #[serde(default)]
    pub ontology: OntologyConfig,

    /// Date range for the observation range query.
    #[serde(default)]
    pub range: DateRangeConfig,
}

/// SPARQL endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// Repository URL, e.g. `http://localhost:7200/repositories/activity`.
    pub url: String,

    /// User for HTTP basic authentication.
    pub user: Option<String>,

    /// Password for HTTP basic authentication (not recommended to store in config).
    pub password: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection attempts before giving up (1 disables retrying).
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_attempts() -> u32 {
    1
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT_URL)
    }
}

impl EndpointConfig {
    /// Creates an endpoint config for the given URL with default settings.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user: None,
            password: None,
            timeout_secs: default_timeout_secs(),
            connect_attempts: default_connect_attempts(),
        }
    }

    /// Parses and checks the endpoint URL.
    pub fn parsed_url(&self) -> Result<Url> {
        let url = Url::parse(&self.url)
            .map_err(|e| ActivityQueryError::config(format!("Invalid endpoint URL '{}': {e}", self.url)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ActivityQueryError::config(format!(
                "Invalid scheme '{}'. Expected 'http' or 'https'",
                url.scheme()
            )));
        }
        if url.host_str().is_none() {
            return Err(ActivityQueryError::config(format!(
                "Endpoint URL '{}' has no host",
                self.url
            )));
        }

        Ok(url)
    }

    /// Applies environment variables (ACTIVITY_QUERY_USER, ...) as defaults.
    pub fn apply_env_defaults(&mut self) {
        if self.user.is_none() {
            self.user = std::env::var(ENV_USER).ok();
        }
        if self.password.is_none() {
            self.password = std::env::var(ENV_PASSWORD).ok();
        }
    }

    /// Returns a display-safe string (no credentials) for logs.
    pub fn display_string(&self) -> String {
        match Url::parse(&self.url) {
            Ok(url) => {
                let repository = url
                    .path_segments()
                    .and_then(|mut segments| segments.next_back())
                    .filter(|s| !s.is_empty())
                    .unwrap_or("unknown");
                let host = url.host_str().unwrap_or("localhost");
                match url.port_or_known_default() {
                    Some(port) => format!("{repository} @ {host}:{port}"),
                    None => format!("{repository} @ {host}"),
                }
            }
            Err(_) => self.url.clone(),
        }
    }
}

/// Ontology namespace configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Prefix label used in query text.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Namespace IRI the prefix is bound to.
    #[serde(default = "default_namespace")]
    pub namespace: String,
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            namespace: default_namespace(),
        }
    }
}

impl OntologyConfig {
    /// Checks the prefix label and namespace IRI before they reach query text.
    pub fn validate(&self) -> Result<()> {
        if !is_valid_prefix(&self.prefix) {
            return Err(ActivityQueryError::config(format!(
                "ontology.prefix '{}' is not a valid SPARQL prefix name",
                self.prefix
            )));
        }

        let bad_char = self
            .namespace
            .chars()
            .find(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\'));
        if let Some(c) = bad_char {
            return Err(ActivityQueryError::config(format!(
                "ontology.namespace contains illegal character '{c}'"
            )));
        }

        Url::parse(&self.namespace).map_err(|e| {
            ActivityQueryError::config(format!(
                "ontology.namespace '{}' is not an absolute IRI: {e}",
                self.namespace
            ))
        })?;

        Ok(())
    }
}

/// Checks a SPARQL `PN_PREFIX` (ASCII subset); the empty prefix is allowed.
fn is_valid_prefix(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        None => true,
        Some(first) if first.is_ascii_alphabetic() => {
            !prefix.ends_with('.')
                && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        }
        Some(_) => false,
    }
}

/// Closed date interval, as `xsd:dateTime` lexical forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRangeConfig {
    /// Inclusive lower bound.
    #[serde(default = "default_range_start")]
    pub start: String,

    /// Inclusive upper bound.
    #[serde(default = "default_range_end")]
    pub end: String,
}

fn default_range_start() -> String {
    DEFAULT_RANGE_START.to_string()
}

fn default_range_end() -> String {
    DEFAULT_RANGE_END.to_string()
}

impl Default for DateRangeConfig {
    fn default() -> Self {
        Self {
            start: default_range_start(),
            end: default_range_end(),
        }
    }
}

impl DateRangeConfig {
    /// Creates a range from two bounds.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Checks both bounds are well-formed and ordered.
    ///
    /// Only the lexical form is checked here; the query engine does the
    /// actual comparison against stored values.
    pub fn validate(&self) -> Result<()> {
        let start = parse_date_time(&self.start)
            .ok_or_else(|| ActivityQueryError::config(format!("range.start '{}' is not a valid xsd:dateTime", self.start)))?;
        let end = parse_date_time(&self.end)
            .ok_or_else(|| ActivityQueryError::config(format!("range.end '{}' is not a valid xsd:dateTime", self.end)))?;

        if start > end {
            return Err(ActivityQueryError::config(format!(
                "range.start '{}' is after range.end '{}'",
                self.start, self.end
            )));
        }
        Ok(())
    }
}

/// Parses an `xsd:dateTime` lexical form, with or without a timezone.
/// Timezoned values are normalized to UTC.
fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_utc());
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("activity-query")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ActivityQueryError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ActivityQueryError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    /// Gets a named endpoint, or the default endpoint if name is None.
    pub fn get_endpoint(&self, name: Option<&str>) -> Option<&EndpointConfig> {
        let key = name.unwrap_or("default");
        self.endpoints.get(key)
    }
}
