//! Command-line argument parsing for activity-query.

use activity_query::config::{Config, DateRangeConfig, EndpointConfig};
use clap::Parser;
use std::path::PathBuf;

/// Lists activities and observations stored in a SPARQL repository.
#[derive(Parser, Debug)]
#[command(name = "activity-query")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SPARQL repository URL (e.g., http://localhost:7200/repositories/activity)
    #[arg(value_name = "ENDPOINT_URL", env = "ACTIVITY_QUERY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Use named endpoint from config
    #[arg(short = 'c', long, value_name = "NAME")]
    pub connection: Option<String>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// User for HTTP basic authentication
    #[arg(short = 'u', long, value_name = "USER")]
    pub user: Option<String>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Lower bound of the observation date range (xsd:dateTime lexical form)
    #[arg(long, value_name = "DATETIME")]
    pub from: Option<String>,

    /// Upper bound of the observation date range (xsd:dateTime lexical form)
    #[arg(long, value_name = "DATETIME")]
    pub to: Option<String>,

    /// Query a Turtle file loaded into an in-memory store instead of an endpoint
    #[arg(long, value_name = "PATH")]
    pub store: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Builds an endpoint config from CLI args only, without merging with file config.
    pub fn to_endpoint_config(&self) -> Option<EndpointConfig> {
        self.endpoint.as_ref().map(EndpointConfig::new)
    }

    /// Applies `--user` and `--timeout` on top of a resolved endpoint.
    pub fn apply_endpoint_overrides(&self, endpoint: &mut EndpointConfig) {
        if let Some(user) = &self.user {
            endpoint.user = Some(user.clone());
        }
        if let Some(timeout) = self.timeout {
            endpoint.timeout_secs = timeout;
        }
    }

    /// Applies `--from` and `--to` on top of the configured range.
    pub fn apply_range_overrides(&self, range: &mut DateRangeConfig) {
        if let Some(from) = &self.from {
            range.start = from.clone();
        }
        if let Some(to) = &self.to {
            range.end = to.clone();
        }
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the named endpoint to use, if specified.
    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }
}
