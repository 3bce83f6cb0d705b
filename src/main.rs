//! activity-query - lists activities and observations from a SPARQL repository.

mod cli;

use activity_query::app;
use activity_query::config::Config;
use activity_query::error::{ActivityQueryError, Result};
use activity_query::logging;
use activity_query::query::QueryTemplates;
use activity_query::store::StoreBackend;
use cli::Cli;
use tracing::{error, info};

fn main() {
    let _ = dotenvy::dotenv();
    logging::init_stderr_logging();

    if let Err(e) = run() {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse_args();

    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    cli.apply_range_overrides(&mut config.range);
    let templates = QueryTemplates::from_config(&config)?;

    let backend = resolve_backend(&cli, &config)?;
    info!("Backend: {}", backend.display_string());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ActivityQueryError::internal(format!("Failed to start runtime: {e}")))?;

    let stdout = std::io::stdout();
    runtime.block_on(app::run(&backend, templates, stdout.lock()))?;
    Ok(())
}

/// Resolves the backend with precedence:
/// 1. `--store` (in-memory)
/// 2. Endpoint URL argument
/// 3. Named endpoint from config
/// 4. Default endpoint from config
/// 5. Built-in default URL
fn resolve_backend(cli: &Cli, config: &Config) -> Result<StoreBackend> {
    if let Some(path) = &cli.store {
        return Ok(StoreBackend::Memory(path.clone()));
    }

    let mut endpoint = match cli.to_endpoint_config() {
        Some(endpoint) => endpoint,
        None => match cli.connection_name() {
            Some(name) => config.get_endpoint(Some(name)).cloned().ok_or_else(|| {
                ActivityQueryError::config(format!("Endpoint '{}' not found in config file", name))
            })?,
            None => config.get_endpoint(None).cloned().unwrap_or_default(),
        },
    };

    cli.apply_endpoint_overrides(&mut endpoint);
    endpoint.apply_env_defaults();
    endpoint.parsed_url()?;

    Ok(StoreBackend::Http(endpoint))
}
