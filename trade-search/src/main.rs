//! Search Probe
//!
//! Command-line probe for the trade search layer. Prints the engine status,
//! bootstraps the indexes, or runs a federated query against the configured
//! engine.

use clap::Parser;
use dotenv::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trade_search::{Dependencies, ProbeError};
use trade_search_shared::{SearchOptions, SearchScope};

/// Probe the configured search engine.
#[derive(Parser, Debug)]
#[command(name = "search-probe", version, about, long_about = None)]
struct Args {
    /// Create the indexes and their settings, then exit.
    #[arg(long, conflicts_with = "query")]
    prepare: bool,

    /// Indexes to search: companies, exchanges or all.
    #[arg(long = "type", value_name = "TYPE")]
    scope: Option<String>,

    /// Hits per index, clamped to 1..=50.
    #[arg(long)]
    limit: Option<f64>,

    /// Only return companies in this locale.
    #[arg(long)]
    locale: Option<String>,

    /// Free-text query. Without one, the engine status is printed.
    query: Vec<String>,
}

/// Initialize tracing/logging.
fn init_tracing() -> Result<(), ProbeError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("trade_search=info,trade_search_repository=info"));

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    // Logs go to stderr so stdout carries only the probe output.
    if json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(true),
            )
            .try_init()
            .map_err(|e| ProbeError::config(format!("Failed to initialize tracing: {}", e)))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .pretty(),
            )
            .try_init()
            .map_err(|e| ProbeError::config(format!("Failed to initialize tracing: {}", e)))?;
    }

    info!(
        service_name = "search-probe",
        service_version = env!("CARGO_PKG_VERSION"),
        json = json_output,
        "Tracing initialized"
    );

    Ok(())
}

fn search_options(args: &Args) -> SearchOptions {
    let mut options = SearchOptions::default().with_scope(SearchScope::parse(args.scope.as_deref()));
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }
    if let Some(locale) = &args.locale {
        options = options.with_locale(locale.clone());
    }
    options
}

#[tokio::main]
async fn main() -> Result<(), ProbeError> {
    // Load environment variables from .env file
    dotenv().ok();

    let args = Args::parse();

    init_tracing()?;

    let deps = Dependencies::from_env();

    if args.prepare {
        if !deps.config.enabled {
            error!("Cannot prepare indexes without a configured search engine");
            return Err(ProbeError::config("SEARCH_ENGINE_URL is not set"));
        }
        if deps.driver.prepare_indexes().await {
            info!("Indexes prepared");
            return Ok(());
        }
        error!("Engine did not acknowledge every index setup step");
        return Err(ProbeError::config("Failed to prepare indexes"));
    }

    let query = args.query.join(" ");
    if query.trim().is_empty() {
        println!("{}", serde_json::to_string_pretty(&deps.config.engine_info())?);
        return Ok(());
    }

    let payload = deps
        .federator()
        .perform_search(&query, &search_options(&args))
        .await;
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
