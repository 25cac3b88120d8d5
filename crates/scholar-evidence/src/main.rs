//! Scholar Evidence - Entry Point
//!
//! Runs one lookup and prints the evidence pack as Markdown or JSON.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use scholar_evidence::config::{Config, parse_rps};
use scholar_evidence::formatters::{format_error_json, format_pack_json, format_pack_markdown};
use scholar_evidence::{LookupOptions, SearchOrchestrator};

#[derive(Parser, Debug)]
#[command(name = "scholar-evidence")]
#[command(about = "Semantic Scholar lookup for research writing evidence")]
#[command(version)]
struct Cli {
    /// Research query
    query: String,

    /// Final number of papers in the evidence pack (1-50)
    #[arg(long, default_value_t = 12)]
    limit: usize,

    /// Search recall size (1-100)
    #[arg(long, default_value_t = 100)]
    search_limit: usize,

    /// Minimum publication year
    #[arg(long)]
    year_from: Option<i32>,

    /// Maximum publication year
    #[arg(long)]
    year_to: Option<i32>,

    /// Seed papers for recommendations (1-5)
    #[arg(long, default_value_t = 2)]
    seed_count: usize,

    /// Disable recommendation expansion
    #[arg(long)]
    no_recommendations: bool,

    /// Keep papers without a stable ID, DOI, or URL
    #[arg(long)]
    non_strict_traceability: bool,

    /// Output JSON instead of Markdown
    #[arg(long)]
    json: bool,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Semantic Scholar API key (optional)
    #[arg(long, env = "SEMANTIC_SCHOLAR_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Request ceiling in requests per second
    #[arg(long, env = "SEMANTIC_SCHOLAR_RPS", default_value = "0.8", value_parser = parse_rps)]
    rps: f64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // Logs go to stderr so the report on stdout stays clean
    let subscriber = tracing_subscriber::registry().with(filter);

    if json {
        subscriber.with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        subscriber
            .with(tracing_subscriber::fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn emit(text: &str, output: Option<&PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, text)?,
        None => println!("{text}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // .env must be loaded before clap reads env-backed arguments
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(&cli.log_level, cli.json_logs);

    let api_key = cli.api_key.filter(|k| !k.trim().is_empty());
    if api_key.is_none() {
        tracing::warn!(
            "SEMANTIC_SCHOLAR_API_KEY not set; running anonymously (stricter upstream limits apply)"
        );
    }

    let mut config = Config::new(api_key);
    config.requests_per_second = cli.rps;

    let options = LookupOptions {
        top_n: cli.limit,
        search_limit: cli.search_limit,
        year_from: cli.year_from,
        year_to: cli.year_to,
        include_recommendations: !cli.no_recommendations,
        seed_count: cli.seed_count,
        strict_traceability: !cli.non_strict_traceability,
        ..LookupOptions::default()
    };

    tracing::info!(query = %cli.query, rps = cli.rps, "Starting lookup");

    let result = match SearchOrchestrator::from_config(config) {
        Ok(orchestrator) => orchestrator.lookup(&cli.query, &options).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(pack) => {
            let text =
                if cli.json { format_pack_json(&pack)? } else { format_pack_markdown(&pack) };
            emit(&text, cli.output.as_ref())?;
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            tracing::error!(error = %err, "Lookup failed");
            emit(&format_error_json(&err)?, cli.output.as_ref())?;
            Ok(ExitCode::FAILURE)
        }
    }
}
