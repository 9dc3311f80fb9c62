//! Hubstat CLI - fetch a GitHub activity summary and print it as JSON.

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use hubstat::http::reqwest_transport::ReqwestTransport;
use hubstat::{StatsClient, StatsOptions};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hubstat")]
#[command(version)]
#[command(about = "Aggregate a GitHub account's activity into one JSON summary")]
#[command(
    long_about = "Hubstat queries GitHub's GraphQL and REST search APIs and folds the \
results into a single summary: contributions, repositories, stars, pull \
requests, issues, and language usage, partitioned by ownership (personal \
vs. collaborator) and visibility (public vs. private)."
)]
#[command(after_long_help = r#"EXAMPLES
    Fetch the configured account's summary:
        $ hubstat fetch

    Fetch another account with pretty-printed output:
        $ hubstat fetch --username octocat --pretty

CONFIGURATION
    Hubstat reads configuration from:
      1. ~/.config/hubstat/config.toml (or $XDG_CONFIG_HOME/hubstat/config.toml)
      2. ./hubstat.toml
      3. Environment variables (HUBSTAT_* prefix)
      4. .env file in current directory

ENVIRONMENT VARIABLES
    HUBSTAT_GITHUB_TOKEN      GitHub personal access token
    HUBSTAT_GITHUB_USERNAME   Account login the statistics are computed for
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the activity summary and print it as JSON
    Fetch {
        /// Account login to aggregate (overrides configuration)
        #[arg(short, long)]
        username: Option<String>,

        /// Safety cap on repositories fetched during the harvest
        #[arg(long)]
        repo_cap: Option<usize>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,

        /// Request timeout in seconds for each API call
        #[arg(long, default_value_t = 30)]
        timeout: u64,
    },
}

async fn handle_fetch(
    config: &config::Config,
    username: Option<String>,
    repo_cap: Option<usize>,
    pretty: bool,
    timeout: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let token = config.github.token.clone().ok_or(
        "No GitHub token configured. Set HUBSTAT_GITHUB_TOKEN or add it to hubstat.toml.",
    )?;
    let login = username.or_else(|| config.github.username.clone()).ok_or(
        "No GitHub username configured. Pass --username, set HUBSTAT_GITHUB_USERNAME, \
or add it to hubstat.toml.",
    )?;

    let transport = Arc::new(ReqwestTransport::with_timeout(Duration::from_secs(timeout))?);
    let client = StatsClient::new(transport, &token)?;

    let options = StatsOptions::new(login)
        .with_repo_cap(repo_cap.unwrap_or(config.stats.repo_cap))
        .with_search_page_size(config.stats.search_page_size);

    let stats = client.collect(&options).await?;

    let json = if pretty {
        serde_json::to_string_pretty(&stats)?
    } else {
        serde_json::to_string(&stats)?
    };
    println!("{json}");

    Ok(())
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::load();

    let result = match cli.command {
        Commands::Fetch {
            username,
            repo_cap,
            pretty,
            timeout,
        } => handle_fetch(&config, username, repo_cap, pretty, timeout).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
