//! Configuration file support for hubstat.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `HUBSTAT_`, e.g., `HUBSTAT_GITHUB_TOKEN`)
//! 3. Config file (~/.config/hubstat/config.toml or ./hubstat.toml)
//! 4. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."     # or use HUBSTAT_GITHUB_TOKEN env var
//! username = "octocat"  # or use HUBSTAT_GITHUB_USERNAME env var
//!
//! [stats]
//! repo_cap = 300
//! search_page_size = 100
//! ```
//!
//! Environment overrides are supported for `HUBSTAT_GITHUB_TOKEN` and
//! `HUBSTAT_GITHUB_USERNAME` only. The `_` separator splits multi-word keys
//! (`HUBSTAT_STATS_REPO_CAP` would map to `stats.repo.cap`), so the `[stats]`
//! settings come from config files or CLI flags.

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use hubstat::github::DEFAULT_SEARCH_PAGE_SIZE;
use hubstat::stats::DEFAULT_REPO_CAP;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub credentials.
    pub github: GitHubConfig,
    /// Aggregation tuning.
    pub stats: StatsConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub API token.
    /// Can also be set via HUBSTAT_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
    /// Account login the statistics are computed for.
    /// Can also be set via HUBSTAT_GITHUB_USERNAME environment variable.
    pub username: Option<String>,
}

/// Aggregation tuning.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Safety cap on accumulated repositories during the harvest.
    pub repo_cap: usize,
    /// Page size for the PR/issue searches.
    pub search_page_size: u32,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            repo_cap: DEFAULT_REPO_CAP,
            search_page_size: DEFAULT_SEARCH_PAGE_SIZE,
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/hubstat/config.toml)
    /// 3. Local config file (./hubstat.toml)
    /// 4. Environment variables with HUBSTAT_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(proj_dirs) = ProjectDirs::from("", "", "hubstat") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        let local_config = PathBuf::from("hubstat.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./hubstat.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., HUBSTAT_GITHUB_TOKEN -> github.token. Only single-word leaf
        // keys map; see the module docs.
        builder = builder.add_source(
            Environment::with_prefix("HUBSTAT")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the default config file path.
    #[allow(dead_code)]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "hubstat").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}
