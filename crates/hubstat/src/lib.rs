//! Hubstat - GitHub activity aggregation.
//!
//! Queries GitHub's GraphQL and REST search APIs, reconciles the two result
//! streams by repository identity, and folds everything into one normalized
//! summary partitioned by ownership (personal vs. collaborator) and
//! visibility (public vs. private).
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use hubstat::http::reqwest_transport::ReqwestTransport;
//! use hubstat::{StatsClient, StatsOptions};
//!
//! let transport = Arc::new(ReqwestTransport::with_timeout(Duration::from_secs(30))?);
//! let client = StatsClient::new(transport, &token)?;
//! let summary = client.collect(&StatsOptions::new("octocat")).await?;
//! println!("{}", serde_json::to_string_pretty(&summary)?);
//! ```

pub mod github;
pub mod http;
pub mod stats;

pub use github::{GitHubError, GraphqlClient, SearchClient, SearchKind};
pub use stats::{
    CategoryBreakdown, GitHubStats, Language, LanguageStats, MetricStats, Ownership,
    RepoPartitions, Repository, StatsClient, StatsOptions, Visibility,
};
