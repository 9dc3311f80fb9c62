//! The aggregation pipeline.
//!
//! A single-pass, non-resumable sequence: contributions → repository harvest
//! → classification → (PR search ∥ issue search) → reconciliation →
//! composition. GraphQL failures abort the run with no partial summary;
//! REST search failures degrade the affected counts to zero.
//!
//! Each invocation is independent and stateless apart from its network
//! calls: there is no caching across runs, no cancellation point, and no
//! progress signal at this boundary.

pub mod compose;
pub mod contributions;
pub mod harvest;
pub mod languages;
pub mod partition;
pub mod reconcile;
pub mod types;

use std::sync::Arc;

use crate::github::{
    DEFAULT_SEARCH_PAGE_SIZE, GitHubError, GraphqlClient, Result, SearchClient, SearchKind,
};
use crate::http::HttpTransport;

pub use compose::compose;
pub use contributions::{GITHUB_FOUNDING_YEAR, contributions_query, total_contributions};
pub use harvest::{DEFAULT_REPO_CAP, REPO_PAGE_SIZE, Repository, harvest_repositories};
pub use languages::{OTHER_LANGUAGE_NAME, OTHER_THRESHOLD_PERCENT, language_breakdown};
pub use partition::{Ownership, RepoPartitions, Visibility};
pub use reconcile::{reconcile, repo_identity_from_url};
pub use types::{CategoryBreakdown, GitHubStats, Language, LanguageStats, MetricStats};

/// Options for one aggregation run.
#[derive(Debug, Clone)]
pub struct StatsOptions {
    /// Account login the statistics are computed for.
    pub login: String,
    /// Safety cap on accumulated repositories during the harvest.
    pub repo_cap: usize,
    /// Page size for the PR/issue searches.
    pub search_page_size: u32,
}

impl StatsOptions {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            repo_cap: DEFAULT_REPO_CAP,
            search_page_size: DEFAULT_SEARCH_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_repo_cap(mut self, cap: usize) -> Self {
        self.repo_cap = cap;
        self
    }

    #[must_use]
    pub fn with_search_page_size(mut self, per_page: u32) -> Self {
        self.search_page_size = per_page;
        self
    }
}

/// Entry point for the aggregation pipeline.
///
/// Holds one client per GitHub API family; both share the transport.
#[derive(Clone)]
pub struct StatsClient {
    graphql: GraphqlClient,
    search: SearchClient,
}

impl StatsClient {
    /// Create a client from an authentication token.
    pub fn new(transport: Arc<dyn HttpTransport>, token: &str) -> Result<Self> {
        Ok(Self {
            graphql: GraphqlClient::new(Arc::clone(&transport), token)?,
            search: SearchClient::new(transport, token)?,
        })
    }

    /// Run one full aggregation and return the composed summary.
    ///
    /// Callers should treat this as a single long-running operation; a
    /// timeout has to be applied around the whole call.
    pub async fn collect(&self, options: &StatsOptions) -> Result<GitHubStats> {
        if options.login.is_empty() {
            return Err(GitHubError::configuration("account login is empty"));
        }
        let login = options.login.as_str();

        let contributions = total_contributions(&self.graphql, login).await?;

        let repos = harvest_repositories(&self.graphql, login, options.repo_cap).await?;
        let partitions = RepoPartitions::classify(login, repos);

        // The two searches are independent reads; run them concurrently and
        // combine only after both resolve. Degraded outcomes already carry
        // empty item lists.
        let (pr_outcome, issue_outcome) = tokio::join!(
            self.search
                .search(SearchKind::PullRequests, login, options.search_page_size),
            self.search
                .search(SearchKind::Issues, login, options.search_page_size),
        );

        if pr_outcome.degraded || issue_outcome.degraded {
            tracing::warn!(
                pull_requests_degraded = pr_outcome.degraded,
                issues_degraded = issue_outcome.degraded,
                "summary includes degraded search counts"
            );
        }

        let pull_requests = reconcile(&pr_outcome.items, &partitions);
        let issues = reconcile(&issue_outcome.items, &partitions);

        Ok(compose(contributions, &partitions, pull_requests, issues))
    }
}
