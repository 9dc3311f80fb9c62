//! REST search client for PR and issue counts.
//!
//! Unlike the GraphQL calls, search failures are tolerated: a non-success
//! status or a transport error degrades the affected counts to zero instead
//! of aborting the aggregation. The warning is logged for observability but
//! never raised to the caller.

use std::sync::Arc;

use serde::Deserialize;

use crate::http::{HttpMethod, HttpRequest, HttpTransport};

use super::error::{GitHubError, Result};
use super::graphql::USER_AGENT;

/// GitHub REST issue-search endpoint. Covers both PRs and issues.
pub const SEARCH_ENDPOINT: &str = "https://api.github.com/search/issues";

/// Default page size for search requests.
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 100;

/// Which record type a search targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    PullRequests,
    Issues,
}

impl SearchKind {
    /// The `type:` qualifier for the search query string.
    #[must_use]
    pub fn type_qualifier(self) -> &'static str {
        match self {
            SearchKind::PullRequests => "type:pr",
            SearchKind::Issues => "type:issue",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            SearchKind::PullRequests => "pull requests",
            SearchKind::Issues => "issues",
        }
    }
}

/// One record from a search response.
///
/// Only the repository reference is needed: items are classified against the
/// harvested repository set, never stored.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct SearchItem {
    /// API URL of the owning repository, e.g.
    /// `https://api.github.com/repos/octocat/hello-world`.
    pub repository_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

/// Result of one search call.
#[derive(Debug, Default)]
pub struct SearchOutcome {
    pub items: Vec<SearchItem>,
    /// Set when the fetch failed and the items list defaulted to empty.
    pub degraded: bool,
}

impl SearchOutcome {
    fn degraded() -> Self {
        Self {
            items: Vec::new(),
            degraded: true,
        }
    }
}

/// Client for the REST search endpoint.
///
/// Search uses the `token` authorization scheme, not the Bearer scheme the
/// GraphQL endpoint expects.
#[derive(Clone)]
pub struct SearchClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
}

impl SearchClient {
    /// Create a client from an authentication token.
    pub fn new(transport: Arc<dyn HttpTransport>, token: &str) -> Result<Self> {
        if token.is_empty() {
            return Err(GitHubError::configuration("GitHub token is empty"));
        }
        Ok(Self {
            transport,
            token: token.to_string(),
        })
    }

    /// Build the request URL for a search.
    #[must_use]
    pub fn search_url(kind: SearchKind, login: &str, per_page: u32) -> String {
        format!(
            "{SEARCH_ENDPOINT}?q={}+author:{login}&per_page={per_page}",
            kind.type_qualifier()
        )
    }

    /// Search PRs or issues authored by `login`.
    ///
    /// Never fails the pipeline: any failure yields an empty, degraded
    /// outcome and a warning.
    pub async fn search(&self, kind: SearchKind, login: &str, per_page: u32) -> SearchOutcome {
        let url = Self::search_url(kind, login, per_page);

        let request = HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: vec![
                ("Authorization".to_string(), format!("token {}", self.token)),
                (
                    "Accept".to_string(),
                    "application/vnd.github+json".to_string(),
                ),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
            ],
            body: Vec::new(),
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(kind = kind.label(), error = %e, "search request failed, counts degrade to zero");
                return SearchOutcome::degraded();
            }
        };

        if !response.is_success() {
            tracing::warn!(
                kind = kind.label(),
                status = response.status,
                "search returned non-success status, counts degrade to zero"
            );
            return SearchOutcome::degraded();
        }

        match serde_json::from_slice::<SearchResponse>(&response.body) {
            Ok(parsed) => SearchOutcome {
                items: parsed.items,
                degraded: false,
            },
            Err(e) => {
                tracing::warn!(kind = kind.label(), error = %e, "search response was unparseable, counts degrade to zero");
                SearchOutcome::degraded()
            }
        }
    }
}
