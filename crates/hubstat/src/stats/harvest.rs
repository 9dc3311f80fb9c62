//! Repository harvest: cursor-paginated GraphQL listing of the account's
//! repository set.

use serde::Deserialize;
use serde_json::json;

use crate::github::{GitHubError, GraphqlClient, Result};

/// Repositories requested per GraphQL page.
pub const REPO_PAGE_SIZE: u32 = 100;

/// Default safety cap on accumulated repositories.
///
/// The cap bounds pages fetched, not repositories retained: forks count
/// toward it and are discarded afterwards.
pub const DEFAULT_REPO_CAP: usize = 300;

const REPO_LIST_QUERY: &str = r#"
query($login: String!, $pageSize: Int!, $after: String) {
  user(login: $login) {
    repositories(first: $pageSize, after: $after, orderBy: {field: UPDATED_AT, direction: DESC}) {
      pageInfo { hasNextPage endCursor }
      nodes {
        name
        owner { login }
        isFork
        isPrivate
        stargazerCount
        languages(first: 10) {
          edges { size node { name } }
        }
      }
    }
  }
}
"#;

/// One non-fork repository the account owns or collaborates on.
///
/// Uniquely identified by (owner, name) within one harvest; immutable once
/// built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub name: String,
    pub owner: String,
    pub private: bool,
    pub stars: u64,
    /// (language name, byte size) pairs in API order.
    pub languages: Vec<(String, u64)>,
}

#[derive(Debug, Deserialize)]
struct RepoListing {
    #[serde(rename = "pageInfo")]
    page_info: PageInfo,
    #[serde(default)]
    nodes: Vec<RepoNode>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
    #[serde(rename = "hasNextPage")]
    has_next_page: bool,
    #[serde(rename = "endCursor")]
    end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RepoNode {
    name: String,
    owner: OwnerNode,
    #[serde(rename = "isFork")]
    is_fork: bool,
    #[serde(rename = "isPrivate")]
    is_private: bool,
    #[serde(rename = "stargazerCount", default)]
    stargazer_count: u64,
    #[serde(default)]
    languages: Option<LanguageConnection>,
}

#[derive(Debug, Deserialize)]
struct OwnerNode {
    login: String,
}

#[derive(Debug, Deserialize)]
struct LanguageConnection {
    #[serde(default)]
    edges: Vec<LanguageEdge>,
}

#[derive(Debug, Deserialize)]
struct LanguageEdge {
    #[serde(default)]
    size: u64,
    node: LanguageNode,
}

#[derive(Debug, Deserialize)]
struct LanguageNode {
    name: String,
}

impl RepoNode {
    fn into_repository(self) -> Repository {
        let languages = self
            .languages
            .map(|conn| {
                conn.edges
                    .into_iter()
                    .map(|edge| (edge.node.name, edge.size))
                    .collect()
            })
            .unwrap_or_default();

        Repository {
            name: self.name,
            owner: self.owner.login,
            private: self.is_private,
            stars: self.stargazer_count,
            languages,
        }
    }
}

/// Paginate the account's repository listing and return the non-fork set.
///
/// Pagination stops when the API reports no further page or when `cap`
/// repositories (forks included) have accumulated. Forks are filtered after
/// pagination ends, so they never reach any downstream component. Any page
/// failure discards the whole harvest.
pub async fn harvest_repositories(
    graphql: &GraphqlClient,
    login: &str,
    cap: usize,
) -> Result<Vec<Repository>> {
    let mut nodes: Vec<RepoNode> = Vec::new();
    let mut after: Option<String> = None;
    let mut page = 1u32;

    loop {
        let variables = json!({
            "login": login,
            "pageSize": REPO_PAGE_SIZE,
            "after": after,
        });

        let data = graphql.execute(REPO_LIST_QUERY, variables).await?;

        let listing = match data.get("user").and_then(|u| u.get("repositories")) {
            Some(block) if !block.is_null() => {
                serde_json::from_value::<RepoListing>(block.clone()).map_err(|e| {
                    GitHubError::upstream(format!("malformed repository listing: {e}"))
                })?
            }
            // Unknown user or empty repositories block ends the harvest.
            _ => break,
        };

        let count = listing.nodes.len();
        nodes.extend(listing.nodes);

        tracing::debug!(page, count, total_so_far = nodes.len(), "harvested repository page");

        if !listing.page_info.has_next_page || nodes.len() >= cap {
            break;
        }
        after = listing.page_info.end_cursor;
        page += 1;
    }

    let harvested = nodes.len();
    let repos: Vec<Repository> = nodes
        .into_iter()
        .filter(|node| !node.is_fork)
        .map(RepoNode::into_repository)
        .collect();

    tracing::info!(
        harvested,
        retained = repos.len(),
        "repository harvest complete"
    );

    Ok(repos)
}
