//! GraphQL client for the GitHub v4 API.

use std::sync::Arc;

use serde_json::{Value, json};

use crate::http::{HttpMethod, HttpRequest, HttpTransport};

use super::error::{GitHubError, Result};

/// GitHub GraphQL endpoint.
pub const GRAPHQL_ENDPOINT: &str = "https://api.github.com/graphql";

/// User agent sent with every request. GitHub rejects requests without one.
pub const USER_AGENT: &str = concat!("hubstat/", env!("CARGO_PKG_VERSION"));

/// Client for GitHub's GraphQL endpoint.
///
/// Issues a single POST per call and returns the raw `data` payload. Any
/// non-success status or API-reported error list is fatal; callers rely on
/// this to abort the aggregation with no partial summary.
#[derive(Clone)]
pub struct GraphqlClient {
    transport: Arc<dyn HttpTransport>,
    token: String,
}

impl std::fmt::Debug for GraphqlClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphqlClient").finish_non_exhaustive()
    }
}

impl GraphqlClient {
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

    /// Execute one GraphQL query and return the `data` payload untouched.
    ///
    /// No retries: a failure here aborts the caller's whole aggregation run.
    pub async fn execute(&self, query: &str, variables: Value) -> Result<Value> {
        let body = json!({ "query": query, "variables": variables });

        let request = HttpRequest {
            method: HttpMethod::Post,
            url: GRAPHQL_ENDPOINT.to_string(),
            headers: vec![
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", self.token),
                ),
                ("Content-Type".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), USER_AGENT.to_string()),
            ],
            body: body.to_string().into_bytes(),
        };

        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(GitHubError::upstream(format!(
                "GraphQL request failed with status {}",
                response.status
            )));
        }

        let payload: Value = serde_json::from_slice(&response.body)
            .map_err(|e| GitHubError::upstream(format!("invalid GraphQL response body: {e}")))?;

        if let Some(errors) = payload.get("errors")
            && errors.as_array().is_some_and(|a| !a.is_empty())
        {
            return Err(GitHubError::upstream(format!(
                "GraphQL query returned errors: {errors}"
            )));
        }

        match payload.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(GitHubError::upstream(
                "GraphQL response is missing the data payload",
            )),
        }
    }
}
