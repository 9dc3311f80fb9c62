//! GitHub API error types.

use thiserror::Error;

use crate::http::HttpError;

/// Errors that can occur while aggregating GitHub statistics.
///
/// GraphQL failures (repository harvest, contribution batch) are fatal and
/// abort the whole aggregation. REST search failures never surface here;
/// they degrade the affected counts to zero instead.
#[derive(Debug, Error)]
pub enum GitHubError {
    /// Missing or empty token / account login.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// Non-success HTTP status or API-reported errors from GitHub.
    #[error("GitHub upstream error: {message}")]
    Upstream { message: String },

    /// Network or connection failure.
    #[error("network error: {message}")]
    Transport { message: String },
}

impl GitHubError {
    /// Create a configuration error.
    #[inline]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an upstream error.
    #[inline]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a transport error.
    #[inline]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<HttpError> for GitHubError {
    fn from(err: HttpError) -> Self {
        GitHubError::transport(err.to_string())
    }
}

/// Result type for aggregation operations.
pub type Result<T> = std::result::Result<T, GitHubError>;
