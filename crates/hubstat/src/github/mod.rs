//! GitHub API clients.
//!
//! Two independent API families feed the aggregation:
//!
//! - [`graphql`] - the v4 GraphQL endpoint, used for the repository harvest
//!   and the year-batched contribution counts. Failures here are fatal.
//! - [`search`] - the REST issue-search endpoint, used for PR and issue
//!   records. Failures here degrade the affected counts to zero.
//!
//! The two families mandate different authorization header syntax (`Bearer`
//! for GraphQL, `token` for search); both clients reproduce that exactly.

mod error;
mod graphql;
mod search;

pub use error::{GitHubError, Result};
pub use graphql::{GRAPHQL_ENDPOINT, GraphqlClient, USER_AGENT};
pub use search::{
    DEFAULT_SEARCH_PAGE_SIZE, SEARCH_ENDPOINT, SearchClient, SearchItem, SearchKind, SearchOutcome,
};
