//! Summary types exposed to the rendering layer.
//!
//! Field names and nesting are a serialization contract: the rendering layer
//! indexes into this shape directly, so renames here are breaking changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::partition::Visibility;

/// A per-visibility triple attached to each ownership bucket.
///
/// `total` is never computed independently; it always aggregates exactly the
/// `public` and `private` members of the same bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown<T> {
    pub public: T,
    pub private: T,
    pub total: T,
}

impl CategoryBreakdown<u64> {
    /// Increment the cell for `visibility` along with the bucket total.
    pub fn record(&mut self, visibility: Visibility) {
        match visibility {
            Visibility::Public => self.public += 1,
            Visibility::Private => self.private += 1,
        }
        self.total += 1;
    }
}

/// One countable metric (repositories, stars, PRs, issues), partitioned by
/// ownership and visibility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub personal: CategoryBreakdown<u64>,
    pub collaborator: CategoryBreakdown<u64>,
    pub overall: u64,
}

/// One language's share of a repository subset.
///
/// Percentages are relative to the subset they were computed for; the same
/// language can carry different percentages in different partitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub percentage: f64,
}

/// Language distributions, partitioned like the countable metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageStats {
    pub personal: CategoryBreakdown<Vec<Language>>,
    pub collaborator: CategoryBreakdown<Vec<Language>>,
    pub overall: Vec<Language>,
}

/// The terminal artifact of one aggregation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitHubStats {
    pub contributions: u64,
    pub pull_requests: MetricStats,
    pub issues: MetricStats,
    pub repositories: MetricStats,
    pub stars: MetricStats,
    pub languages: LanguageStats,
    pub last_updated: DateTime<Utc>,
}
