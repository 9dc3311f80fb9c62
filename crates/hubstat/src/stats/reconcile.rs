//! Reconciliation of REST search records against the harvested set.
//!
//! The search API attaches neither ownership nor visibility to its results;
//! that information only exists in the GraphQL-harvested repository set, so
//! each record is joined back by (owner, name) identity.

use crate::github::SearchItem;

use super::partition::{Ownership, RepoPartitions};
use super::types::MetricStats;

const REPOS_URL_PREFIX: &str = "https://api.github.com/repos/";

/// Extract (owner, name) from a search item's repository reference URL.
#[must_use]
pub fn repo_identity_from_url(url: &str) -> Option<(&str, &str)> {
    let path = url.strip_prefix(REPOS_URL_PREFIX)?;
    let (owner, name) = path.split_once('/')?;
    if owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((owner, name))
}

/// Fold search records into category/visibility-partitioned counts.
///
/// Each matched record increments exactly one (ownership, visibility) cell
/// and the corresponding ownership total. Records whose repository is not in
/// the harvest (capped harvest, forks, unparseable URL) are dropped silently;
/// that is expected, not anomalous. `overall` is derived as the sum of both
/// ownership totals, never taken from the search API.
#[must_use]
pub fn reconcile(items: &[SearchItem], partitions: &RepoPartitions) -> MetricStats {
    let mut stats = MetricStats::default();

    for item in items {
        let Some((owner, name)) = repo_identity_from_url(&item.repository_url) else {
            continue;
        };
        let Some((ownership, visibility)) = partitions.lookup(owner, name) else {
            continue;
        };

        match ownership {
            Ownership::Personal => stats.personal.record(visibility),
            Ownership::Collaborator => stats.collaborator.record(visibility),
        }
    }

    stats.overall = stats.personal.total + stats.collaborator.total;
    stats
}
