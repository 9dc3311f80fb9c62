//! Final assembly of the summary from the per-partition aggregates.
//!
//! Pure aggregation with no I/O: if any upstream fatal failure occurred,
//! composition never runs.

use chrono::Utc;

use super::harvest::Repository;
use super::languages::language_breakdown;
use super::partition::{Ownership, RepoPartitions, Visibility};
use super::types::{CategoryBreakdown, GitHubStats, LanguageStats, MetricStats};

/// Assemble the final summary.
///
/// Repository and star counts are reductions over each partition subset;
/// language distributions are recomputed per partition because percentages
/// are partition-relative. `lastUpdated` is the wall-clock time at
/// composition.
#[must_use]
pub fn compose(
    contributions: u64,
    partitions: &RepoPartitions,
    pull_requests: MetricStats,
    issues: MetricStats,
) -> GitHubStats {
    GitHubStats {
        contributions,
        pull_requests,
        issues,
        repositories: count_metric(partitions, |repos| repos.len() as u64),
        stars: count_metric(partitions, |repos| repos.iter().map(|r| r.stars).sum()),
        languages: language_stats(partitions),
        last_updated: Utc::now(),
    }
}

fn count_metric(
    partitions: &RepoPartitions,
    reduce: impl Fn(&[&Repository]) -> u64,
) -> MetricStats {
    let personal = ownership_breakdown(partitions, Ownership::Personal, &reduce);
    let collaborator = ownership_breakdown(partitions, Ownership::Collaborator, &reduce);
    let overall = personal.total + collaborator.total;

    MetricStats {
        personal,
        collaborator,
        overall,
    }
}

fn ownership_breakdown(
    partitions: &RepoPartitions,
    ownership: Ownership,
    reduce: &impl Fn(&[&Repository]) -> u64,
) -> CategoryBreakdown<u64> {
    let public = reduce(&partitions.subset(ownership, Some(Visibility::Public)));
    let private = reduce(&partitions.subset(ownership, Some(Visibility::Private)));

    CategoryBreakdown {
        public,
        private,
        total: public + private,
    }
}

fn language_stats(partitions: &RepoPartitions) -> LanguageStats {
    LanguageStats {
        personal: language_breakdown_for(partitions, Ownership::Personal),
        collaborator: language_breakdown_for(partitions, Ownership::Collaborator),
        overall: language_breakdown(&partitions.overall()),
    }
}

fn language_breakdown_for(
    partitions: &RepoPartitions,
    ownership: Ownership,
) -> CategoryBreakdown<Vec<super::types::Language>> {
    CategoryBreakdown {
        public: language_breakdown(&partitions.subset(ownership, Some(Visibility::Public))),
        private: language_breakdown(&partitions.subset(ownership, Some(Visibility::Private))),
        total: language_breakdown(&partitions.subset(ownership, None)),
    }
}
