//! Classification of harvested repositories by ownership and visibility.
//!
//! The partition built here is the ground truth the PR/issue reconciler
//! matches search records against.

use std::collections::HashMap;

use super::harvest::Repository;

/// Ownership axis: whose namespace a repository lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ownership {
    /// Owned by the configured account.
    Personal,
    /// Owned by someone else; the account is a collaborator.
    Collaborator,
}

/// Visibility axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    #[must_use]
    pub fn of(repo: &Repository) -> Self {
        if repo.private {
            Visibility::Private
        } else {
            Visibility::Public
        }
    }
}

/// The harvested repository set, classified along both axes.
///
/// Built once per aggregation run and read-only afterward. Every harvested
/// repository belongs to exactly one ownership bucket and exactly one
/// visibility bucket.
#[derive(Debug)]
pub struct RepoPartitions {
    repos: Vec<Repository>,
    classes: Vec<(Ownership, Visibility)>,
    index: HashMap<String, (Ownership, Visibility)>,
}

impl RepoPartitions {
    /// Classify the harvested set against the configured account login.
    #[must_use]
    pub fn classify(login: &str, repos: Vec<Repository>) -> Self {
        let classes: Vec<(Ownership, Visibility)> = repos
            .iter()
            .map(|repo| {
                let ownership = if repo.owner == login {
                    Ownership::Personal
                } else {
                    Ownership::Collaborator
                };
                (ownership, Visibility::of(repo))
            })
            .collect();

        let index = repos
            .iter()
            .zip(&classes)
            .map(|(repo, class)| (identity_key(&repo.owner, &repo.name), *class))
            .collect();

        Self {
            repos,
            classes,
            index,
        }
    }

    /// Repositories in one ownership bucket, optionally narrowed by
    /// visibility. `None` selects the bucket's total (public ∪ private).
    #[must_use]
    pub fn subset(&self, ownership: Ownership, visibility: Option<Visibility>) -> Vec<&Repository> {
        self.repos
            .iter()
            .zip(&self.classes)
            .filter(|(_, (o, v))| *o == ownership && visibility.is_none_or(|want| *v == want))
            .map(|(repo, _)| repo)
            .collect()
    }

    /// The full harvested set (personal ∪ collaborator).
    #[must_use]
    pub fn overall(&self) -> Vec<&Repository> {
        self.repos.iter().collect()
    }

    /// Classification of a repository identified by (owner, name), or `None`
    /// if the pair is not part of the harvest.
    #[must_use]
    pub fn lookup(&self, owner: &str, name: &str) -> Option<(Ownership, Visibility)> {
        self.index.get(&identity_key(owner, name)).copied()
    }
}

fn identity_key(owner: &str, name: &str) -> String {
    format!("{owner}/{name}")
}
