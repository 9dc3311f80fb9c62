//! End-to-end pipeline tests over a scripted transport.
//!
//! These exercise the whole aggregation (contributions, harvest,
//! classification, search reconciliation, composition) without sockets by
//! implementing the transport trait in-process.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use hubstat::github::{GRAPHQL_ENDPOINT, GitHubError, SearchClient, SearchKind};
use hubstat::http::{HttpError, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use hubstat::{StatsClient, StatsOptions};

const LOGIN: &str = "octocat";

/// Scripted transport: responses registered per method + URL, served FIFO.
#[derive(Clone, Default)]
struct ScriptedTransport {
    routes: Arc<Mutex<HashMap<(HttpMethod, String), VecDeque<HttpResponse>>>>,
}

impl ScriptedTransport {
    fn new() -> Self {
        Self::default()
    }

    fn push(&self, method: HttpMethod, url: impl Into<String>, status: u16, body: serde_json::Value) {
        self.routes
            .lock()
            .expect("lock")
            .entry((method, url.into()))
            .or_default()
            .push_back(HttpResponse {
                status,
                body: body.to_string().into_bytes(),
            });
    }

    fn push_graphql(&self, body: serde_json::Value) {
        self.push(HttpMethod::Post, GRAPHQL_ENDPOINT, 200, body);
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let key = (request.method, request.url.clone());
        match self
            .routes
            .lock()
            .expect("lock")
            .get_mut(&key)
            .and_then(|q| q.pop_front())
        {
            Some(resp) => Ok(resp),
            None => Err(HttpError::NoMockResponse {
                method: key.0.as_str().to_string(),
                url: key.1,
            }),
        }
    }
}

fn contributions_response() -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "contributions2008": { "contributionCalendar": { "totalContributions": 10 } },
                "contributions2009": { "contributionCalendar": { "totalContributions": 20 } },
                "contributions2023": { "contributionCalendar": { "totalContributions": 5 } }
            }
        }
    })
}

fn repo_node(
    owner: &str,
    name: &str,
    private: bool,
    fork: bool,
    stars: u64,
    languages: &[(&str, u64)],
) -> serde_json::Value {
    let edges: Vec<serde_json::Value> = languages
        .iter()
        .map(|(lang, size)| json!({ "size": size, "node": { "name": lang } }))
        .collect();
    json!({
        "name": name,
        "owner": { "login": owner },
        "isFork": fork,
        "isPrivate": private,
        "stargazerCount": stars,
        "languages": { "edges": edges }
    })
}

fn repo_page(nodes: Vec<serde_json::Value>, has_next: bool, cursor: Option<&str>) -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "repositories": {
                    "pageInfo": { "hasNextPage": has_next, "endCursor": cursor },
                    "nodes": nodes
                }
            }
        }
    })
}

fn search_response(repos: &[(&str, &str)]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = repos
        .iter()
        .map(|(owner, name)| {
            json!({ "repository_url": format!("https://api.github.com/repos/{owner}/{name}") })
        })
        .collect();
    json!({ "total_count": items.len(), "items": items })
}

fn pr_search_url() -> String {
    SearchClient::search_url(SearchKind::PullRequests, LOGIN, 100)
}

fn issue_search_url() -> String {
    SearchClient::search_url(SearchKind::Issues, LOGIN, 100)
}

fn stats_client(transport: &ScriptedTransport) -> StatsClient {
    StatsClient::new(Arc::new(transport.clone()), "test-token").expect("client")
}

#[tokio::test]
async fn end_to_end_two_repo_scenario() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    transport.push_graphql(repo_page(
        vec![
            repo_node(LOGIN, "A", false, false, 5, &[("JavaScript", 80), ("CSS", 20)]),
            repo_node(LOGIN, "B", true, false, 2, &[("JavaScript", 10)]),
        ],
        false,
        None,
    ));
    transport.push(
        HttpMethod::Get,
        pr_search_url(),
        200,
        search_response(&[(LOGIN, "A")]),
    );
    transport.push(HttpMethod::Get, issue_search_url(), 200, search_response(&[]));

    let stats = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect("aggregation should succeed");

    assert_eq!(stats.contributions, 35);

    assert_eq!(stats.repositories.personal.public, 1);
    assert_eq!(stats.repositories.personal.private, 1);
    assert_eq!(stats.repositories.personal.total, 2);
    assert_eq!(stats.repositories.overall, 2);

    assert_eq!(stats.stars.personal.public, 5);
    assert_eq!(stats.stars.personal.private, 2);
    assert_eq!(stats.stars.personal.total, 7);

    assert_eq!(stats.pull_requests.personal.public, 1);
    assert_eq!(stats.pull_requests.personal.private, 0);
    assert_eq!(stats.pull_requests.personal.total, 1);
    assert_eq!(stats.pull_requests.overall, 1);
    assert_eq!(stats.issues.overall, 0);

    let languages = &stats.languages.personal.total;
    assert_eq!(languages.len(), 2);
    assert_eq!(languages[0].name, "JavaScript");
    assert!((languages[0].percentage - 90.0 / 110.0 * 100.0).abs() < 1e-9);
    assert_eq!(languages[1].name, "CSS");
    assert!((languages[1].percentage - 20.0 / 110.0 * 100.0).abs() < 1e-9);
    assert!(languages.iter().all(|l| l.name != "Other"));
}

#[tokio::test]
async fn count_invariants_hold_across_all_metrics() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    transport.push_graphql(repo_page(
        vec![
            repo_node(LOGIN, "mine-pub", false, false, 3, &[("Rust", 1000)]),
            repo_node(LOGIN, "mine-priv", true, false, 1, &[("Rust", 300)]),
            repo_node("acme", "shared-pub", false, false, 40, &[("Go", 700)]),
            repo_node("acme", "shared-priv", true, false, 0, &[("Go", 100)]),
        ],
        false,
        None,
    ));
    transport.push(
        HttpMethod::Get,
        pr_search_url(),
        200,
        search_response(&[(LOGIN, "mine-pub"), ("acme", "shared-priv"), (LOGIN, "mine-priv")]),
    );
    transport.push(
        HttpMethod::Get,
        issue_search_url(),
        200,
        search_response(&[("acme", "shared-pub"), ("acme", "shared-pub")]),
    );

    let stats = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect("aggregation should succeed");

    for metric in [
        &stats.repositories,
        &stats.stars,
        &stats.pull_requests,
        &stats.issues,
    ] {
        assert_eq!(
            metric.personal.total,
            metric.personal.public + metric.personal.private
        );
        assert_eq!(
            metric.collaborator.total,
            metric.collaborator.public + metric.collaborator.private
        );
        assert_eq!(metric.overall, metric.personal.total + metric.collaborator.total);
    }

    assert_eq!(stats.pull_requests.personal.total, 2);
    assert_eq!(stats.pull_requests.collaborator.private, 1);
    assert_eq!(stats.issues.collaborator.public, 2);

    // Percentage lists sum to ~100 in every non-empty partition.
    let lists = [
        &stats.languages.overall,
        &stats.languages.personal.total,
        &stats.languages.collaborator.total,
    ];
    for list in lists {
        let sum: f64 = list.iter().map(|l| l.percentage).sum();
        assert!((sum - 100.0).abs() < 1e-9, "sum was {sum}");
    }
}

#[tokio::test]
async fn forks_are_absent_from_every_partition() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    transport.push_graphql(repo_page(
        vec![
            repo_node(LOGIN, "real", false, false, 1, &[("Rust", 100)]),
            repo_node(LOGIN, "my-fork", false, true, 99, &[("C", 9000)]),
        ],
        false,
        None,
    ));
    transport.push(
        HttpMethod::Get,
        pr_search_url(),
        200,
        // A PR against the fork must be dropped during reconciliation.
        search_response(&[(LOGIN, "my-fork")]),
    );
    transport.push(HttpMethod::Get, issue_search_url(), 200, search_response(&[]));

    let stats = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect("aggregation should succeed");

    assert_eq!(stats.repositories.overall, 1);
    assert_eq!(stats.stars.overall, 1);
    assert_eq!(stats.pull_requests.overall, 0);
    assert!(stats.languages.overall.iter().all(|l| l.name != "C"));
}

#[tokio::test]
async fn search_failure_degrades_counts_without_aborting() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    transport.push_graphql(repo_page(
        vec![repo_node(LOGIN, "repo", false, false, 1, &[("Rust", 100)])],
        false,
        None,
    ));
    transport.push(HttpMethod::Get, pr_search_url(), 403, json!({ "message": "rate limited" }));
    transport.push(
        HttpMethod::Get,
        issue_search_url(),
        200,
        search_response(&[(LOGIN, "repo")]),
    );

    let stats = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect("degraded search must not abort");

    assert_eq!(stats.pull_requests.overall, 0);
    assert_eq!(stats.issues.overall, 1);
    assert_eq!(stats.repositories.overall, 1);
}

#[tokio::test]
async fn both_searches_degrading_zero_fills_both_metrics() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    transport.push_graphql(repo_page(
        vec![repo_node(LOGIN, "repo", false, false, 4, &[("Rust", 100)])],
        false,
        None,
    ));
    transport.push(HttpMethod::Get, pr_search_url(), 502, json!({ "message": "bad gateway" }));
    // No issue-search response registered: the transport itself errors.

    let stats = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect("degraded searches must not abort");

    assert_eq!(stats.pull_requests, hubstat::MetricStats::default());
    assert_eq!(stats.issues, hubstat::MetricStats::default());
    assert_eq!(stats.repositories.overall, 1);
    assert_eq!(stats.stars.overall, 4);
    assert_eq!(stats.contributions, 35);
}

#[tokio::test]
async fn harvest_failure_aborts_with_an_upstream_error() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    transport.push(HttpMethod::Post, GRAPHQL_ENDPOINT, 500, json!({ "message": "boom" }));

    let err = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect_err("harvest failure is fatal");
    assert!(matches!(err, GitHubError::Upstream { .. }));
}

#[tokio::test]
async fn contribution_failure_aborts_before_the_harvest() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(json!({
        "data": null,
        "errors": [{ "message": "token lacks scope" }]
    }));

    let err = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN))
        .await
        .expect_err("contribution failure is fatal");
    assert!(matches!(err, GitHubError::Upstream { .. }));
}

#[tokio::test]
async fn capped_harvest_drops_unmatched_search_records_silently() {
    let transport = ScriptedTransport::new();
    transport.push_graphql(contributions_response());
    // Two full-page entries with more available; cap of 2 stops pagination.
    transport.push_graphql(repo_page(
        vec![
            repo_node(LOGIN, "kept-1", false, false, 0, &[]),
            repo_node(LOGIN, "kept-2", false, false, 0, &[]),
        ],
        true,
        Some("cursor-1"),
    ));
    transport.push(
        HttpMethod::Get,
        pr_search_url(),
        200,
        // "beyond-cap" was never harvested; its PR must not count.
        search_response(&[(LOGIN, "kept-1"), (LOGIN, "beyond-cap")]),
    );
    transport.push(HttpMethod::Get, issue_search_url(), 200, search_response(&[]));

    let stats = stats_client(&transport)
        .collect(&StatsOptions::new(LOGIN).with_repo_cap(2))
        .await
        .expect("aggregation should succeed");

    assert_eq!(stats.repositories.overall, 2);
    assert_eq!(stats.pull_requests.overall, 1);
    assert_eq!(stats.pull_requests.personal.public, 1);
}
