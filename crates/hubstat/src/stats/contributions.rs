//! All-time contribution count.
//!
//! The contribution calendar refuses windows wider than one calendar year,
//! so the total is assembled from one aliased sub-query per year, batched
//! into a single GraphQL request to avoid a round trip per year.

use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use serde_json::json;

use crate::github::{GraphqlClient, Result};

/// First year with any GitHub activity.
pub const GITHUB_FOUNDING_YEAR: i32 = 2008;

/// Build the year-batched contribution query.
///
/// One `contributionsCollection` alias per calendar year from
/// [`GITHUB_FOUNDING_YEAR`] through `now`'s year; the final year's `to`
/// bound is clamped to `now` rather than year-end.
#[must_use]
pub fn contributions_query(now: DateTime<Utc>) -> String {
    let current_year = now.year();
    let mut fields = String::new();

    for year in GITHUB_FOUNDING_YEAR..=current_year {
        let from = format!("{year}-01-01T00:00:00Z");
        let to = if year == current_year {
            now.to_rfc3339_opts(SecondsFormat::Secs, true)
        } else {
            format!("{year}-12-31T23:59:59Z")
        };

        fields.push_str(&format!(
            "    contributions{year}: contributionsCollection(from: \"{from}\", to: \"{to}\") {{\n      contributionCalendar {{ totalContributions }}\n    }}\n"
        ));
    }

    format!("query($login: String!) {{\n  user(login: $login) {{\n{fields}  }}\n}}")
}

/// Sum per-year contribution totals out of the batched response data.
///
/// Missing aliases are skipped rather than treated as errors; the API omits
/// years it has nothing for.
#[must_use]
pub fn sum_contributions(data: &serde_json::Value, now: DateTime<Utc>) -> u64 {
    let Some(user) = data.get("user") else {
        return 0;
    };

    (GITHUB_FOUNDING_YEAR..=now.year())
        .filter_map(|year| {
            user.get(format!("contributions{year}"))?
                .get("contributionCalendar")?
                .get("totalContributions")?
                .as_u64()
        })
        .sum()
}

/// Fetch the account's all-time contribution count.
///
/// Fatal on request failure or GraphQL errors, like every other GraphQL
/// call in the pipeline.
pub async fn total_contributions(graphql: &GraphqlClient, login: &str) -> Result<u64> {
    let now = Utc::now();
    let query = contributions_query(now);
    let data = graphql.execute(&query, json!({ "login": login })).await?;
    Ok(sum_contributions(&data, now))
}
