//! Language distribution over a repository subset.

use std::collections::HashMap;

use super::harvest::Repository;
use super::types::Language;

/// Languages below this share of the subset total collapse into "Other".
pub const OTHER_THRESHOLD_PERCENT: f64 = 1.0;

/// Name of the synthetic catch-all entry.
pub const OTHER_LANGUAGE_NAME: &str = "Other";

/// Compute the language distribution for one repository subset.
///
/// Byte sizes are summed per language across the subset and converted to
/// percentages of the subset total, so the result is only meaningful for the
/// subset it was computed from. Entries under the 1% threshold fold into a
/// trailing "Other" entry, appended after the descending sort and only when
/// the folded share is positive. Ties sort by name so repeated runs agree.
#[must_use]
pub fn language_breakdown(repos: &[&Repository]) -> Vec<Language> {
    let mut bytes_by_name: HashMap<&str, u64> = HashMap::new();
    let mut total_bytes: u64 = 0;

    for repo in repos {
        for (name, size) in &repo.languages {
            *bytes_by_name.entry(name.as_str()).or_default() += size;
            total_bytes += size;
        }
    }

    if total_bytes == 0 {
        return Vec::new();
    }

    let mut languages: Vec<Language> = bytes_by_name
        .into_iter()
        .map(|(name, bytes)| Language {
            name: name.to_string(),
            percentage: bytes as f64 / total_bytes as f64 * 100.0,
        })
        .collect();

    languages.sort_by(|a, b| {
        b.percentage
            .partial_cmp(&a.percentage)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let mut other_percentage = 0.0;
    languages.retain(|lang| {
        if lang.percentage >= OTHER_THRESHOLD_PERCENT {
            true
        } else {
            other_percentage += lang.percentage;
            false
        }
    });

    if other_percentage > 0.0 {
        languages.push(Language {
            name: OTHER_LANGUAGE_NAME.to_string(),
            percentage: other_percentage,
        });
    }

    languages
}
