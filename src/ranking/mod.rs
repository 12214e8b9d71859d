//! Ranking Engine.
//!
//! Top-N rankings of category labels with share-of-subset percentages, used
//! for "top complaints" lists and treemap data. Rankings drop noise labels
//! (empty, numeric-looking, or too short); raw distributions in
//! [`crate::aggregation`] keep them.

use crate::aggregation::{percentage, LabelCounts};
use crate::core::{ReviewRecord, Sentiment};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::trace;

/// Labels made only of digits, dots and dashes are classifier noise.
static NUMERIC_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\d.-]+$").unwrap());

/// Default minimum label length for a ranked category.
pub const DEFAULT_MIN_LABEL_CHARS: usize = 3;

/// One ranked label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub label: String,
    pub count: usize,
    pub percentage_of_subset: u32,
}

/// Which labels are excluded from rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoisePolicy {
    /// Labels with fewer characters than this are dropped
    pub min_label_chars: usize,
}

impl Default for NoisePolicy {
    fn default() -> Self {
        Self {
            min_label_chars: DEFAULT_MIN_LABEL_CHARS,
        }
    }
}

impl NoisePolicy {
    pub fn new(min_label_chars: usize) -> Self {
        Self { min_label_chars }
    }

    pub fn is_noise(&self, label: &str) -> bool {
        let label = label.trim();
        label.is_empty()
            || NUMERIC_LABEL.is_match(label)
            || label.chars().count() < self.min_label_chars
    }
}

/// Noise check under the default policy.
pub fn is_noise_label(label: &str) -> bool {
    NoisePolicy::default().is_noise(label)
}

/// Category field a ranking groups by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    Primary,
    #[default]
    Final,
    CategoryType,
}

impl CategoryField {
    pub fn value<'r>(&self, record: &'r ReviewRecord) -> &'r str {
        match self {
            Self::Primary => &record.primary_category,
            Self::Final => &record.final_category,
            Self::CategoryType => &record.category_type,
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => write!(f, "primary category"),
            Self::Final => write!(f, "category"),
            Self::CategoryType => write!(f, "category type"),
        }
    }
}

/// Top `n` labels of `subset` under the default noise policy.
pub fn top_n<F>(subset: &[&ReviewRecord], key: F, n: usize) -> Vec<RankingEntry>
where
    F: Fn(&ReviewRecord) -> &str,
{
    top_n_with(subset, key, n, &NoisePolicy::default())
}

/// Top `n` labels of `subset`, dropping labels the policy treats as noise.
///
/// Entries are sorted by count descending with ties in first-encounter order.
/// Percentages are relative to the whole subset, noise included.
pub fn top_n_with<F>(
    subset: &[&ReviewRecord],
    key: F,
    n: usize,
    policy: &NoisePolicy,
) -> Vec<RankingEntry>
where
    F: Fn(&ReviewRecord) -> &str,
{
    rank_counts(
        subset.iter().map(|r| key(r)),
        subset.len(),
        n,
        policy,
    )
}

fn rank_counts<'r, I>(labels: I, total: usize, n: usize, policy: &NoisePolicy) -> Vec<RankingEntry>
where
    I: Iterator<Item = &'r str>,
{
    if total == 0 {
        return Vec::new();
    }

    let mut dropped = 0usize;
    let counts: LabelCounts = labels
        .filter(|label| {
            let noise = policy.is_noise(label);
            dropped += usize::from(noise);
            !noise
        })
        .collect();

    trace!(groups = counts.len(), dropped, "Ranked category labels");

    counts
        .into_sorted()
        .into_iter()
        .take(n)
        .map(|(label, count)| RankingEntry {
            percentage_of_subset: percentage(count, total),
            label,
            count,
        })
        .collect()
}

/// Top categories of a subset by the chosen field.
pub fn top_categories(
    subset: &[&ReviewRecord],
    field: CategoryField,
    n: usize,
    policy: &NoisePolicy,
) -> Vec<RankingEntry> {
    top_n_with(subset, |r| field.value(r), n, policy)
}

/// Most common complaints: ranks negative reviews only, with percentages
/// relative to the whole subset ("N% of customers complain about ...").
pub fn top_negative_issues(
    subset: &[&ReviewRecord],
    field: CategoryField,
    n: usize,
    policy: &NoisePolicy,
) -> Vec<RankingEntry> {
    rank_counts(
        subset
            .iter()
            .filter(|r| r.sentiment == Sentiment::Negative)
            .map(|r| field.value(r)),
        subset.len(),
        n,
        policy,
    )
}

/// Most helpful reviews of one ranked category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExampleGroup {
    pub label: String,
    pub examples: Vec<ReviewRecord>,
}

/// For each of the top `categories` labels, the `per_category` reviews with
/// the most helpful votes. Ties keep subset order.
pub fn helpful_examples(
    subset: &[&ReviewRecord],
    field: CategoryField,
    categories: usize,
    per_category: usize,
    policy: &NoisePolicy,
) -> Vec<ExampleGroup> {
    top_categories(subset, field, categories, policy)
        .into_iter()
        .map(|entry| {
            let mut members: Vec<&ReviewRecord> = subset
                .iter()
                .copied()
                .filter(|r| field.value(r) == entry.label)
                .collect();
            members.sort_by(|a, b| b.helpful_votes.cmp(&a.helpful_votes));
            ExampleGroup {
                examples: members
                    .into_iter()
                    .take(per_category)
                    .cloned()
                    .collect(),
                label: entry.label,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_category(id: usize, category: &str) -> ReviewRecord {
        ReviewRecord::new(id.to_string(), "Rogers", "iOS").with_categories(category, category)
    }

    #[test]
    fn noise_labels() {
        assert!(is_noise_label(""));
        assert!(is_noise_label("   "));
        assert!(is_noise_label("42"));
        assert!(is_noise_label("3.5"));
        assert!(is_noise_label("-1"));
        assert!(is_noise_label("UI"));
        assert!(!is_noise_label("App"));
        assert!(!is_noise_label("Billing"));
        assert!(!NoisePolicy::new(1).is_noise("A"));
        assert!(NoisePolicy::new(1).is_noise("7"));
    }

    #[test]
    fn empty_subset_yields_empty_ranking() {
        assert!(top_n(&[], |r| r.final_category.as_str(), 5).is_empty());
    }

    #[test]
    fn percentages_use_whole_subset() {
        let records: Vec<ReviewRecord> = ["Billing", "Billing", "42", ""]
            .iter()
            .enumerate()
            .map(|(i, c)| with_category(i, c))
            .collect();
        let subset: Vec<&ReviewRecord> = records.iter().collect();
        let ranking = top_categories(&subset, CategoryField::Final, 5, &NoisePolicy::default());

        assert_eq!(
            ranking,
            vec![RankingEntry {
                label: "Billing".into(),
                count: 2,
                percentage_of_subset: 50
            }]
        );
    }

    #[test]
    fn negative_issues_count_only_negative_reviews() {
        let records = [
            with_category(1, "Login").with_sentiment(Sentiment::Negative),
            with_category(2, "Login").with_sentiment(Sentiment::Positive),
            with_category(3, "Billing").with_sentiment(Sentiment::Negative),
            with_category(4, "Billing").with_sentiment(Sentiment::Negative),
        ];
        let subset: Vec<&ReviewRecord> = records.iter().collect();
        let issues = top_negative_issues(&subset, CategoryField::Final, 5, &NoisePolicy::default());

        assert_eq!(issues[0].label, "Billing");
        assert_eq!(issues[0].percentage_of_subset, 50);
        assert_eq!(issues[1].label, "Login");
        assert_eq!(issues[1].count, 1);
        assert_eq!(issues[1].percentage_of_subset, 25);
    }

    #[test]
    fn helpful_examples_prefer_votes() {
        let records = [
            with_category(1, "Billing").with_helpful_votes(1),
            with_category(2, "Billing").with_helpful_votes(9),
            with_category(3, "Billing").with_helpful_votes(9),
            with_category(4, "Login").with_helpful_votes(50),
        ];
        let subset: Vec<&ReviewRecord> = records.iter().collect();
        let groups = helpful_examples(&subset, CategoryField::Final, 1, 2, &NoisePolicy::default());

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].label, "Billing");
        let ids: Vec<&str> = groups[0].examples.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "3"]);
    }
}
