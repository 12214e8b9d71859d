//! Aggregation Engine.
//!
//! Summary statistics over any subset of records. Everything here is derived
//! on demand and never cached: callers recompute from the current subset
//! whenever the selection changes.
//!
//! Percentages are whole numbers rounded half up; an empty subset always
//! yields zeros rather than dividing by zero.

pub mod breakdown;
pub mod counts;

pub use breakdown::{
    category_breakdown, category_type_stats, CategoryBreakdown, CategoryTypeStats, SentimentTone,
};
pub use counts::LabelCounts;

use crate::core::{ReviewRecord, Sentiment};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used for records with an empty category in raw distributions.
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Rounded integer percentage of `count` in `total`; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as u32
}

/// Round to one decimal place, the precision ratings are displayed with.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Format a rating with one decimal place.
pub fn format_rating(value: f64) -> String {
    format!("{value:.1}")
}

/// Summary statistics of one subset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateResult {
    pub count: usize,
    /// Share of the parent collection this subset represents
    pub percentage_of_parent: u32,
    /// Records with a usable rating
    pub rated_count: usize,
    pub rating_sum: u64,
    /// Mean rating, or 0.0 when no record carries a rating
    pub average_rating: f64,
    pub negative_count: usize,
    pub negative_rate: u32,
    pub positive_count: usize,
    pub positive_rate: u32,
    pub cs_impact_count: usize,
    pub cs_impact_rate: u32,
    pub sentiment_sum: i64,
    /// Records with a known sentiment
    pub sentiment_count: usize,
    pub sentiment_score: Option<f64>,
    pub severity_sum: f64,
    pub severity_count: usize,
    pub technical_severity_average: Option<f64>,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn has_ratings(&self) -> bool {
        self.rated_count > 0
    }

    /// Average rating, or `fallback` (e.g. a precomputed global average) when
    /// the subset has no ratings.
    pub fn average_rating_or(&self, fallback: f64) -> f64 {
        if self.has_ratings() {
            self.average_rating
        } else {
            fallback
        }
    }

    /// Average rating rounded to one decimal.
    pub fn display_rating(&self) -> f64 {
        round_to_tenth(self.average_rating)
    }

    pub fn formatted_rating(&self) -> String {
        format_rating(self.average_rating)
    }
}

/// Aggregate a subset as its own parent.
pub fn aggregate(subset: &[&ReviewRecord]) -> AggregateResult {
    aggregate_within(subset, subset.len())
}

/// Aggregate a subset, reporting its share of a parent of `parent_count` records.
pub fn aggregate_within(subset: &[&ReviewRecord], parent_count: usize) -> AggregateResult {
    let count = subset.len();

    let mut rated_count = 0usize;
    let mut rating_sum = 0u64;
    let mut negative_count = 0usize;
    let mut positive_count = 0usize;
    let mut cs_impact_count = 0usize;
    let mut sentiment_sum = 0i64;
    let mut sentiment_count = 0usize;
    let mut severity_sum = 0.0f64;
    let mut severity_count = 0usize;

    for record in subset {
        if let Some(rating) = record.rating {
            rated_count += 1;
            rating_sum += u64::from(rating);
        }
        match record.sentiment {
            Sentiment::Negative => negative_count += 1,
            Sentiment::Positive => positive_count += 1,
            _ => {}
        }
        if let Some(score) = record.sentiment.score() {
            sentiment_sum += score;
            sentiment_count += 1;
        }
        if record.customer_service_impact {
            cs_impact_count += 1;
        }
        if let Some(severity) = record.technical_severity {
            severity_sum += severity;
            severity_count += 1;
        }
    }

    AggregateResult {
        count,
        percentage_of_parent: percentage(count, parent_count),
        rated_count,
        rating_sum,
        average_rating: mean(rating_sum as f64, rated_count).unwrap_or(0.0),
        negative_count,
        negative_rate: percentage(negative_count, count),
        positive_count,
        positive_rate: percentage(positive_count, count),
        cs_impact_count,
        cs_impact_rate: percentage(cs_impact_count, count),
        sentiment_sum,
        sentiment_count,
        sentiment_score: mean(sentiment_sum as f64, sentiment_count),
        severity_sum,
        severity_count,
        technical_severity_average: mean(severity_sum, severity_count),
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Rounded share of records in `subset` satisfying `predicate`.
pub fn share_where<F>(subset: &[&ReviewRecord], predicate: F) -> u32
where
    F: Fn(&ReviewRecord) -> bool,
{
    let matching = subset.iter().filter(|r| predicate(r)).count();
    percentage(matching, subset.len())
}

/// Sentiment counts in first-encounter order.
pub fn sentiment_distribution(subset: &[&ReviewRecord]) -> Vec<(String, usize)> {
    let counts: LabelCounts = subset.iter().map(|r| r.sentiment.as_str()).collect();
    counts.into_entries()
}

/// Counts per star rating; records without a rating are not bucketed.
pub fn rating_distribution(subset: &[&ReviewRecord]) -> BTreeMap<u8, usize> {
    subset
        .iter()
        .filter_map(|r| r.rating)
        .fold(BTreeMap::new(), |mut acc, rating| {
            *acc.entry(rating).or_insert(0) += 1;
            acc
        })
}

/// Raw category counts in first-encounter order.
///
/// Unlike rankings, nothing is dropped here: empty labels are reported as
/// [`UNKNOWN_LABEL`] and numeric-looking labels are kept as they are.
pub fn category_distribution<F>(subset: &[&ReviewRecord], key: F) -> Vec<(String, usize)>
where
    F: Fn(&ReviewRecord) -> &str,
{
    let counts: LabelCounts = subset
        .iter()
        .map(|r| {
            let label = key(r);
            if label.is_empty() {
                UNKNOWN_LABEL
            } else {
                label
            }
        })
        .collect();
    counts.into_entries()
}

/// Per-year volume and sentiment, for trend charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearTrend {
    pub year: String,
    pub count: usize,
    pub average_rating: f64,
    pub negative_pct: u32,
    pub positive_pct: u32,
}

/// Trends grouped by effective year, ascending. Records without a year are skipped.
pub fn yearly_trends(subset: &[&ReviewRecord]) -> Vec<YearTrend> {
    let mut by_year: BTreeMap<String, Vec<&ReviewRecord>> = BTreeMap::new();
    for record in subset {
        if let Some(year) = record.effective_year() {
            by_year.entry(year).or_default().push(record);
        }
    }

    by_year
        .into_iter()
        .map(|(year, records)| {
            let stats = aggregate(&records);
            YearTrend {
                year,
                count: stats.count,
                average_rating: stats.display_rating(),
                negative_pct: stats.negative_rate,
                positive_pct: stats.positive_rate,
            }
        })
        .collect()
}
