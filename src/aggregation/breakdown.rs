//! Per-category tables: the issues breakdown and category-type statistics.

use super::{aggregate_within, round_to_tenth, LabelCounts};
use crate::core::{Priority, ReviewRecord};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const UNCATEGORIZED_LABEL: &str = "Uncategorized";
pub const GENERAL_LABEL: &str = "General";
pub const NOT_SPECIFIED_LABEL: &str = "Not Specified";

/// Overall tone of a category's sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SentimentTone {
    Positive,
    Neutral,
    Negative,
}

impl SentimentTone {
    /// Scores above 0.1 read as positive, below -0.1 as negative.
    pub fn from_score(score: f64) -> Self {
        if score > 0.1 {
            Self::Positive
        } else if score < -0.1 {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for SentimentTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Neutral => write!(f, "neutral"),
            Self::Negative => write!(f, "negative"),
        }
    }
}

/// Band for the share of a category's reviews that affect customer service.
pub fn impact_band(impact_pct: u32) -> Priority {
    match impact_pct {
        p if p >= 70 => Priority::Critical,
        p if p >= 40 => Priority::High,
        p if p >= 20 => Priority::Medium,
        _ => Priority::Low,
    }
}

/// Band for an average technical severity, judged on its one-decimal value.
pub fn severity_band(severity: f64) -> Priority {
    let severity = round_to_tenth(severity);
    if severity >= 4.5 {
        Priority::Critical
    } else if severity >= 3.5 {
        Priority::High
    } else if severity >= 2.5 {
        Priority::Medium
    } else {
        Priority::Low
    }
}

/// One row of the issues table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: usize,
    pub percentage: u32,
    /// Mean sentiment score; 0.0 when no review has a known sentiment
    pub average_sentiment: f64,
    pub tone: SentimentTone,
    pub impact_pct: u32,
    pub impact_band: Priority,
    pub technical_severity: Option<f64>,
    pub severity_band: Option<Priority>,
}

/// Group a subset by a label, largest group first; equal sizes keep
/// first-encounter order.
fn group_by<'a, F>(subset: &[&'a ReviewRecord], key: F) -> IndexMap<String, Vec<&'a ReviewRecord>>
where
    F: Fn(&ReviewRecord) -> &str,
{
    let mut groups: IndexMap<String, Vec<&'a ReviewRecord>> = IndexMap::new();
    for &record in subset {
        groups.entry(key(record).to_string()).or_default().push(record);
    }
    groups.sort_by(|_, a, _, b| b.len().cmp(&a.len()));
    groups
}

/// Issues table over final categories, largest first.
///
/// Records without a final category are grouped as `"Uncategorized"`.
pub fn category_breakdown(subset: &[&ReviewRecord]) -> Vec<CategoryBreakdown> {
    group_by(subset, |r| {
        if r.final_category.is_empty() {
            UNCATEGORIZED_LABEL
        } else {
            r.final_category.as_str()
        }
    })
    .into_iter()
    .map(|(category, members)| {
        let stats = aggregate_within(&members, subset.len());
        let average_sentiment = stats
            .sentiment_score
            .map(|s| (s * 100.0).round() / 100.0)
            .unwrap_or(0.0);
        let technical_severity = stats.technical_severity_average.map(round_to_tenth);
        CategoryBreakdown {
            category,
            count: stats.count,
            percentage: stats.percentage_of_parent,
            average_sentiment,
            tone: SentimentTone::from_score(average_sentiment),
            impact_pct: stats.cs_impact_rate,
            impact_band: impact_band(stats.cs_impact_rate),
            technical_severity,
            severity_band: technical_severity.map(severity_band),
        }
    })
    .collect()
}

/// Health of one category type (App-Related, Service-Related, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTypeStats {
    pub category_type: String,
    pub count: usize,
    pub percentage: u32,
    pub negative_pct: u32,
    pub average_rating: f64,
    /// Most frequent `actionable_by` team, `"Not Specified"` when none is set
    pub main_actionable_by: String,
}

pub fn category_type_stats(subset: &[&ReviewRecord]) -> Vec<CategoryTypeStats> {
    group_by(subset, |r| {
        if r.category_type.is_empty() {
            GENERAL_LABEL
        } else {
            r.category_type.as_str()
        }
    })
    .into_iter()
    .map(|(category_type, members)| {
        let stats = aggregate_within(&members, subset.len());
        let teams: LabelCounts = members
            .iter()
            .filter_map(|r| r.actionable_by.as_deref())
            .filter(|team| !team.is_empty())
            .collect();
        let main_actionable_by = teams
            .into_sorted()
            .into_iter()
            .next()
            .map(|(team, _)| team)
            .unwrap_or_else(|| NOT_SPECIFIED_LABEL.to_string());

        CategoryTypeStats {
            category_type,
            count: stats.count,
            percentage: stats.percentage_of_parent,
            negative_pct: stats.negative_rate,
            average_rating: stats.display_rating(),
            main_actionable_by,
        }
    })
    .collect()
}
