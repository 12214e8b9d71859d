//! Narrative insights over a single subset.
//!
//! Segment health for one app or platform slice, the filtered-view overview,
//! and user-flow analysis. Two-sided findings live in [`crate::comparison`].

pub mod flows;

pub use flows::{analyze_flows, default_flows, FlowDefinition, FlowStats};

use crate::aggregation::{aggregate, format_rating, percentage, AggregateResult};
use crate::comparison::InsightPolicy;
use crate::core::{Priority, ReviewRecord};
use crate::ranking::{top_categories, CategoryField, NoisePolicy, RankingEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A prioritized narrative statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    pub priority: Priority,
    pub title: String,
    pub message: String,
}

impl Insight {
    pub fn new(priority: Priority, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            priority,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Health band of a segment's negative share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentHealth {
    Critical,
    Concerning,
    Stable,
}

impl SegmentHealth {
    /// Strictly above the critical band is critical, strictly above the concern band concerning.
    pub fn classify(negative_pct: u32, policy: &InsightPolicy) -> Self {
        if negative_pct > policy.segment_critical_negative_pct {
            Self::Critical
        } else if negative_pct > policy.segment_concern_negative_pct {
            Self::Concerning
        } else {
            Self::Stable
        }
    }
}

/// Rating band judged on the one-decimal display value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RatingBand {
    Low,
    BelowAverage,
    Good,
}

impl RatingBand {
    pub fn classify(display_rating: f64, policy: &InsightPolicy) -> Self {
        if display_rating < policy.low_rating {
            Self::Low
        } else if display_rating < policy.below_average_rating {
            Self::BelowAverage
        } else {
            Self::Good
        }
    }
}

/// Shared inputs for the insight builders.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'p> {
    pub policy: &'p InsightPolicy,
    pub noise: &'p NoisePolicy,
}

impl<'p> InsightContext<'p> {
    pub fn new(policy: &'p InsightPolicy, noise: &'p NoisePolicy) -> Self {
        Self { policy, noise }
    }

    fn top_issue(&self, subset: &[&ReviewRecord]) -> Option<RankingEntry> {
        top_categories(subset, CategoryField::Primary, 1, self.noise)
            .into_iter()
            .next()
    }
}

/// Insights for one app or platform slice.
///
/// `market_total` is the size of the collection the slice was cut from; when
/// given, a market-share insight is added.
pub fn segment_insights(
    label: &str,
    subset: &[&ReviewRecord],
    market_total: Option<usize>,
    ctx: InsightContext<'_>,
) -> Vec<Insight> {
    if subset.is_empty() {
        return Vec::new();
    }
    let stats = aggregate(subset);
    let negative = stats.negative_rate;
    let mut insights = Vec::new();

    insights.push(match SegmentHealth::classify(negative, ctx.policy) {
        SegmentHealth::Critical => Insight::new(
            Priority::High,
            "Critical Performance Issues",
            format!(
                "{label} has {negative}% negative sentiment - immediate attention required to address customer satisfaction."
            ),
        ),
        SegmentHealth::Concerning => Insight::new(
            Priority::Medium,
            "Performance Concerns",
            format!("{label} shows {negative}% negative sentiment and needs improvement."),
        ),
        SegmentHealth::Stable => Insight::new(
            Priority::Low,
            "Stable Performance",
            format!(
                "{label} maintains {negative}% negative sentiment, within the acceptable range."
            ),
        ),
    });

    if let Some(top) = ctx.top_issue(subset) {
        insights.push(Insight::new(
            Priority::Medium,
            "Primary Complaint",
            format!(
                "\"{}\" dominates complaints with {} reports ({}%) - focus area for improvement.",
                top.label, top.count, top.percentage_of_subset
            ),
        ));
    }

    if stats.has_ratings() {
        insights.push(rating_insight(&stats, ctx.policy));
    }

    if let Some(total) = market_total {
        insights.push(Insight::new(
            Priority::Low,
            "Market Share",
            format!(
                "{label} accounts for {}% of reviews ({} of {total}).",
                percentage(stats.count, total),
                stats.count
            ),
        ));
    }

    insights
}

fn rating_insight(stats: &AggregateResult, policy: &InsightPolicy) -> Insight {
    let rating = stats.formatted_rating();
    match RatingBand::classify(stats.display_rating(), policy) {
        RatingBand::Low => Insight::new(
            Priority::High,
            "Low User Satisfaction",
            format!(
                "Average rating of {rating}/5 indicates severe user dissatisfaction - comprehensive review needed."
            ),
        ),
        RatingBand::BelowAverage => Insight::new(
            Priority::Medium,
            "Below Average Rating",
            format!(
                "Rating of {rating}/5 suggests room for significant improvement in user experience."
            ),
        ),
        RatingBand::Good => Insight::new(
            Priority::Low,
            "Good User Rating",
            format!("Rating of {rating}/5 shows generally positive user reception."),
        ),
    }
}

/// Overview of the current view.
///
/// `filtered` is true when any filter constraint is active; `subset` is the
/// filtered view and `all` the full collection.
pub fn overview_insights(
    all: &[&ReviewRecord],
    subset: &[&ReviewRecord],
    filtered: bool,
    ctx: InsightContext<'_>,
) -> Vec<Insight> {
    match (filtered, subset.is_empty()) {
        (true, false) => filtered_overview(all, subset, ctx),
        (true, true) => vec![
            Insight::new(
                Priority::High,
                "No Matching Reviews",
                "No reviews match the current filter combination. Try adjusting the filters to explore different data segments.",
            ),
            Insight::new(
                Priority::Low,
                "Suggestion",
                "Consider broadening the search by removing one or more filters, or try different combinations.",
            ),
        ],
        (false, _) => dataset_overview(all, ctx),
    }
}

fn filtered_overview(
    all: &[&ReviewRecord],
    subset: &[&ReviewRecord],
    ctx: InsightContext<'_>,
) -> Vec<Insight> {
    let stats = aggregate(subset);
    let baseline = aggregate(all);
    let mut insights = vec![Insight::new(
        Priority::Low,
        "Filtered Analysis",
        format!(
            "Showing {} reviews matching the filters from the complete dataset of {} reviews.",
            stats.count, baseline.count
        ),
    )];

    let verdict = if stats.negative_rate > ctx.policy.overall_alert_negative_pct {
        "worse than average"
    } else {
        "better than average"
    };
    insights.push(Insight::new(
        Priority::Medium,
        "Filtered Sentiment Impact",
        format!(
            "{}% negative sentiment in filtered results compared to {}% overall - {verdict}.",
            stats.negative_rate, baseline.negative_rate
        ),
    ));

    if stats.has_ratings() {
        let relation = if stats.display_rating() < baseline.display_rating() {
            "below"
        } else {
            "above"
        };
        insights.push(Insight::new(
            Priority::Medium,
            "Filtered Rating Analysis",
            format!(
                "Average rating: {}/5 in filtered results vs {}/5 overall - {relation} average performance.",
                stats.formatted_rating(),
                format_rating(baseline.average_rating)
            ),
        ));
    }

    if let Some(top) = ctx.top_issue(subset) {
        insights.push(Insight::new(
            Priority::Medium,
            "Top Issue in Selection",
            format!(
                "\"{}\" dominates with {} reports ({}%) in the filtered selection.",
                top.label, top.count, top.percentage_of_subset
            ),
        ));
    }

    let coverage = if stats.count < ctx.policy.small_sample_size {
        "limited but focused"
    } else {
        "robust"
    };
    insights.push(Insight::new(
        Priority::Low,
        "Filter Insight",
        format!(
            "This filter combination represents {}% of the complete dataset, providing {coverage} insights.",
            percentage(stats.count, baseline.count)
        ),
    ));

    insights
}

fn dataset_overview(all: &[&ReviewRecord], ctx: InsightContext<'_>) -> Vec<Insight> {
    if all.is_empty() {
        return vec![Insight::new(
            Priority::High,
            "No Reviews Loaded",
            "The dataset contains no reviews.",
        )];
    }

    let stats = aggregate(all);
    let apps: BTreeSet<&str> = all.iter().map(|r| r.app_name.as_str()).collect();
    let platforms: BTreeSet<&str> = all.iter().map(|r| r.platform.as_str()).collect();

    let mut insights = vec![Insight::new(
        Priority::Low,
        "Complete Analysis Coverage",
        format!(
            "Analysis of {} customer reviews across {} apps and {} platforms.",
            stats.count,
            apps.len(),
            platforms.len()
        ),
    )];

    if let Some(top) = ctx.top_issue(all) {
        insights.push(Insight::new(
            Priority::High,
            "Critical Issue Priority",
            format!(
                "{} leads with {} reports ({}%).",
                top.label, top.count, top.percentage_of_subset
            ),
        ));
    }

    insights.extend(segment_insights("The dataset", all, None, ctx).into_iter().take(1));
    if stats.has_ratings() {
        insights.push(rating_insight(&stats, ctx.policy));
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sentiment;

    fn records(negative: usize, total: usize) -> Vec<ReviewRecord> {
        (0..total)
            .map(|i| {
                let (sentiment, rating) = if i < negative {
                    (Sentiment::Negative, 1)
                } else {
                    (Sentiment::Positive, 4)
                };
                ReviewRecord::new(i.to_string(), "Rogers", "iOS")
                    .with_sentiment(sentiment)
                    .with_rating(rating)
                    .with_categories("Technical Issues", "Technical Issues")
            })
            .collect()
    }

    fn ctx_parts() -> (InsightPolicy, NoisePolicy) {
        (InsightPolicy::default(), NoisePolicy::default())
    }

    #[test]
    fn segment_bands_are_strict() {
        let policy = InsightPolicy::default();
        assert_eq!(SegmentHealth::classify(61, &policy), SegmentHealth::Critical);
        assert_eq!(SegmentHealth::classify(60, &policy), SegmentHealth::Concerning);
        assert_eq!(SegmentHealth::classify(41, &policy), SegmentHealth::Concerning);
        assert_eq!(SegmentHealth::classify(40, &policy), SegmentHealth::Stable);
    }

    #[test]
    fn rating_bands() {
        let policy = InsightPolicy::default();
        assert_eq!(RatingBand::classify(2.4, &policy), RatingBand::Low);
        assert_eq!(RatingBand::classify(2.5, &policy), RatingBand::BelowAverage);
        assert_eq!(RatingBand::classify(3.5, &policy), RatingBand::Good);
    }

    #[test]
    fn segment_insights_cover_health_issue_rating_share() {
        let data = records(7, 10);
        let subset: Vec<&ReviewRecord> = data.iter().collect();
        let (policy, noise) = ctx_parts();
        let insights =
            segment_insights("Rogers", &subset, Some(20), InsightContext::new(&policy, &noise));

        let titles: Vec<&str> = insights.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Critical Performance Issues",
                "Primary Complaint",
                "Low User Satisfaction",
                "Market Share"
            ]
        );
        assert!(insights[3].message.contains("50%"));
    }

    #[test]
    fn empty_filtered_view_explains_no_matches() {
        let data = records(1, 3);
        let all: Vec<&ReviewRecord> = data.iter().collect();
        let (policy, noise) = ctx_parts();
        let insights = overview_insights(&all, &[], true, InsightContext::new(&policy, &noise));
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].title, "No Matching Reviews");
    }

    #[test]
    fn small_filtered_view_is_limited_but_focused() {
        let data = records(2, 12);
        let all: Vec<&ReviewRecord> = data.iter().collect();
        let subset: Vec<&ReviewRecord> = all[..3].to_vec();
        let (policy, noise) = ctx_parts();
        let insights = overview_insights(&all, &subset, true, InsightContext::new(&policy, &noise));

        let last = insights.last().unwrap();
        assert_eq!(last.title, "Filter Insight");
        assert!(last.message.contains("limited but focused"));
        assert!(insights[1].message.contains("worse than average"));
    }

    #[test]
    fn unfiltered_view_describes_dataset() {
        let data = records(2, 12);
        let all: Vec<&ReviewRecord> = data.iter().collect();
        let (policy, noise) = ctx_parts();
        let insights = overview_insights(&all, &all, false, InsightContext::new(&policy, &noise));
        assert_eq!(insights[0].title, "Complete Analysis Coverage");
        assert!(insights[0].message.contains("12 customer reviews"));
    }
}
