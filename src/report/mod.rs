//! Report pipeline.
//!
//! Runs the whole dashboard computation from scratch for one set of criteria:
//! filter → aggregate and rank → compare → narrate. Nothing is cached between
//! runs; a new selection means a new report.

use crate::aggregation::{
    aggregate_within, category_breakdown, category_distribution, category_type_stats,
    rating_distribution, sentiment_distribution, yearly_trends, AggregateResult,
    CategoryBreakdown, CategoryTypeStats, LabelCounts, YearTrend,
};
use crate::comparison::{
    default_issue_groups, split_sides, Comparator, ComparisonDimension, ComparisonResult,
    InsightPolicy, IssueGroup, Side,
};
use crate::core::ReviewRecord;
use crate::filter::{filter_with_stats, FilterCriteria, FilterStatistics};
use crate::insights::{
    analyze_flows, default_flows, overview_insights, segment_insights, FlowDefinition, FlowStats,
    Insight, InsightContext,
};
use crate::ranking::{
    helpful_examples, top_categories, top_negative_issues, CategoryField, ExampleGroup,
    NoisePolicy, RankingEntry,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info_span};

pub const DEFAULT_TOP_N: usize = 5;
const EXAMPLES_PER_CATEGORY: usize = 2;

/// An explicit two-way comparison to include in a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    pub dimension: ComparisonDimension,
    pub left: String,
    pub right: String,
}

/// Knobs of the pipeline, usually derived from configuration.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub top_n: usize,
    pub field: CategoryField,
    pub policy: InsightPolicy,
    pub noise: NoisePolicy,
    pub issue_groups: Vec<IssueGroup>,
    pub flows: Vec<FlowDefinition>,
    /// Explicit comparisons; when empty the two largest values of each
    /// dimension are compared
    pub comparisons: Vec<ComparisonRequest>,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            field: CategoryField::Final,
            policy: InsightPolicy::default(),
            noise: NoisePolicy::default(),
            issue_groups: default_issue_groups(),
            flows: default_flows(),
            comparisons: Vec::new(),
        }
    }
}

impl ReportOptions {
    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.policy.clone(), self.issue_groups.clone())
            .with_noise_policy(self.noise)
            .with_field(self.field)
            .with_top_n(self.top_n)
    }

    fn insight_context(&self) -> InsightContext<'_> {
        InsightContext::new(&self.policy, &self.noise)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub total_records: usize,
    pub active_filters: Vec<String>,
}

/// Insights for one app or platform slice of the filtered view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub dimension: ComparisonDimension,
    pub label: String,
    pub insights: Vec<Insight>,
}

/// Everything the dashboard renders for one selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub metadata: ReportMetadata,
    pub filter_statistics: FilterStatistics,
    pub summary: AggregateResult,
    pub sentiment_distribution: Vec<(String, usize)>,
    pub rating_distribution: BTreeMap<u8, usize>,
    pub category_distribution: Vec<(String, usize)>,
    pub yearly_trends: Vec<YearTrend>,
    pub top_categories: Vec<RankingEntry>,
    pub top_negative_issues: Vec<RankingEntry>,
    pub category_breakdown: Vec<CategoryBreakdown>,
    pub category_type_stats: Vec<CategoryTypeStats>,
    pub helpful_examples: Vec<ExampleGroup>,
    pub flows: Vec<FlowStats>,
    pub overview: Vec<Insight>,
    pub segments: Vec<SegmentReport>,
    pub comparisons: Vec<ComparisonResult>,
}

impl DashboardReport {
    pub fn is_empty(&self) -> bool {
        self.summary.is_empty()
    }
}

/// Build the full report for `criteria` over the immutable `records`.
pub fn build_report(
    records: &[ReviewRecord],
    criteria: &FilterCriteria,
    options: &ReportOptions,
) -> DashboardReport {
    let _span = info_span!("build_report", records = records.len()).entered();

    let all: Vec<&ReviewRecord> = records.iter().collect();
    let outcome = filter_with_stats(records, criteria);
    let subset = outcome.subset;
    let ctx = options.insight_context();

    let comparisons = run_comparisons(&subset, options);
    let segments = segment_reports(&subset, ctx);

    debug!(
        matched = subset.len(),
        comparisons = comparisons.len(),
        segments = segments.len(),
        "Built dashboard report"
    );

    DashboardReport {
        metadata: ReportMetadata {
            generated_at: Utc::now(),
            total_records: records.len(),
            active_filters: criteria.describe(),
        },
        filter_statistics: outcome.statistics,
        summary: aggregate_within(&subset, records.len()),
        sentiment_distribution: sentiment_distribution(&subset),
        rating_distribution: rating_distribution(&subset),
        category_distribution: category_distribution(&subset, |r| options.field.value(r)),
        yearly_trends: yearly_trends(&subset),
        top_categories: top_categories(&subset, options.field, options.top_n, &options.noise),
        top_negative_issues: top_negative_issues(
            &subset,
            options.field,
            options.top_n,
            &options.noise,
        ),
        category_breakdown: category_breakdown(&subset),
        category_type_stats: category_type_stats(&subset),
        helpful_examples: helpful_examples(
            &subset,
            options.field,
            options.top_n,
            EXAMPLES_PER_CATEGORY,
            &options.noise,
        ),
        flows: analyze_flows(&subset, &options.flows),
        overview: overview_insights(&all, &subset, criteria.is_active(), ctx),
        segments,
        comparisons,
    }
}

/// Run one comparison over an already filtered subset.
pub fn compare_within(
    subset: &[&ReviewRecord],
    request: &ComparisonRequest,
    comparator: &Comparator,
) -> ComparisonResult {
    let (left, right) = split_sides(subset, request.dimension, &request.left, &request.right);
    comparator.compare(
        Side::new(&request.left, &left),
        Side::new(&request.right, &right),
        request.dimension,
    )
}

fn run_comparisons(subset: &[&ReviewRecord], options: &ReportOptions) -> Vec<ComparisonResult> {
    let requests = if options.comparisons.is_empty() {
        auto_comparisons(subset)
    } else {
        options.comparisons.clone()
    };
    let comparator = options.comparator();
    requests
        .iter()
        .map(|request| compare_within(subset, request, &comparator))
        .collect()
}

/// The two most frequent values of each dimension, where there are two.
pub fn auto_comparisons(subset: &[&ReviewRecord]) -> Vec<ComparisonRequest> {
    [
        ComparisonDimension::App,
        ComparisonDimension::Platform,
        ComparisonDimension::CategoryType,
    ]
    .into_iter()
    .filter_map(|dimension| {
        let mut values = distinct_values(subset, dimension).into_iter();
        match (values.next(), values.next()) {
            (Some(left), Some(right)) => Some(ComparisonRequest {
                dimension,
                left,
                right,
            }),
            _ => None,
        }
    })
    .collect()
}

/// Non-empty values of a dimension, most frequent first.
fn distinct_values(subset: &[&ReviewRecord], dimension: ComparisonDimension) -> Vec<String> {
    let counts: LabelCounts = subset
        .iter()
        .map(|r| dimension_value(r, dimension))
        .filter(|value| !value.is_empty())
        .collect();
    counts.into_sorted().into_iter().map(|(value, _)| value).collect()
}

fn dimension_value(record: &ReviewRecord, dimension: ComparisonDimension) -> &str {
    match dimension {
        ComparisonDimension::App => &record.app_name,
        ComparisonDimension::Platform => &record.platform,
        ComparisonDimension::CategoryType => &record.category_type,
    }
}

fn segment_reports(subset: &[&ReviewRecord], ctx: InsightContext<'_>) -> Vec<SegmentReport> {
    let mut reports = Vec::new();
    for dimension in [ComparisonDimension::App, ComparisonDimension::Platform] {
        for value in distinct_values(subset, dimension) {
            let slice: Vec<&ReviewRecord> = subset
                .iter()
                .copied()
                .filter(|r| dimension_value(r, dimension) == value)
                .collect();
            let market_total =
                (dimension == ComparisonDimension::Platform).then_some(subset.len());
            reports.push(SegmentReport {
                dimension,
                insights: segment_insights(&value, &slice, market_total, ctx),
                label: value,
            });
        }
    }
    reports
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sentiment;

    fn dataset() -> Vec<ReviewRecord> {
        vec![
            ReviewRecord::new("1", "Rogers", "iOS")
                .with_rating(1)
                .with_sentiment(Sentiment::Negative)
                .with_categories("Login Problems", "Authentication")
                .with_text("cannot login"),
            ReviewRecord::new("2", "Rogers", "Android")
                .with_rating(4)
                .with_sentiment(Sentiment::Positive)
                .with_categories("Billing", "Billing"),
            ReviewRecord::new("3", "Bell", "iOS")
                .with_rating(2)
                .with_sentiment(Sentiment::Negative)
                .with_categories("Billing", "Billing")
                .with_text("bill was wrong"),
        ]
    }

    #[test]
    fn unfiltered_report_covers_everything() {
        let records = dataset();
        let report = build_report(&records, &FilterCriteria::all(), &ReportOptions::default());

        assert_eq!(report.summary.count, 3);
        assert_eq!(report.summary.percentage_of_parent, 100);
        assert!(report.metadata.active_filters.is_empty());
        assert_eq!(report.top_categories[0].label, "Billing");
        assert_eq!(report.comparisons.len(), 2);
        assert_eq!(report.overview[0].title, "Complete Analysis Coverage");
    }

    #[test]
    fn filtered_report_uses_subset() {
        let records = dataset();
        let criteria = FilterCriteria::all().with_app("Rogers");
        let report = build_report(&records, &criteria, &ReportOptions::default());

        assert_eq!(report.summary.count, 2);
        assert_eq!(report.summary.percentage_of_parent, 67);
        assert_eq!(report.metadata.active_filters, vec!["App: Rogers"]);
        assert_eq!(report.filter_statistics.total_rejected(), 1);
        // one app left, so only the platform comparison remains
        assert_eq!(report.comparisons.len(), 1);
        assert_eq!(report.comparisons[0].dimension, ComparisonDimension::Platform);
    }

    #[test]
    fn empty_selection_still_reports() {
        let records = dataset();
        let criteria = FilterCriteria::all().with_category("Roaming");
        let report = build_report(&records, &criteria, &ReportOptions::default());

        assert!(report.is_empty());
        assert!(report.top_categories.is_empty());
        assert!(report.comparisons.is_empty());
        assert_eq!(report.overview[0].title, "No Matching Reviews");
    }

    #[test]
    fn explicit_comparisons_replace_automatic_ones() {
        let records = dataset();
        let options = ReportOptions {
            comparisons: vec![ComparisonRequest {
                dimension: ComparisonDimension::App,
                left: "Bell".into(),
                right: "Rogers".into(),
            }],
            ..ReportOptions::default()
        };
        let report = build_report(&records, &FilterCriteria::all(), &options);
        assert_eq!(report.comparisons.len(), 1);
        assert_eq!(report.comparisons[0].left.label, "Bell");
    }
}
