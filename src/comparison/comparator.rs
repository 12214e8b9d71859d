use crate::aggregation::{aggregate, percentage};
use crate::core::{Priority, ReviewRecord, Subset};
use crate::filter::{filter_records, FilterCriteria, Selection};
use crate::ranking::{top_categories, CategoryField, NoisePolicy};
use tracing::debug;

use super::policy::{default_issue_groups, InsightPolicy, IssueGroup};
use super::types::*;

/// One side of a comparison: a label and the records it covers.
#[derive(Debug, Clone, Copy)]
pub struct Side<'a> {
    pub label: &'a str,
    pub records: &'a [&'a ReviewRecord],
}

impl<'a> Side<'a> {
    pub fn new(label: &'a str, records: &'a [&'a ReviewRecord]) -> Self {
        Self { label, records }
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn count_where<F: Fn(&ReviewRecord) -> bool>(&self, predicate: F) -> usize {
        self.records.iter().filter(|r| predicate(r)).count()
    }
}

/// Split `records` into the two sides of a comparison along `dimension`.
///
/// Side values are matched literally; `"all"` or a blank value names a side,
/// it never lifts the constraint.
pub fn split_sides<'a>(
    records: &[&'a ReviewRecord],
    dimension: ComparisonDimension,
    left: &str,
    right: &str,
) -> (Subset<'a>, Subset<'a>) {
    let side = |value: &str| {
        let only = Selection::Only(value.to_string());
        let criteria = match dimension {
            ComparisonDimension::App => FilterCriteria {
                app_name: only,
                ..FilterCriteria::all()
            },
            ComparisonDimension::Platform => FilterCriteria {
                platform: only,
                ..FilterCriteria::all()
            },
            ComparisonDimension::CategoryType => FilterCriteria {
                category_type: only,
                ..FilterCriteria::all()
            },
        };
        filter_records(records.iter().copied(), &criteria)
    };
    (side(left), side(right))
}

/// Runs aggregation and ranking on both sides and applies the threshold rules.
#[derive(Debug, Clone)]
pub struct Comparator {
    policy: InsightPolicy,
    issue_groups: Vec<IssueGroup>,
    noise: NoisePolicy,
    field: CategoryField,
    top_n: usize,
}

impl Default for Comparator {
    fn default() -> Self {
        Self {
            policy: InsightPolicy::default(),
            issue_groups: default_issue_groups(),
            noise: NoisePolicy::default(),
            field: CategoryField::Final,
            top_n: 5,
        }
    }
}

impl Comparator {
    pub fn new(policy: InsightPolicy, issue_groups: Vec<IssueGroup>) -> Self {
        Self {
            policy,
            issue_groups,
            ..Self::default()
        }
    }

    pub fn with_noise_policy(mut self, noise: NoisePolicy) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_field(mut self, field: CategoryField) -> Self {
        self.field = field;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = top_n;
        self
    }

    /// Perform full comparison
    pub fn compare(
        &self,
        left: Side<'_>,
        right: Side<'_>,
        dimension: ComparisonDimension,
    ) -> ComparisonResult {
        let left_summary = self.summarize(&left);
        let right_summary = self.summarize(&right);

        let both_present = !left.is_empty() && !right.is_empty();
        let (l, r) = (&left_summary.stats, &right_summary.stats);
        let negative_rate_gap = both_present.then(|| l.negative_rate.abs_diff(r.negative_rate));
        let rating_gap = (l.has_ratings() && r.has_ratings())
            .then(|| (l.average_rating - r.average_rating).abs());

        let issue_gaps = self.issue_gaps(&left, &right, &left_summary, &right_summary);
        let issue_groups = self.issue_group_rates(&left, &right);

        let mut findings = Vec::new();
        if let Some(gap) = negative_rate_gap {
            findings.push(self.performance_finding(
                dimension,
                gap,
                &left_summary,
                &right_summary,
            ));
        }
        findings.extend(self.advantage_findings(&left, &right, &issue_groups));
        findings.extend(self.hotspot_findings(&left, &right, &issue_gaps));
        if both_present {
            findings.extend(volume_finding(dimension, &left, &right));
        }
        findings.sort_by(|a, b| b.priority.cmp(&a.priority));

        debug!(
            %dimension,
            left = left.label,
            right = right.label,
            findings = findings.len(),
            "Compared review subsets"
        );

        ComparisonResult {
            dimension,
            left: left_summary,
            right: right_summary,
            rating_gap,
            negative_rate_gap,
            issue_gaps,
            issue_groups,
            findings,
        }
    }

    fn summarize(&self, side: &Side<'_>) -> SideSummary {
        SideSummary {
            label: side.label.to_string(),
            stats: aggregate(side.records),
            top_issues: top_categories(side.records, self.field, self.top_n, &self.noise),
        }
    }

    /// Rates of every category ranked on either side, left's ranking first.
    fn issue_gaps(
        &self,
        left: &Side<'_>,
        right: &Side<'_>,
        left_summary: &SideSummary,
        right_summary: &SideSummary,
    ) -> Vec<IssueGap> {
        let mut labels: Vec<&str> = Vec::new();
        for entry in left_summary.top_issues.iter().chain(&right_summary.top_issues) {
            if !labels.contains(&entry.label.as_str()) {
                labels.push(&entry.label);
            }
        }

        labels
            .into_iter()
            .map(|label| {
                let left_count = left.count_where(|r| self.field.value(r) == label);
                let right_count = right.count_where(|r| self.field.value(r) == label);
                let left_rate = percentage(left_count, left.len());
                let right_rate = percentage(right_count, right.len());
                IssueGap {
                    label: label.to_string(),
                    left_count,
                    right_count,
                    left_rate,
                    right_rate,
                    gap: left_rate.abs_diff(right_rate),
                }
            })
            .collect()
    }

    fn issue_group_rates(&self, left: &Side<'_>, right: &Side<'_>) -> Vec<IssueGroupRates> {
        self.issue_groups
            .iter()
            .map(|group| {
                let left_count = left.count_where(|r| group.matches_label(r.issue_label()));
                let right_count = right.count_where(|r| group.matches_label(r.issue_label()));
                IssueGroupRates {
                    group: group.name.clone(),
                    left_count,
                    right_count,
                    left_rate: percentage(left_count, left.len()),
                    right_rate: percentage(right_count, right.len()),
                }
            })
            .collect()
    }

    fn performance_finding(
        &self,
        dimension: ComparisonDimension,
        gap: u32,
        left: &SideSummary,
        right: &SideSummary,
    ) -> Finding {
        let noun = dimension.title_noun();
        if gap > self.policy.gap_points(dimension) {
            let (worse, better) = if left.stats.negative_rate > right.stats.negative_rate {
                (left, right)
            } else {
                (right, left)
            };
            Finding::new(
                FindingKind::PerformanceGap,
                Priority::High,
                format!("{noun} Performance Gap"),
                format!(
                    "{} shows {}% negative vs {} at {}% - a {gap} point gap that needs {dimension}-specific fixes.",
                    worse.label, worse.stats.negative_rate, better.label, better.stats.negative_rate
                ),
            )
        } else {
            Finding::new(
                FindingKind::ConsistentPerformance,
                Priority::Low,
                format!("Consistent {noun} Performance"),
                format!(
                    "Similar performance: {} {}% vs {} {}% negative sentiment.",
                    left.label, left.stats.negative_rate, right.label, right.stats.negative_rate
                ),
            )
        }
    }

    fn advantage_findings(
        &self,
        left: &Side<'_>,
        right: &Side<'_>,
        rates: &[IssueGroupRates],
    ) -> Vec<Finding> {
        let mut findings = Vec::new();
        for (group, rate) in self.issue_groups.iter().zip(rates) {
            let Some(ratio) = group.advantage() else {
                continue;
            };
            let directions = [
                (left, rate.left_count, rate.left_rate, right, rate.right_count, rate.right_rate),
                (right, rate.right_count, rate.right_rate, left, rate.left_count, rate.left_rate),
            ];
            for (better, better_count, better_rate, other, other_count, other_rate) in directions {
                if ratio.below(better_count, better.len(), other_count, other.len()) == Some(true) {
                    findings.push(Finding::new(
                        FindingKind::IssueAdvantage,
                        Priority::Medium,
                        format!("{} Advantage", group.name),
                        format!(
                            "{} has fewer {} issues: {}% of reviews vs {}% on {}.",
                            better.label,
                            group.name.to_lowercase(),
                            better_rate,
                            other_rate,
                            other.label
                        ),
                    ));
                }
            }
        }
        findings
    }

    fn hotspot_findings(
        &self,
        left: &Side<'_>,
        right: &Side<'_>,
        gaps: &[IssueGap],
    ) -> Vec<Finding> {
        let hotspot = self.policy.hotspot();
        let mut findings = Vec::new();
        for gap in gaps {
            let directions = [
                (left, gap.left_count, gap.left_rate, right, gap.right_count, gap.right_rate),
                (right, gap.right_count, gap.right_rate, left, gap.left_count, gap.left_rate),
            ];
            for (hot, hot_count, hot_rate, other, other_count, other_rate) in directions {
                if hotspot.above(hot_count, hot.len(), other_count, other.len()) == Some(true) {
                    let times = (hot_count as f64 / hot.len() as f64)
                        / (other_count as f64 / other.len() as f64);
                    findings.push(Finding::new(
                        FindingKind::IssueHotspot,
                        Priority::Medium,
                        format!("{} Hotspot", gap.label),
                        format!(
                            "{} reports {:.1}x more \"{}\" issues ({}% vs {}% on {}).",
                            hot.label, times, gap.label, hot_rate, other_rate, other.label
                        ),
                    ));
                }
            }
        }
        findings
    }
}

fn volume_finding(
    dimension: ComparisonDimension,
    left: &Side<'_>,
    right: &Side<'_>,
) -> Option<Finding> {
    if left.len() == right.len() {
        return None;
    }
    let (leader, other) = if left.len() > right.len() {
        (left, right)
    } else {
        (right, left)
    };
    let share = percentage(leader.len(), leader.len() + other.len());
    Some(Finding::new(
        FindingKind::VolumeLeader,
        Priority::Low,
        format!("{} Volume Split", dimension.title_noun()),
        format!(
            "{} accounts for {share}% of the compared reviews ({} vs {}) and needs primary focus.",
            leader.label,
            leader.len(),
            other.len()
        ),
    ))
}

/// Compare two subsets with the default policy, issue groups and ranking.
pub fn compare(
    left: Side<'_>,
    right: Side<'_>,
    dimension: ComparisonDimension,
) -> ComparisonResult {
    Comparator::default().compare(left, right, dimension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sentiment;

    /// `negative` of `total` records are negative, the rest positive.
    fn side_records(app: &str, negative: usize, total: usize) -> Vec<ReviewRecord> {
        (0..total)
            .map(|i| {
                let sentiment = if i < negative {
                    Sentiment::Negative
                } else {
                    Sentiment::Positive
                };
                ReviewRecord::new(format!("{app}-{i}"), app, "iOS")
                    .with_sentiment(sentiment)
                    .with_rating(if i < negative { 1 } else { 5 })
            })
            .collect()
    }

    fn run(left: &[ReviewRecord], right: &[ReviewRecord]) -> ComparisonResult {
        let l: Vec<&ReviewRecord> = left.iter().collect();
        let r: Vec<&ReviewRecord> = right.iter().collect();
        compare(
            Side::new("Rogers", &l),
            Side::new("Bell", &r),
            ComparisonDimension::App,
        )
    }

    #[test]
    fn gap_above_threshold_names_worse_side() {
        let result = run(&side_records("Rogers", 50, 100), &side_records("Bell", 65, 100));
        assert_eq!(result.negative_rate_gap, Some(15));
        let finding = result
            .findings_of(FindingKind::PerformanceGap)
            .next()
            .expect("gap finding");
        assert!(finding.message.starts_with("Bell shows 65% negative"));
        assert!(!result.has_finding(FindingKind::ConsistentPerformance));
    }

    #[test]
    fn gap_of_exactly_ten_is_consistent() {
        let result = run(&side_records("Rogers", 60, 100), &side_records("Bell", 50, 100));
        assert_eq!(result.negative_rate_gap, Some(10));
        assert!(result.has_finding(FindingKind::ConsistentPerformance));

        let result = run(&side_records("Rogers", 61, 100), &side_records("Bell", 50, 100));
        assert!(result.has_finding(FindingKind::PerformanceGap));
    }

    #[test]
    fn empty_side_skips_rules() {
        let result = run(&side_records("Rogers", 5, 10), &[]);
        assert_eq!(result.negative_rate_gap, None);
        assert_eq!(result.rating_gap, None);
        assert!(result.findings.is_empty());
        assert_eq!(result.right.stats.count, 0);
    }

    #[test]
    fn split_sides_uses_dimension() {
        let mut records = side_records("Rogers", 1, 3);
        records.extend(side_records("Bell", 1, 2));
        let all: Vec<&ReviewRecord> = records.iter().collect();
        let (rogers, bell) = split_sides(&all, ComparisonDimension::App, "Rogers", "Bell");
        assert_eq!(rogers.len(), 3);
        assert_eq!(bell.len(), 2);
    }

    #[test]
    fn split_sides_takes_values_literally() {
        let records = [
            ReviewRecord::new("1", "all", "iOS"),
            ReviewRecord::new("2", "Bell", "iOS"),
            ReviewRecord::new("3", "", "Android"),
        ];
        let all: Vec<&ReviewRecord> = records.iter().collect();

        let (literal, bell) = split_sides(&all, ComparisonDimension::App, "all", "Bell");
        assert_eq!(literal.len(), 1);
        assert_eq!(literal[0].id, "1");
        assert_eq!(bell.len(), 1);

        let (blank, ios) = split_sides(&all, ComparisonDimension::App, "", "iOS");
        assert_eq!(blank.len(), 1);
        assert_eq!(blank[0].id, "3");
        assert!(ios.is_empty());
    }
}
