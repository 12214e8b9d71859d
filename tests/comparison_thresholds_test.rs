//! Boundary behaviour of the comparison threshold rules.
//!
//! Gap rules fire on a strictly larger gap, advantage rules on a strictly
//! smaller ratio and hotspot rules on a strictly larger ratio.

mod common;

use common::{refs, side};
use reviewlens::comparison::policy::NEGATIVE_GAP_POINTS;
use reviewlens::comparison::{
    compare, default_issue_groups, Comparator, ComparisonDimension, ComparisonResult,
    FindingKind, InsightPolicy, Side,
};
use reviewlens::core::{ReviewRecord, Sentiment};

/// `hits` of `total` positive records carry `label`; the rest are "User Interface".
fn labelled_side(app: &str, label: &str, hits: usize, total: usize) -> Vec<ReviewRecord> {
    (0..total)
        .map(|i| {
            let category = if i < hits { label } else { "User Interface" };
            ReviewRecord::new(format!("{app}-{i}"), app, "iOS")
                .with_sentiment(Sentiment::Positive)
                .with_rating(4)
                .with_categories(category, category)
        })
        .collect()
}

fn run(left: &[ReviewRecord], right: &[ReviewRecord]) -> ComparisonResult {
    let (l, r) = (refs(left), refs(right));
    compare(
        Side::new("Rogers", &l),
        Side::new("Bell", &r),
        ComparisonDimension::App,
    )
}

#[test]
fn negative_gap_boundary_is_strict() {
    let at_boundary = run(&side("Rogers", "iOS", 60, 100), &side("Bell", "iOS", 50, 100));
    assert_eq!(at_boundary.negative_rate_gap, Some(10));
    assert!(at_boundary.has_finding(FindingKind::ConsistentPerformance));

    let past_boundary = run(&side("Rogers", "iOS", 61, 100), &side("Bell", "iOS", 50, 100));
    assert_eq!(past_boundary.negative_rate_gap, Some(11));
    assert!(past_boundary.has_finding(FindingKind::PerformanceGap));
}

/// Older app-vs-app dashboards only flagged gaps above 15 points while the
/// platform views used 10. Every dimension now defaults to 10; setting
/// `app_gap_points = 15` restores the old app behaviour.
#[test]
fn app_gap_defaults_to_ten_points_not_fifteen() {
    assert_eq!(NEGATIVE_GAP_POINTS, 10);
    assert_eq!(InsightPolicy::default().app_gap_points, 10);

    let rogers = side("Rogers", "iOS", 62, 100);
    let bell = side("Bell", "iOS", 50, 100);
    let twelve_points = run(&rogers, &bell);
    assert_eq!(twelve_points.negative_rate_gap, Some(12));
    assert!(twelve_points.has_finding(FindingKind::PerformanceGap));

    let legacy = Comparator::new(
        InsightPolicy {
            app_gap_points: 15,
            ..InsightPolicy::default()
        },
        default_issue_groups(),
    );
    let (r, b) = (refs(&rogers), refs(&bell));
    let result = legacy.compare(
        Side::new("Rogers", &r),
        Side::new("Bell", &b),
        ComparisonDimension::App,
    );
    assert!(result.has_finding(FindingKind::ConsistentPerformance));
}

#[test]
fn gap_points_are_configurable_per_dimension() {
    let policy = InsightPolicy {
        platform_gap_points: 15,
        ..InsightPolicy::default()
    };
    let comparator = Comparator::new(policy, default_issue_groups());
    let ios = side("Rogers", "iOS", 65, 100);
    let android = side("Rogers", "Android", 50, 100);
    let (i, a) = (refs(&ios), refs(&android));

    let result = comparator.compare(
        Side::new("iOS", &i),
        Side::new("Android", &a),
        ComparisonDimension::Platform,
    );
    assert!(result.has_finding(FindingKind::ConsistentPerformance));

    let result = comparator.compare(
        Side::new("iOS", &i),
        Side::new("Android", &a),
        ComparisonDimension::App,
    );
    assert!(result.has_finding(FindingKind::PerformanceGap));
}

#[test]
fn stability_advantage_needs_ratio_strictly_below_point_seven() {
    let equal_ratio = run(
        &labelled_side("Rogers", "App Crashes", 7, 100),
        &labelled_side("Bell", "App Crashes", 10, 100),
    );
    assert!(!equal_ratio
        .findings_of(FindingKind::IssueAdvantage)
        .any(|f| f.title == "Stability Advantage" && f.message.starts_with("Rogers")));

    let below = run(
        &labelled_side("Rogers", "App Crashes", 6, 100),
        &labelled_side("Bell", "App Crashes", 10, 100),
    );
    let finding = below
        .findings_of(FindingKind::IssueAdvantage)
        .find(|f| f.title == "Stability Advantage")
        .expect("stability advantage");
    assert!(finding.message.starts_with("Rogers has fewer stability issues: 6%"));
}

#[test]
fn authentication_advantage_needs_ratio_strictly_below_half() {
    let equal_ratio = run(
        &labelled_side("Rogers", "Login Issues", 5, 100),
        &labelled_side("Bell", "Login Issues", 10, 100),
    );
    assert!(!equal_ratio
        .findings_of(FindingKind::IssueAdvantage)
        .any(|f| f.title == "Authentication Advantage"));

    let below = run(
        &labelled_side("Rogers", "Login Issues", 4, 100),
        &labelled_side("Bell", "Login Issues", 10, 100),
    );
    assert!(below
        .findings_of(FindingKind::IssueAdvantage)
        .any(|f| f.title == "Authentication Advantage" && f.message.starts_with("Rogers")));
}

#[test]
fn hotspot_needs_ratio_strictly_above_one_and_a_half() {
    let equal_ratio = run(
        &labelled_side("Rogers", "Network Coverage", 15, 100),
        &labelled_side("Bell", "Network Coverage", 10, 100),
    );
    assert_eq!(equal_ratio.findings_of(FindingKind::IssueHotspot).count(), 0);

    let above = run(
        &labelled_side("Rogers", "Network Coverage", 16, 100),
        &labelled_side("Bell", "Network Coverage", 10, 100),
    );
    let hotspot = above
        .findings_of(FindingKind::IssueHotspot)
        .next()
        .expect("hotspot finding");
    assert_eq!(hotspot.title, "Network Coverage Hotspot");
    assert!(hotspot.message.starts_with("Rogers reports 1.6x more"));
}

#[test]
fn zero_denominators_skip_ratio_rules() {
    // neither side has any stability issue: no ratio can be formed
    let result = run(
        &labelled_side("Rogers", "User Interface", 0, 20),
        &labelled_side("Bell", "User Interface", 0, 20),
    );
    assert_eq!(result.findings_of(FindingKind::IssueAdvantage).count(), 0);
    assert_eq!(result.findings_of(FindingKind::IssueHotspot).count(), 0);
    for finding in &result.findings {
        assert!(!finding.message.contains("NaN"));
        assert!(!finding.message.contains("inf"));
    }
}

#[test]
fn empty_side_produces_no_gap_findings() {
    let result = run(&side("Rogers", "iOS", 10, 20), &[]);
    assert_eq!(result.negative_rate_gap, None);
    assert!(!result.has_finding(FindingKind::PerformanceGap));
    assert!(!result.has_finding(FindingKind::ConsistentPerformance));
    assert_eq!(result.right.stats.average_rating, 0.0);
}

#[test]
fn findings_are_ordered_by_priority() {
    let result = run(
        &labelled_side("Rogers", "App Crashes", 30, 120),
        &side("Bell", "iOS", 70, 100),
    );
    let priorities: Vec<_> = result.findings.iter().map(|f| f.priority).collect();
    let mut sorted = priorities.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(priorities, sorted);
    assert!(result.has_finding(FindingKind::VolumeLeader));
}
