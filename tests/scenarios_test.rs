//! End-to-end checks of the documented dashboard scenarios.

mod common;

use common::{records_with_categories, refs, review, side};
use pretty_assertions::assert_eq;
use reviewlens::aggregation::aggregate;
use reviewlens::comparison::{compare, ComparisonDimension, FindingKind, Side};
use reviewlens::core::{ReviewRecord, Sentiment};
use reviewlens::data::{parse_dataset, FieldMapping};
use reviewlens::filter::{filter_records, FilterCriteria};
use reviewlens::ranking::{top_n, top_n_with, NoisePolicy, RankingEntry};
use serde_json::json;

fn entry(label: &str, count: usize, percentage: u32) -> RankingEntry {
    RankingEntry {
        label: label.to_string(),
        count,
        percentage_of_subset: percentage,
    }
}

#[test]
fn scenario_a_app_and_platform_filter() {
    let records = vec![
        review("Rogers", "iOS", 5, Sentiment::Positive),
        review("Rogers", "iOS", 1, Sentiment::Negative),
    ];
    let criteria = FilterCriteria::all().with_app("Rogers").with_platform("iOS");

    let subset = filter_records(&records, &criteria);
    assert_eq!(subset.len(), 2);

    let stats = aggregate(&subset);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.average_rating, 3.0);
    assert_eq!(stats.formatted_rating(), "3.0");
    assert_eq!(stats.negative_rate, 50);
}

#[test]
fn scenario_b_ranking_drops_empty_and_numeric_labels() {
    let records = records_with_categories(&[("A", 10), ("B", 7), ("", 3), ("42", 2)]);
    let subset = refs(&records);

    // single-letter labels need a permissive length rule
    let ranked = top_n_with(&subset, |r| r.final_category.as_str(), 2, &NoisePolicy::new(1));
    assert_eq!(ranked, vec![entry("A", 10, 45), entry("B", 7, 32)]);

    let records = records_with_categories(&[("Alpha", 10), ("Beta", 7), ("", 3), ("42", 2)]);
    let subset = refs(&records);
    let ranked = top_n(&subset, |r| r.final_category.as_str(), 2);
    assert_eq!(ranked, vec![entry("Alpha", 10, 45), entry("Beta", 7, 32)]);
}

#[test]
fn scenario_b_default_policy_treats_short_labels_as_noise() {
    let records = records_with_categories(&[("A", 10), ("B", 7), ("", 3), ("42", 2)]);
    let subset = refs(&records);
    assert!(top_n(&subset, |r| r.final_category.as_str(), 2).is_empty());
}

#[test]
fn scenario_c_no_matching_category() {
    let records = records_with_categories(&[("Login Issues", 3), ("App Crashes", 2)]);
    let subset = filter_records(&records, &FilterCriteria::all().with_category("Billing"));
    assert!(subset.is_empty());

    let stats = aggregate(&subset);
    assert_eq!(stats.count, 0);
    assert_eq!(stats.average_rating, 0.0);
    assert_eq!(stats.negative_rate, 0);
    assert_eq!(stats.sentiment_score, None);
}

fn compare_rates(left_negative: usize, right_negative: usize) -> reviewlens::ComparisonResult {
    let left = side("Rogers", "iOS", left_negative, 100);
    let right = side("Bell", "iOS", right_negative, 100);
    let (l, r) = (refs(&left), refs(&right));
    compare(
        Side::new("Rogers", &l),
        Side::new("Bell", &r),
        ComparisonDimension::App,
    )
}

#[test]
fn scenario_d_performance_gap_names_worse_side() {
    let result = compare_rates(65, 50);
    assert_eq!(result.negative_rate_gap, Some(15));
    let gap = result
        .findings_of(FindingKind::PerformanceGap)
        .next()
        .expect("performance gap finding");
    assert!(gap.message.starts_with("Rogers shows 65% negative vs Bell at 50%"));

    let result = compare_rates(55, 50);
    assert_eq!(result.negative_rate_gap, Some(5));
    assert!(result.has_finding(FindingKind::ConsistentPerformance));
    assert!(!result.has_finding(FindingKind::PerformanceGap));
}

#[test]
fn scenario_e_impact_flag_normalization() {
    let document = json!([
        {"review_id": "1", "app_name": "Rogers", "customer_service_impact": "True"},
        {"review_id": "2", "app_name": "Rogers", "customer_service_impact": true},
        {"review_id": "3", "app_name": "Rogers", "customer_service_impact": "yes"},
    ]);
    let records = parse_dataset(&document, &FieldMapping::dashboard()).unwrap();
    let flags: Vec<bool> = records.iter().map(|r| r.customer_service_impact).collect();
    assert_eq!(flags, vec![true, true, false]);

    let all: Vec<&ReviewRecord> = records.iter().collect();
    let stats = aggregate(&all);
    assert_eq!(stats.cs_impact_count, 2);
    assert_eq!(stats.cs_impact_rate, 67);
}
