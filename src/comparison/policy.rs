//! Threshold policy for narrative findings.
//!
//! Every threshold that decides which finding fires lives here as a named
//! value. Gap rules use strict `>`; ratio rules compare with strict `<`
//! (advantage) or strict `>` (hotspot). Ratios are evaluated on integer
//! counts by cross-multiplication so boundary cases are exact.

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};

use super::types::ComparisonDimension;

pub const NEGATIVE_GAP_POINTS: u32 = 10;
pub const STABILITY_ADVANTAGE_RATIO: f64 = 0.7;
pub const AUTH_ADVANTAGE_RATIO: f64 = 0.5;
pub const HOTSPOT_RATIO: f64 = 1.5;
pub const SEGMENT_CRITICAL_NEGATIVE_PCT: u32 = 60;
pub const SEGMENT_CONCERN_NEGATIVE_PCT: u32 = 40;
pub const LOW_RATING: f64 = 2.5;
pub const BELOW_AVERAGE_RATING: f64 = 3.5;
pub const OVERALL_ALERT_NEGATIVE_PCT: u32 = 60;
pub const SMALL_SAMPLE_SIZE: usize = 10;

/// Ratio held as thousandths so it can be compared on integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ratio {
    thousandths: u64,
}

impl Ratio {
    const SCALE: u64 = 1000;

    pub fn from_f64(value: f64) -> Self {
        Self {
            thousandths: (value.max(0.0) * Self::SCALE as f64).round() as u64,
        }
    }

    /// `a_count / a_total < ratio * b_count / b_total`.
    ///
    /// `None` when either total or `b_count` is zero: the rule does not apply.
    pub fn below(
        &self,
        a_count: usize,
        a_total: usize,
        b_count: usize,
        b_total: usize,
    ) -> Option<bool> {
        let (lhs, rhs) = self.cross_multiply(a_count, a_total, b_count, b_total)?;
        Some(lhs < rhs)
    }

    /// `a_count / a_total > ratio * b_count / b_total`, with the same guards as [`Ratio::below`].
    pub fn above(
        &self,
        a_count: usize,
        a_total: usize,
        b_count: usize,
        b_total: usize,
    ) -> Option<bool> {
        let (lhs, rhs) = self.cross_multiply(a_count, a_total, b_count, b_total)?;
        Some(lhs > rhs)
    }

    fn cross_multiply(
        &self,
        a_count: usize,
        a_total: usize,
        b_count: usize,
        b_total: usize,
    ) -> Option<(u128, u128)> {
        if a_total == 0 || b_total == 0 || b_count == 0 {
            return None;
        }
        let lhs = a_count as u128 * b_total as u128 * Self::SCALE as u128;
        let rhs = self.thousandths as u128 * b_count as u128 * a_total as u128;
        Some((lhs, rhs))
    }
}

/// Thresholds for comparison and segment findings (`[thresholds]` in config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightPolicy {
    /// Negative-rate gap (points) above which two apps differ
    #[serde(default = "default_gap_points")]
    pub app_gap_points: u32,

    #[serde(default = "default_gap_points")]
    pub platform_gap_points: u32,

    #[serde(default = "default_gap_points")]
    pub category_type_gap_points: u32,

    /// A category more than this many times as frequent on one side is a hotspot
    #[serde(default = "default_hotspot_ratio")]
    pub hotspot_ratio: f64,

    #[serde(default = "default_segment_critical_pct")]
    pub segment_critical_negative_pct: u32,

    #[serde(default = "default_segment_concern_pct")]
    pub segment_concern_negative_pct: u32,

    #[serde(default = "default_low_rating")]
    pub low_rating: f64,

    #[serde(default = "default_below_average_rating")]
    pub below_average_rating: f64,

    /// Filtered negative share above which the overview reads "worse than average"
    #[serde(default = "default_overall_alert_pct")]
    pub overall_alert_negative_pct: u32,

    /// Filtered views smaller than this are flagged as limited samples
    #[serde(default = "default_small_sample_size")]
    pub small_sample_size: usize,
}

impl Default for InsightPolicy {
    fn default() -> Self {
        Self {
            app_gap_points: default_gap_points(),
            platform_gap_points: default_gap_points(),
            category_type_gap_points: default_gap_points(),
            hotspot_ratio: default_hotspot_ratio(),
            segment_critical_negative_pct: default_segment_critical_pct(),
            segment_concern_negative_pct: default_segment_concern_pct(),
            low_rating: default_low_rating(),
            below_average_rating: default_below_average_rating(),
            overall_alert_negative_pct: default_overall_alert_pct(),
            small_sample_size: default_small_sample_size(),
        }
    }
}

impl InsightPolicy {
    pub fn gap_points(&self, dimension: ComparisonDimension) -> u32 {
        match dimension {
            ComparisonDimension::App => self.app_gap_points,
            ComparisonDimension::Platform => self.platform_gap_points,
            ComparisonDimension::CategoryType => self.category_type_gap_points,
        }
    }

    pub fn hotspot(&self) -> Ratio {
        Ratio::from_f64(self.hotspot_ratio)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, points) in [
            ("app_gap_points", self.app_gap_points),
            ("platform_gap_points", self.platform_gap_points),
            ("category_type_gap_points", self.category_type_gap_points),
            ("segment_critical_negative_pct", self.segment_critical_negative_pct),
            ("segment_concern_negative_pct", self.segment_concern_negative_pct),
            ("overall_alert_negative_pct", self.overall_alert_negative_pct),
        ] {
            if points > 100 {
                return Err(Error::Validation(format!(
                    "thresholds.{name} must be at most 100, got {points}"
                )));
            }
        }
        validate_ratio("thresholds.hotspot_ratio", self.hotspot_ratio)?;
        if self.segment_concern_negative_pct > self.segment_critical_negative_pct {
            return Err(Error::Validation(
                "thresholds.segment_concern_negative_pct must not exceed segment_critical_negative_pct"
                    .to_string(),
            ));
        }
        if self.low_rating > self.below_average_rating {
            return Err(Error::Validation(
                "thresholds.low_rating must not exceed below_average_rating".to_string(),
            ));
        }
        Ok(())
    }
}

pub(crate) fn validate_ratio(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::Validation(format!(
            "{name} must be a positive finite number, got {value}"
        )));
    }
    Ok(())
}

/// Keyword group whose share of each side is compared (`[[issue_groups]]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueGroup {
    pub name: String,
    /// Lowercase fragments matched against a record's issue label
    pub keywords: Vec<String>,
    /// A side whose rate is below this fraction of the other's has the advantage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advantage_ratio: Option<f64>,
}

impl IssueGroup {
    pub fn new(name: &str, keywords: &[&str], advantage_ratio: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_lowercase()).collect(),
            advantage_ratio,
        }
    }

    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.to_lowercase();
        self.keywords
            .iter()
            .any(|keyword| label.contains(keyword.to_lowercase().as_str()))
    }

    pub fn advantage(&self) -> Option<Ratio> {
        self.advantage_ratio.map(Ratio::from_f64)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("issue group name must not be empty".into()));
        }
        if self.keywords.iter().all(|k| k.trim().is_empty()) {
            return Err(Error::Validation(format!(
                "issue group '{}' needs at least one keyword",
                self.name
            )));
        }
        if let Some(ratio) = self.advantage_ratio {
            validate_ratio(&format!("issue_groups.{}.advantage_ratio", self.name), ratio)?;
        }
        Ok(())
    }
}

pub fn default_issue_groups() -> Vec<IssueGroup> {
    vec![
        IssueGroup::new(
            "Stability",
            &["crash", "stability", "freeze", "bug", "technical"],
            Some(STABILITY_ADVANTAGE_RATIO),
        ),
        IssueGroup::new(
            "Authentication",
            &["login", "authentication", "sign in", "password", "access"],
            Some(AUTH_ADVANTAGE_RATIO),
        ),
        IssueGroup::new("Billing", &["bill", "payment", "charge"], None),
    ]
}

fn default_gap_points() -> u32 {
    NEGATIVE_GAP_POINTS
}
fn default_hotspot_ratio() -> f64 {
    HOTSPOT_RATIO
}
fn default_segment_critical_pct() -> u32 {
    SEGMENT_CRITICAL_NEGATIVE_PCT
}
fn default_segment_concern_pct() -> u32 {
    SEGMENT_CONCERN_NEGATIVE_PCT
}
fn default_low_rating() -> f64 {
    LOW_RATING
}
fn default_below_average_rating() -> f64 {
    BELOW_AVERAGE_RATING
}
fn default_overall_alert_pct() -> u32 {
    OVERALL_ALERT_NEGATIVE_PCT
}
fn default_small_sample_size() -> usize {
    SMALL_SAMPLE_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_boundaries_are_exact() {
        let ratio = Ratio::from_f64(0.7);
        // 7/100 vs 0.7 * 10/100: exactly equal, not below
        assert_eq!(ratio.below(7, 100, 10, 100), Some(false));
        assert_eq!(ratio.below(6, 100, 10, 100), Some(true));
        // 0.1 + 0.2 style float error would flip this one
        assert_eq!(Ratio::from_f64(0.3).below(3, 10, 1, 1), Some(false));
    }

    #[test]
    fn ratio_skips_zero_denominators() {
        let ratio = Ratio::from_f64(1.5);
        assert_eq!(ratio.above(5, 10, 0, 10), None);
        assert_eq!(ratio.above(5, 0, 1, 10), None);
        assert_eq!(ratio.above(5, 10, 1, 0), None);
        assert_eq!(ratio.above(3, 10, 2, 10), Some(false));
        assert_eq!(ratio.above(4, 10, 2, 10), Some(true));
    }

    #[test]
    fn default_policy_is_valid() {
        assert!(InsightPolicy::default().validate().is_ok());
        for group in default_issue_groups() {
            assert!(group.validate().is_ok());
        }
    }

    #[test]
    fn invalid_thresholds_are_rejected() {
        let policy = InsightPolicy {
            platform_gap_points: 120,
            ..InsightPolicy::default()
        };
        assert!(matches!(policy.validate(), Err(Error::Validation(_))));

        let policy = InsightPolicy {
            hotspot_ratio: f64::NAN,
            ..InsightPolicy::default()
        };
        assert!(policy.validate().is_err());

        let group = IssueGroup::new("Odd", &["x"], Some(0.0));
        assert!(group.validate().is_err());
    }

    #[test]
    fn issue_group_matches_case_insensitively() {
        let groups = default_issue_groups();
        assert!(groups[0].matches_label("App Crashes"));
        assert!(groups[1].matches_label("Login Problems"));
        assert!(!groups[2].matches_label("Network Coverage"));
    }
}
