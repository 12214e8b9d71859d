use crate::aggregation::AggregateResult;
use crate::core::Priority;
use crate::ranking::RankingEntry;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the two sides of a comparison are slices of.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonDimension {
    App,
    #[default]
    Platform,
    CategoryType,
}

impl ComparisonDimension {
    /// Noun used in finding titles, e.g. "Platform Performance Gap".
    pub fn title_noun(&self) -> &'static str {
        match self {
            Self::App => "App",
            Self::Platform => "Platform",
            Self::CategoryType => "Category Type",
        }
    }
}

impl fmt::Display for ComparisonDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App => write!(f, "app"),
            Self::Platform => write!(f, "platform"),
            Self::CategoryType => write!(f, "category type"),
        }
    }
}

/// Aggregates and rankings of one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideSummary {
    pub label: String,
    pub stats: AggregateResult,
    pub top_issues: Vec<RankingEntry>,
}

/// Per-category rate difference between the two sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueGap {
    pub label: String,
    pub left_count: usize,
    pub right_count: usize,
    pub left_rate: u32,
    pub right_rate: u32,
    pub gap: u32,
}

/// Rate of one keyword issue group on both sides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueGroupRates {
    pub group: String,
    pub left_count: usize,
    pub right_count: usize,
    pub left_rate: u32,
    pub right_rate: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FindingKind {
    PerformanceGap,
    ConsistentPerformance,
    IssueAdvantage,
    IssueHotspot,
    VolumeLeader,
}

/// A qualitative, threshold-triggered statement about a comparison.
///
/// `priority` only orders findings for presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
}

impl Finding {
    pub fn new(
        kind: FindingKind,
        priority: Priority,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub dimension: ComparisonDimension,
    pub left: SideSummary,
    pub right: SideSummary,
    /// Absolute average-rating difference; `None` unless both sides have ratings
    pub rating_gap: Option<f64>,
    /// Absolute negative-rate difference in points; `None` if a side is empty
    pub negative_rate_gap: Option<u32>,
    pub issue_gaps: Vec<IssueGap>,
    pub issue_groups: Vec<IssueGroupRates>,
    pub findings: Vec<Finding>,
}

impl ComparisonResult {
    pub fn has_finding(&self, kind: FindingKind) -> bool {
        self.findings.iter().any(|f| f.kind == kind)
    }

    pub fn findings_of(&self, kind: FindingKind) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(move |f| f.kind == kind)
    }
}
