//! Comparative Analysis Engine.
//!
//! Two-way comparisons (app vs app, platform vs platform, category type vs
//! category type). Each side is aggregated and ranked independently, the gaps
//! are measured, and the threshold rules in [`policy`] decide which findings
//! apply. A rule whose denominator would be zero is skipped.

pub mod comparator;
pub mod policy;
pub mod types;

pub use comparator::{compare, split_sides, Comparator, Side};
pub use policy::{default_issue_groups, InsightPolicy, IssueGroup, Ratio};
pub use types::{
    ComparisonDimension, ComparisonResult, Finding, FindingKind, IssueGap, IssueGroupRates,
    SideSummary,
};
