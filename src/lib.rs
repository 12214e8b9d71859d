//! Filtering, aggregation and comparative insight engine for app review
//! datasets.
//!
//! Records are loaded once through [`data::load_dataset`], selected with a
//! [`FilterCriteria`], and then summarised, ranked and compared. Every stage
//! works on borrowed subsets of the immutable record collection.

// Export modules for library usage
pub mod aggregation;
pub mod cli;
pub mod commands;
pub mod comparison;
pub mod config;
pub mod core;
pub mod data;
pub mod filter;
pub mod formatting;
pub mod insights;
pub mod io;
pub mod ranking;
pub mod report;

// Re-export commonly used types
pub use crate::core::{Error, Priority, Result, ReviewRecord, Sentiment, Subset};

pub use crate::aggregation::{aggregate, aggregate_within, AggregateResult};
pub use crate::comparison::{
    compare, ComparisonDimension, ComparisonResult, Comparator, Finding, FindingKind,
    InsightPolicy, Side,
};
pub use crate::data::{load_dataset, FieldMapping, MappingPreset};
pub use crate::filter::{filter_records, filter_with_stats, FilterCriteria, Selection};
pub use crate::ranking::{top_n, top_n_with, NoisePolicy, RankingEntry};
pub use crate::report::{build_report, DashboardReport, ReportOptions};
