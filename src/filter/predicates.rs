//! Pure predicate functions for filtering review records.
//!
//! Each predicate checks one dimension of a [`ReviewRecord`] and returns a
//! boolean. [`RecordFilter`] composes the active ones conjunctively.
//!
//! # Examples
//!
//! ```
//! use reviewlens::core::ReviewRecord;
//! use reviewlens::filter::predicates::{matches_app, matches_search};
//!
//! let record = ReviewRecord::new("1", "Rogers", "iOS").with_text("App keeps crashing");
//!
//! assert!(matches_app(&record, "Rogers"));
//! assert!(matches_search(&record, "crash"));
//! assert!(!matches_search(&record, "billing"));
//! ```

use super::{FilterCriteria, FilterDimension};
use crate::core::ReviewRecord;
use serde::{Deserialize, Serialize};

#[inline]
pub fn matches_app(record: &ReviewRecord, app_name: &str) -> bool {
    record.app_name == app_name
}

#[inline]
pub fn matches_platform(record: &ReviewRecord, platform: &str) -> bool {
    record.platform == platform
}

#[inline]
pub fn matches_sentiment(record: &ReviewRecord, sentiment: &str) -> bool {
    record.sentiment.as_str() == sentiment
}

#[inline]
pub fn matches_category_type(record: &ReviewRecord, category_type: &str) -> bool {
    record.category_type == category_type
}

/// Category filtering compares against the final (post-recategorization) label.
#[inline]
pub fn matches_category(record: &ReviewRecord, category: &str) -> bool {
    record.final_category == category
}

/// Year filtering uses the explicit year label, or the date's year when the
/// label is absent. Records with neither never match.
pub fn matches_year(record: &ReviewRecord, year: &str) -> bool {
    record
        .effective_year()
        .is_some_and(|record_year| record_year == year)
}

/// Case-insensitive substring match against the review text only.
///
/// `needle` is lowercased here; [`RecordFilter`] pre-lowercases it once and
/// calls [`matches_lowercase_needle`] instead.
pub fn matches_search(record: &ReviewRecord, needle: &str) -> bool {
    matches_lowercase_needle(record, &needle.to_lowercase())
}

#[inline]
pub fn matches_lowercase_needle(record: &ReviewRecord, needle: &str) -> bool {
    record.text.to_lowercase().contains(needle)
}

/// One active constraint of a compiled filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constraint {
    App(String),
    Platform(String),
    Sentiment(String),
    CategoryType(String),
    Category(String),
    Year(String),
    /// Lowercased search needle
    Search(String),
}

impl Constraint {
    pub fn dimension(&self) -> FilterDimension {
        match self {
            Self::App(_) => FilterDimension::App,
            Self::Platform(_) => FilterDimension::Platform,
            Self::Sentiment(_) => FilterDimension::Sentiment,
            Self::CategoryType(_) => FilterDimension::CategoryType,
            Self::Category(_) => FilterDimension::Category,
            Self::Year(_) => FilterDimension::Year,
            Self::Search(_) => FilterDimension::Search,
        }
    }

    #[inline]
    pub fn matches(&self, record: &ReviewRecord) -> bool {
        match self {
            Self::App(value) => matches_app(record, value),
            Self::Platform(value) => matches_platform(record, value),
            Self::Sentiment(value) => matches_sentiment(record, value),
            Self::CategoryType(value) => matches_category_type(record, value),
            Self::Category(value) => matches_category(record, value),
            Self::Year(value) => matches_year(record, value),
            Self::Search(needle) => matches_lowercase_needle(record, needle),
        }
    }
}

/// Conjunction of the active constraints of a [`FilterCriteria`].
///
/// Equality checks run before the year and text checks since they are the
/// cheapest; the order never changes which records match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    constraints: Vec<Constraint>,
}

impl RecordFilter {
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let equality = [
            criteria.app_name.value().map(|v| Constraint::App(v.to_string())),
            criteria
                .platform
                .value()
                .map(|v| Constraint::Platform(v.to_string())),
            criteria
                .sentiment
                .value()
                .map(|v| Constraint::Sentiment(v.to_string())),
            criteria
                .category_type
                .value()
                .map(|v| Constraint::CategoryType(v.to_string())),
            criteria
                .category
                .value()
                .map(|v| Constraint::Category(v.to_string())),
            criteria.year.value().map(|v| Constraint::Year(v.to_string())),
            criteria
                .search_term()
                .map(|term| Constraint::Search(term.to_lowercase())),
        ];

        Self {
            constraints: equality.into_iter().flatten().collect(),
        }
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// True when no constraint is active, i.e. every record matches.
    pub fn is_unconstrained(&self) -> bool {
        self.constraints.is_empty()
    }

    #[inline]
    pub fn matches(&self, record: &ReviewRecord) -> bool {
        self.constraints.iter().all(|c| c.matches(record))
    }

    /// Dimension of the first constraint the record fails, if any.
    pub fn first_failure(&self, record: &ReviewRecord) -> Option<FilterDimension> {
        self.constraints
            .iter()
            .find(|c| !c.matches(record))
            .map(Constraint::dimension)
    }
}
