//! Filter Predicate Engine.
//!
//! [`FilterCriteria`] is an immutable value describing the current selection
//! (owned by whoever renders the results). [`filter_records`] applies it to a
//! record collection and returns a new borrowed subset; the input is never
//! touched, so filtering the same collection twice always yields the same
//! subset.

pub mod predicates;

pub use predicates::{Constraint, RecordFilter};

use crate::core::{ReviewRecord, Subset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Sentinel used by UI controls for "no constraint on this dimension".
pub const ALL: &str = "all";

/// Selection for one categorical dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Selection {
    #[default]
    All,
    Only(String),
}

impl Selection {
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(value),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }
}

impl From<&str> for Selection {
    fn from(value: &str) -> Self {
        if value == ALL || value.trim().is_empty() {
            Self::All
        } else {
            Self::Only(value.to_string())
        }
    }
}

impl From<String> for Selection {
    fn from(value: String) -> Self {
        if value == ALL || value.trim().is_empty() {
            Self::All
        } else {
            Self::Only(value)
        }
    }
}

impl From<Selection> for String {
    fn from(selection: Selection) -> Self {
        match selection {
            Selection::All => ALL.to_string(),
            Selection::Only(value) => value,
        }
    }
}

/// Filterable dimensions, in the order they are listed in status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterDimension {
    Year,
    App,
    Platform,
    Sentiment,
    CategoryType,
    Category,
    Search,
}

impl fmt::Display for FilterDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Year => "Year",
            Self::App => "App",
            Self::Platform => "Platform",
            Self::Sentiment => "Sentiment",
            Self::CategoryType => "Type",
            Self::Category => "Category",
            Self::Search => "Search",
        };
        f.write_str(label)
    }
}

/// Named optional constraints over the record collection.
///
/// Every categorical field defaults to "all"; `search` defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub app_name: Selection,
    pub platform: Selection,
    pub sentiment: Selection,
    pub category_type: Selection,
    pub category: Selection,
    pub year: Selection,
    pub search: String,
}

impl FilterCriteria {
    /// Criteria with no active constraint.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Selection::from(app_name.into());
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = Selection::from(platform.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        self.sentiment = Selection::from(sentiment.into());
        self
    }

    pub fn with_category_type(mut self, category_type: impl Into<String>) -> Self {
        self.category_type = Selection::from(category_type.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Selection::from(category.into());
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Selection::from(year.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    /// Trimmed search term; `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        let term = self.search.trim();
        (!term.is_empty()).then_some(term)
    }

    /// Active constraints as `(dimension, value)` pairs in display order.
    pub fn active(&self) -> Vec<(FilterDimension, &str)> {
        [
            (FilterDimension::Year, self.year.value()),
            (FilterDimension::App, self.app_name.value()),
            (FilterDimension::Platform, self.platform.value()),
            (FilterDimension::Sentiment, self.sentiment.value()),
            (FilterDimension::CategoryType, self.category_type.value()),
            (FilterDimension::Category, self.category.value()),
            (FilterDimension::Search, self.search_term()),
        ]
        .into_iter()
        .filter_map(|(dimension, value)| value.map(|v| (dimension, v)))
        .collect()
    }

    pub fn is_active(&self) -> bool {
        !self.active().is_empty()
    }

    /// Status labels such as `"App: Rogers"`, one per active constraint.
    pub fn describe(&self) -> Vec<String> {
        self.active()
            .into_iter()
            .map(|(dimension, value)| format!("{dimension}: {value}"))
            .collect()
    }

    pub fn compile(&self) -> RecordFilter {
        RecordFilter::from_criteria(self)
    }
}

/// Tracks why records were filtered out.
///
/// Each rejected record is attributed to the first constraint it failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterStatistics {
    /// Total number of records examined
    pub total_records_processed: usize,

    /// Rejections per dimension
    pub rejected_by: BTreeMap<FilterDimension, usize>,

    /// Records that satisfied every constraint
    pub records_matched: usize,
}

impl FilterStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_rejected(&self) -> usize {
        self.rejected_by.values().sum()
    }

    /// Percentage of processed records that matched.
    pub fn acceptance_rate(&self) -> f64 {
        if self.total_records_processed == 0 {
            return 0.0;
        }
        (self.records_matched as f64 / self.total_records_processed as f64) * 100.0
    }
}

/// Subset plus the statistics gathered while producing it.
#[derive(Debug, Clone)]
pub struct FilterOutcome<'a> {
    pub subset: Subset<'a>,
    pub statistics: FilterStatistics,
}

/// Apply `criteria` to `records`, returning the matching records in input order.
///
/// With no active constraint this returns every record (a shallow copy of
/// the input, never an empty result).
pub fn filter_records<'a, I>(records: I, criteria: &FilterCriteria) -> Subset<'a>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    let filter = criteria.compile();
    if filter.is_unconstrained() {
        return records.into_iter().collect();
    }
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Same as [`filter_records`] but also reports per-dimension rejections.
pub fn filter_with_stats<'a, I>(records: I, criteria: &FilterCriteria) -> FilterOutcome<'a>
where
    I: IntoIterator<Item = &'a ReviewRecord>,
{
    let filter = criteria.compile();
    let mut statistics = FilterStatistics::new();
    let mut subset = Vec::new();

    for record in records {
        statistics.total_records_processed += 1;
        match filter.first_failure(record) {
            None => subset.push(record),
            Some(dimension) => *statistics.rejected_by.entry(dimension).or_insert(0) += 1,
        }
    }
    statistics.records_matched = subset.len();

    debug!(
        matched = statistics.records_matched,
        processed = statistics.total_records_processed,
        acceptance_rate = statistics.acceptance_rate(),
        active_constraints = filter.constraints().len(),
        rejected = ?statistics.rejected_by,
        "Filtered review records"
    );

    FilterOutcome { subset, statistics }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Sentiment;

    fn sample() -> Vec<ReviewRecord> {
        vec![
            ReviewRecord::new("1", "Rogers", "iOS")
                .with_rating(5)
                .with_sentiment(Sentiment::Positive),
            ReviewRecord::new("2", "Rogers", "Android")
                .with_rating(1)
                .with_sentiment(Sentiment::Negative),
            ReviewRecord::new("3", "Bell", "iOS")
                .with_rating(2)
                .with_sentiment(Sentiment::Negative),
        ]
    }

    #[test]
    fn selection_sentinels() {
        assert_eq!(Selection::from("all"), Selection::All);
        assert_eq!(Selection::from("  "), Selection::All);
        assert_eq!(Selection::from("iOS"), Selection::Only("iOS".into()));
        assert_eq!(String::from(Selection::All), "all");
    }

    #[test]
    fn no_criteria_returns_everything() {
        let records = sample();
        let subset = filter_records(&records, &FilterCriteria::all());
        assert_eq!(subset.len(), 3);
    }

    #[test]
    fn criteria_are_conjunctive() {
        let records = sample();
        let criteria = FilterCriteria::all()
            .with_platform("iOS")
            .with_sentiment("Negative");
        let subset = filter_records(&records, &criteria);
        assert_eq!(subset.len(), 1);
        assert_eq!(subset[0].id, "3");
    }

    #[test]
    fn whitespace_search_is_no_constraint() {
        let criteria = FilterCriteria::all().with_search("   ");
        assert!(!criteria.is_active());
        assert_eq!(filter_records(&sample(), &criteria).len(), 3);
    }

    #[test]
    fn describe_lists_active_constraints_in_order() {
        let criteria = FilterCriteria::all()
            .with_app("Rogers")
            .with_year("2024")
            .with_category_type("App-Related");
        assert_eq!(
            criteria.describe(),
            vec!["Year: 2024", "App: Rogers", "Type: App-Related"]
        );
    }

    #[test]
    fn statistics_attribute_rejections() {
        let records = sample();
        let criteria = FilterCriteria::all().with_app("Rogers").with_platform("iOS");
        let outcome = filter_with_stats(&records, &criteria);

        assert_eq!(outcome.subset.len(), 1);
        assert_eq!(outcome.statistics.total_records_processed, 3);
        assert_eq!(outcome.statistics.rejected_by[&FilterDimension::App], 1);
        assert_eq!(outcome.statistics.rejected_by[&FilterDimension::Platform], 1);
        assert_eq!(outcome.statistics.total_rejected(), 2);
        assert!((outcome.statistics.acceptance_rate() - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn acceptance_rate_of_nothing_is_zero() {
        let records: Vec<ReviewRecord> = Vec::new();
        let outcome = filter_with_stats(&records, &FilterCriteria::all());
        assert_eq!(outcome.statistics.acceptance_rate(), 0.0);

        let records = sample();
        let everything = filter_with_stats(&records, &FilterCriteria::all());
        assert_eq!(everything.statistics.acceptance_rate(), 100.0);
    }

    #[test]
    fn criteria_deserialize_from_ui_strings() {
        let criteria: FilterCriteria =
            serde_json::from_str(r#"{"app_name":"Bell","platform":"all","search":""}"#).unwrap();
        assert_eq!(criteria.app_name, Selection::Only("Bell".into()));
        assert!(criteria.platform.is_all());
        assert!(criteria.year.is_all());
    }
}
