//! Record model shared by every engine in the crate.
//!
//! A [`ReviewRecord`] is the normalized shape of one customer review. Raw
//! dataset rows are converted into records once, at the load boundary (see
//! [`crate::data`]); after that the collection is treated as immutable and
//! every filter produces a new borrowed subset.

pub mod errors;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

pub use errors::{Error, Result, ResultExt};

/// A borrowed view over part of the record collection.
pub type Subset<'a> = Vec<&'a ReviewRecord>;

/// Sentiment label attached to a review by the upstream classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
    #[default]
    Unknown,
}

impl Sentiment {
    /// Parse a classifier label. Unrecognized or empty labels become `Unknown`.
    pub fn parse(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "positive" => Self::Positive,
            "neutral" => Self::Neutral,
            "negative" => Self::Negative,
            "mixed" => Self::Mixed,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "Positive",
            Self::Neutral => "Neutral",
            Self::Negative => "Negative",
            Self::Mixed => "Mixed",
            Self::Unknown => "Unknown",
        }
    }

    /// Numeric score used for per-category sentiment averages.
    ///
    /// `Unknown` has no score and is excluded from the denominator.
    pub fn score(&self) -> Option<i64> {
        match self {
            Self::Positive => Some(1),
            Self::Neutral | Self::Mixed => Some(0),
            Self::Negative => Some(-1),
            Self::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation priority of a finding or severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        static DISPLAY_STRINGS: &[(Priority, &str)] = &[
            (Priority::Low, "Low"),
            (Priority::Medium, "Medium"),
            (Priority::High, "High"),
            (Priority::Critical, "Critical"),
        ];

        let label = DISPLAY_STRINGS
            .iter()
            .find(|(p, _)| p == self)
            .map(|(_, s)| *s)
            .unwrap_or("Unknown");
        f.write_str(label)
    }
}

/// One customer review with its classification metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub id: String,
    pub app_name: String,
    pub platform: String,
    /// Star rating in `1..=5`; `None` when missing or not numeric.
    pub rating: Option<u8>,
    pub sentiment: Sentiment,
    pub date: Option<NaiveDate>,
    /// Precomputed year label; takes precedence over `date` when present.
    pub year: Option<String>,
    pub primary_category: String,
    pub final_category: String,
    pub category_type: String,
    pub customer_service_impact: bool,
    pub technical_severity: Option<f64>,
    pub text: String,
    pub helpful_votes: u32,
    pub actionable_by: Option<String>,
}

impl ReviewRecord {
    /// Minimal record used as a starting point by builders and tests.
    pub fn new(
        id: impl Into<String>,
        app_name: impl Into<String>,
        platform: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            app_name: app_name.into(),
            platform: platform.into(),
            rating: None,
            sentiment: Sentiment::Unknown,
            date: None,
            year: None,
            primary_category: String::new(),
            final_category: String::new(),
            category_type: String::new(),
            customer_service_impact: false,
            technical_severity: None,
            text: String::new(),
            helpful_votes: 0,
            actionable_by: None,
        }
    }

    pub fn with_rating(mut self, rating: u8) -> Self {
        self.rating = (1..=5).contains(&rating).then_some(rating);
        self
    }

    pub fn with_sentiment(mut self, sentiment: Sentiment) -> Self {
        self.sentiment = sentiment;
        self
    }

    pub fn with_categories(
        mut self,
        primary: impl Into<String>,
        final_category: impl Into<String>,
    ) -> Self {
        self.primary_category = primary.into();
        self.final_category = final_category.into();
        self
    }

    pub fn with_category_type(mut self, category_type: impl Into<String>) -> Self {
        self.category_type = category_type.into();
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_impact(mut self, impact: bool) -> Self {
        self.customer_service_impact = impact;
        self
    }

    pub fn with_severity(mut self, severity: f64) -> Self {
        self.technical_severity = severity.is_finite().then_some(severity);
        self
    }

    pub fn with_helpful_votes(mut self, votes: u32) -> Self {
        self.helpful_votes = votes;
        self
    }

    pub fn with_actionable_by(mut self, team: impl Into<String>) -> Self {
        self.actionable_by = Some(team.into());
        self
    }

    /// Year used for year filtering: explicit label first, then the date's year.
    pub fn effective_year(&self) -> Option<String> {
        match self.year.as_deref() {
            Some(year) if !year.trim().is_empty() => Some(year.to_string()),
            _ => self.date.map(|d| d.year().to_string()),
        }
    }

    /// Issue label used by group matching: final category, falling back to primary.
    pub fn issue_label(&self) -> &str {
        if self.final_category.is_empty() {
            &self.primary_category
        } else {
            &self.final_category
        }
    }
}
