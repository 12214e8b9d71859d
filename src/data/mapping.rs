//! Field-mapping adapter between dataset exports and the record model.
//!
//! Historical exports disagree on key names (`category` vs `primary_category`
//! vs `enhanced_category`, `app` vs `app_name`, ...). A [`FieldMapping`] lists,
//! for every canonical field, the source keys to try in order. The engine only
//! ever sees normalized [`ReviewRecord`]s.

use super::normalize::{
    normalize_count, normalize_date, normalize_flag, normalize_label, normalize_rating,
    normalize_score, normalize_year,
};
use crate::core::{Error, Result, ReviewRecord, Sentiment};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Named mapping presets for the known dataset exports.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum MappingPreset {
    /// snake_case dashboard bundle (`app_name`, `claude_sentiment`, ...)
    #[default]
    Dashboard,
    /// enhanced CSV export (`enhanced_category`, `enhanced_primary_focus`)
    Enhanced,
    /// early exports (`app`, `category`, `review`)
    Legacy,
}

impl MappingPreset {
    pub fn mapping(&self) -> FieldMapping {
        match self {
            Self::Dashboard => FieldMapping::dashboard(),
            Self::Enhanced => FieldMapping::enhanced(),
            Self::Legacy => FieldMapping::legacy(),
        }
    }
}

/// Source keys for every canonical record field, tried in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub id: Vec<String>,
    pub app_name: Vec<String>,
    pub platform: Vec<String>,
    pub rating: Vec<String>,
    pub sentiment: Vec<String>,
    pub date: Vec<String>,
    pub year: Vec<String>,
    pub primary_category: Vec<String>,
    pub final_category: Vec<String>,
    pub category_type: Vec<String>,
    pub customer_service_impact: Vec<String>,
    pub technical_severity: Vec<String>,
    pub text: Vec<String>,
    pub helpful_votes: Vec<String>,
    pub actionable_by: Vec<String>,
    /// Rewrites applied to category-type values (e.g. `APP-RELATED` -> `App-Related`).
    #[serde(default)]
    pub category_type_values: BTreeMap<String, String>,
}

fn keys(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self::dashboard()
    }
}

impl FieldMapping {
    pub fn dashboard() -> Self {
        Self {
            id: keys(&["review_id", "id"]),
            app_name: keys(&["app_name"]),
            platform: keys(&["platform"]),
            rating: keys(&["rating"]),
            sentiment: keys(&["claude_sentiment", "sentiment"]),
            date: keys(&["date"]),
            year: keys(&["year"]),
            primary_category: keys(&["primary_category"]),
            final_category: keys(&["final_category"]),
            category_type: keys(&["category_type"]),
            customer_service_impact: keys(&["customer_service_impact"]),
            technical_severity: keys(&["technical_severity"]),
            text: keys(&["text"]),
            helpful_votes: keys(&["thumbs_up", "helpful_votes"]),
            actionable_by: keys(&["actionable_by"]),
            category_type_values: BTreeMap::new(),
        }
    }

    pub fn enhanced() -> Self {
        let mut category_type_values = BTreeMap::new();
        category_type_values.insert("APP-RELATED".to_string(), "App-Related".to_string());
        category_type_values.insert("SERVICE-RELATED".to_string(), "Service-Related".to_string());
        category_type_values.insert("GENERAL".to_string(), "General".to_string());

        Self {
            primary_category: keys(&["enhanced_category", "primary_category"]),
            final_category: keys(&["enhanced_category", "final_category"]),
            category_type: keys(&["enhanced_primary_focus", "category_type"]),
            category_type_values,
            ..Self::dashboard()
        }
    }

    pub fn legacy() -> Self {
        Self {
            app_name: keys(&["app", "app_name"]),
            primary_category: keys(&["category", "primary_category"]),
            final_category: keys(&["final_category", "category"]),
            text: keys(&["review", "text"]),
            ..Self::dashboard()
        }
    }

    /// Replace the source keys of one canonical field.
    pub fn override_field(&mut self, field: &str, source_keys: Vec<String>) -> Result<()> {
        let slot = match field {
            "id" => &mut self.id,
            "app_name" => &mut self.app_name,
            "platform" => &mut self.platform,
            "rating" => &mut self.rating,
            "sentiment" => &mut self.sentiment,
            "date" => &mut self.date,
            "year" => &mut self.year,
            "primary_category" => &mut self.primary_category,
            "final_category" => &mut self.final_category,
            "category_type" => &mut self.category_type,
            "customer_service_impact" => &mut self.customer_service_impact,
            "technical_severity" => &mut self.technical_severity,
            "text" => &mut self.text,
            "helpful_votes" => &mut self.helpful_votes,
            "actionable_by" => &mut self.actionable_by,
            other => {
                return Err(Error::Configuration(format!(
                    "unknown mapping field '{other}'"
                )))
            }
        };
        if source_keys.is_empty() {
            return Err(Error::Configuration(format!(
                "mapping for '{field}' needs at least one source key"
            )));
        }
        *slot = source_keys;
        Ok(())
    }

    /// Whether the row carries a non-blank record id.
    pub fn has_id(&self, row: &Map<String, Value>) -> bool {
        !normalize_label(lookup(row, &self.id)).trim().is_empty()
    }

    /// Convert one raw dataset row into a normalized record.
    pub fn to_record(&self, row: &Map<String, Value>, index: usize) -> ReviewRecord {
        let get = |names: &[String]| lookup(row, names);

        let id = normalize_label(get(&self.id));
        let id = if id.is_empty() {
            format!("row-{index}")
        } else {
            id
        };

        let category_type = normalize_label(get(&self.category_type));
        let category_type = self
            .category_type_values
            .get(&category_type)
            .cloned()
            .unwrap_or(category_type);

        let actionable_by = normalize_label(get(&self.actionable_by));

        ReviewRecord {
            id,
            app_name: normalize_label(get(&self.app_name)),
            platform: normalize_label(get(&self.platform)),
            rating: normalize_rating(get(&self.rating)),
            sentiment: Sentiment::parse(&normalize_label(get(&self.sentiment))),
            date: normalize_date(get(&self.date)),
            year: normalize_year(get(&self.year)),
            primary_category: normalize_label(get(&self.primary_category)),
            final_category: normalize_label(get(&self.final_category)),
            category_type,
            customer_service_impact: normalize_flag(get(&self.customer_service_impact)),
            technical_severity: normalize_score(get(&self.technical_severity)),
            text: normalize_label(get(&self.text)),
            helpful_votes: normalize_count(get(&self.helpful_votes)),
            actionable_by: (!actionable_by.is_empty()).then_some(actionable_by),
        }
    }
}

/// First present, non-null value among `names`.
fn lookup<'v>(row: &'v Map<String, Value>, names: &[String]) -> Option<&'v Value> {
    names
        .iter()
        .filter_map(|name| row.get(name))
        .find(|value| !value.is_null())
}
