//! Pure normalization of loosely typed dataset values.
//!
//! Source datasets were produced by several export scripts over time, so the
//! same field may arrive as a JSON number, a numeric string, a boolean, a
//! `"True"` string or `null`. Each function here maps one such value onto the
//! strict type used by [`ReviewRecord`](crate::core::ReviewRecord) and never
//! fails: anything unusable becomes the documented default.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value;

/// Customer-service impact flag: true only for JSON `true` or the exact string `"True"`.
pub fn normalize_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(s)) => s == "True",
        _ => false,
    }
}

/// Star rating in `1..=5`. Integral floats and numeric strings are accepted.
pub fn normalize_rating(value: Option<&Value>) -> Option<u8> {
    let number = numeric_value(value?)?;
    if number.fract() != 0.0 || !(1.0..=5.0).contains(&number) {
        return None;
    }
    Some(number as u8)
}

/// Optional finite numeric score (technical severity).
pub fn normalize_score(value: Option<&Value>) -> Option<f64> {
    numeric_value(value?)
}

/// Non-negative count such as helpful votes; defaults to 0.
pub fn normalize_count(value: Option<&Value>) -> u32 {
    value
        .and_then(numeric_value)
        .filter(|n| *n >= 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

/// Free-form label or text. Numbers are stringified, everything else is empty.
///
/// Labels are passed through unmodified so that unseen categories survive.
pub fn normalize_label(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Year label from either a string or a number.
pub fn normalize_year(value: Option<&Value>) -> Option<String> {
    let label = normalize_label(value);
    let trimmed = label.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Calendar date from `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` or RFC 3339.
pub fn normalize_date(value: Option<&Value>) -> Option<NaiveDate> {
    let raw = match value? {
        Value::String(s) => s.trim(),
        _ => return None,
    };

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn numeric_value(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}
