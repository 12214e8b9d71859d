//! Data-load boundary.
//!
//! Reads a dataset export, locates the record rows and converts every row
//! into a [`ReviewRecord`] through a [`FieldMapping`]. This is the only place
//! where loosely typed values are interpreted; the engines downstream work on
//! the normalized model.
//!
//! Two encodings are understood: JSON (a bare array or a dashboard bundle)
//! and CSV with a header row, as written by the enhanced analysis export.

pub mod mapping;
pub mod normalize;

pub use mapping::{FieldMapping, MappingPreset};

use crate::core::{Error, Result, ResultExt, ReviewRecord};
use serde_json::{Map, Value};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info_span};

/// Keys under which bundled dashboard exports store the record array.
const RECORD_ARRAY_KEYS: &[&str] = &["all_reviews", "reviews"];

/// Source name used in errors for documents that did not come from a file.
const INLINE_SOURCE: &str = "<inline>";

/// On-disk dataset encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Json,
    Csv,
}

impl DatasetFormat {
    /// `.csv` files are read as CSV; everything else as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Json,
        }
    }
}

/// Load and normalize a dataset from disk.
pub fn load_dataset(path: &Path, mapping: &FieldMapping) -> Result<Vec<ReviewRecord>> {
    let format = DatasetFormat::from_path(path);
    let _span = info_span!("load_dataset", path = %path.display(), ?format).entered();

    let contents = fs::read_to_string(path)
        .map_err(|e| Error::dataset(path, format!("failed to read file: {e}")))?;

    match format {
        DatasetFormat::Json => {
            let document: Value = serde_json::from_str(&contents)?;
            parse_document(&document, mapping, path)
        }
        DatasetFormat::Csv => parse_csv(contents.as_bytes(), mapping)
            .context(format!("Failed to read CSV dataset {}", path.display())),
    }
}

/// Normalize every row of an already parsed JSON document.
///
/// Rows that are not JSON objects are skipped; everything else is kept, with
/// missing or malformed fields replaced by their defaults.
pub fn parse_dataset(document: &Value, mapping: &FieldMapping) -> Result<Vec<ReviewRecord>> {
    parse_document(document, mapping, Path::new(INLINE_SOURCE))
}

/// Normalize the rows of a CSV export with a header row.
///
/// Every cell is read as text and blank cells count as absent, so the
/// mapping's fallback keys still apply. Rows without a record id are
/// dropped; exports pad the file with such rows.
pub fn parse_csv<R: Read>(input: R, mapping: &FieldMapping) -> Result<Vec<ReviewRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input);
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    let mut dropped = 0usize;
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let object: Map<String, Value> = headers
            .iter()
            .zip(row.iter())
            .filter(|(_, cell)| !cell.trim().is_empty())
            .map(|(header, cell)| (header.to_string(), Value::String(cell.to_string())))
            .collect();

        if !mapping.has_id(&object) {
            dropped += 1;
            continue;
        }
        records.push(mapping.to_record(&object, index));
    }

    debug!(
        loaded = records.len(),
        dropped, "Normalized CSV rows into review records"
    );
    Ok(records)
}

fn parse_document(
    document: &Value,
    mapping: &FieldMapping,
    source: &Path,
) -> Result<Vec<ReviewRecord>> {
    let rows = locate_records(document).ok_or_else(|| {
        Error::dataset(
            source,
            format!(
                "expected an array of records or an object with one of {:?}",
                RECORD_ARRAY_KEYS
            ),
        )
    })?;

    let mut skipped = 0usize;
    let records: Vec<ReviewRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| match row.as_object() {
            Some(object) => Some(mapping.to_record(object, index)),
            None => {
                skipped += 1;
                None
            }
        })
        .collect();

    debug!(
        loaded = records.len(),
        skipped, "Normalized dataset rows into review records"
    );
    Ok(records)
}

fn locate_records(document: &Value) -> Option<&Vec<Value>> {
    match document {
        Value::Array(rows) => Some(rows),
        Value::Object(object) => RECORD_ARRAY_KEYS
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_array)),
        _ => None,
    }
}
