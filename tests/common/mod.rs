// Shared fixtures for reviewlens integration tests
#![allow(dead_code)]

use reviewlens::core::{ReviewRecord, Sentiment};
use reviewlens::data::{load_dataset, FieldMapping};
use std::path::PathBuf;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/fixtures")
        .join(name)
}

/// The bundled eleven-review dataset.
pub fn load_fixture() -> Vec<ReviewRecord> {
    load_dataset(&fixture_path("reviews.json"), &FieldMapping::dashboard())
        .expect("fixture dataset loads")
}

pub fn review(app: &str, platform: &str, rating: u8, sentiment: Sentiment) -> ReviewRecord {
    ReviewRecord::new(format!("{app}-{platform}-{rating}"), app, platform)
        .with_rating(rating)
        .with_sentiment(sentiment)
}

/// `count` records per `(final category, count)` pair, in the given order.
pub fn records_with_categories(groups: &[(&str, usize)]) -> Vec<ReviewRecord> {
    groups
        .iter()
        .flat_map(|(category, count)| {
            (0..*count).map(move |i| {
                ReviewRecord::new(format!("{category}-{i}"), "Rogers", "iOS")
                    .with_categories(*category, *category)
            })
        })
        .collect()
}

/// `total` records of `app` on `platform`, the first `negative` of them negative.
pub fn side(app: &str, platform: &str, negative: usize, total: usize) -> Vec<ReviewRecord> {
    (0..total)
        .map(|i| {
            let (sentiment, rating) = if i < negative {
                (Sentiment::Negative, 1)
            } else {
                (Sentiment::Positive, 5)
            };
            ReviewRecord::new(format!("{app}-{platform}-{i}"), app, platform)
                .with_sentiment(sentiment)
                .with_rating(rating)
        })
        .collect()
}

pub fn refs(records: &[ReviewRecord]) -> Vec<&ReviewRecord> {
    records.iter().collect()
}
