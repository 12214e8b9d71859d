use crate::cli::{InputArgs, OutputArgs};
use crate::config::{resolve_top_n, ReviewlensConfig};
use crate::filter::filter_records;
use crate::formatting::FormattingConfig;
use crate::ranking::{top_categories, top_negative_issues, CategoryField};
use anyhow::Result;

pub struct RankConfig {
    pub input: InputArgs,
    pub output: OutputArgs,
    pub top: Option<usize>,
    pub field: CategoryField,
    pub negative_only: bool,
    pub formatting: FormattingConfig,
}

pub fn handle_rank(config: &ReviewlensConfig, rank: RankConfig) -> Result<()> {
    let records = super::load_records(config, &rank.input)?;
    let subset = filter_records(&records, &rank.input.filters.to_criteria());
    let n = resolve_top_n(rank.top, config);
    let noise = config.ranking.noise_policy();

    let (title, entries) = if rank.negative_only {
        (
            format!("Top {n} complaints by {}", rank.field),
            top_negative_issues(&subset, rank.field, n, &noise),
        )
    } else {
        (
            format!("Top {n} by {}", rank.field),
            top_categories(&subset, rank.field, n, &noise),
        )
    };

    let mut writer = super::open_writer(config, &rank.output, rank.formatting)?;
    writer.write_ranking(&title, &entries)?;
    writer.flush()
}
