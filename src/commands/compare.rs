use crate::cli::{InputArgs, OutputArgs};
use crate::comparison::ComparisonDimension;
use crate::config::ReviewlensConfig;
use crate::filter::filter_records;
use crate::formatting::FormattingConfig;
use crate::report::{compare_within, ComparisonRequest};
use anyhow::Result;

pub struct CompareConfig {
    pub input: InputArgs,
    pub output: OutputArgs,
    pub dimension: ComparisonDimension,
    pub left: String,
    pub right: String,
    pub formatting: FormattingConfig,
}

pub fn handle_compare(config: &ReviewlensConfig, compare: CompareConfig) -> Result<()> {
    if compare.left.trim().is_empty() || compare.right.trim().is_empty() {
        anyhow::bail!("Both --left and --right must name a {}", compare.dimension);
    }

    let records = super::load_records(config, &compare.input)?;
    let subset = filter_records(&records, &compare.input.filters.to_criteria());
    let request = ComparisonRequest {
        dimension: compare.dimension,
        left: compare.left,
        right: compare.right,
    };
    let result = compare_within(&subset, &request, &config.report_options(None).comparator());
    if result.left.stats.is_empty() || result.right.stats.is_empty() {
        log::warn!(
            "One side of {} vs {} has no reviews; no findings are reported",
            request.left,
            request.right
        );
    }

    let mut writer = super::open_writer(config, &compare.output, compare.formatting)?;
    writer.write_comparison(&result)?;
    writer.flush()
}
