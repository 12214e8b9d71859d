use crate::aggregation::{category_breakdown, category_type_stats};
use crate::cli::{InputArgs, OutputArgs};
use crate::config::ReviewlensConfig;
use crate::filter::filter_records;
use crate::formatting::FormattingConfig;
use anyhow::Result;

pub fn handle_issues(
    config: &ReviewlensConfig,
    input: &InputArgs,
    output: &OutputArgs,
    formatting: FormattingConfig,
) -> Result<()> {
    let records = super::load_records(config, input)?;
    let subset = filter_records(&records, &input.filters.to_criteria());

    let mut writer = super::open_writer(config, output, formatting)?;
    writer.write_issues(&category_breakdown(&subset), &category_type_stats(&subset))?;
    writer.flush()
}
