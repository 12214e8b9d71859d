use crate::cli::{InputArgs, OutputArgs};
use crate::config::{resolve_top_n, ReviewlensConfig};
use crate::formatting::FormattingConfig;
use crate::ranking::CategoryField;
use crate::report::build_report;
use anyhow::Result;

pub struct SummaryConfig {
    pub input: InputArgs,
    pub output: OutputArgs,
    pub top: Option<usize>,
    pub field: CategoryField,
    pub formatting: FormattingConfig,
}

pub fn handle_summary(config: &ReviewlensConfig, summary: SummaryConfig) -> Result<()> {
    let records = super::load_records(config, &summary.input)?;
    let criteria = summary.input.filters.to_criteria();

    let mut options = config.report_options(Some(resolve_top_n(summary.top, config)));
    options.field = summary.field;

    let report = build_report(&records, &criteria, &options);
    if report.is_empty() {
        log::warn!("No reviews match the selected filters");
    }

    let mut writer = super::open_writer(config, &summary.output, summary.formatting)?;
    writer.write_report(&report)?;
    writer.flush()
}
