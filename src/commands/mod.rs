//! CLI command implementations for reviewlens.
//!
//! Available commands:
//! - **summary**: Full dashboard report for the selected reviews
//! - **rank**: Most common (or most complained about) categories
//! - **compare**: Two-sided comparison with findings
//! - **issues**: Per-category issue breakdown and category-type stats
//! - **init**: Write a default `.reviewlens.toml`
//!
//! Every data command loads the dataset once, filters it with the shared
//! filter flags and hands the result to an [`OutputWriter`].

pub mod compare;
pub mod init;
pub mod issues;
pub mod rank;
pub mod summary;

pub use compare::{handle_compare, CompareConfig};
pub use init::init_config;
pub use issues::handle_issues;
pub use rank::{handle_rank, RankConfig};
pub use summary::{handle_summary, SummaryConfig};

use crate::cli::{InputArgs, OutputArgs};
use crate::config::ReviewlensConfig;
use crate::core::ReviewRecord;
use crate::data::load_dataset;
use crate::formatting::FormattingConfig;
use crate::io::{create_writer, open_output, OutputWriter};
use anyhow::{Context, Result};

/// Load the dataset named by `input`, using the CLI preset when given.
pub fn load_records(config: &ReviewlensConfig, input: &InputArgs) -> Result<Vec<ReviewRecord>> {
    let mapping = match input.mapping {
        Some(preset) => preset.mapping(),
        None => config.mapping.field_mapping()?,
    };
    let records = load_dataset(&input.data, &mapping)
        .with_context(|| format!("loading dataset {}", input.data.display()))?;
    log::info!("Loaded {} reviews from {}", records.len(), input.data.display());
    Ok(records)
}

/// Writer for the requested format and destination.
pub fn open_writer(
    config: &ReviewlensConfig,
    output: &OutputArgs,
    formatting: FormattingConfig,
) -> Result<Box<dyn OutputWriter>> {
    let format = output.format.unwrap_or(config.output.default_format);
    let sink = open_output(output.output.as_deref())?;
    Ok(create_writer(format, sink, formatting))
}
