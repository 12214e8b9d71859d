use crate::comparison::ComparisonDimension;
use crate::data::MappingPreset;
use crate::filter::FilterCriteria;
use crate::io::OutputFormat;
use crate::ranking::CategoryField;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "reviewlens")]
#[command(about = "Filter, aggregate and compare app review datasets", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the nearest .reviewlens.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Disable colour and emoji in terminal output
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Full dashboard report for the selected reviews
    Summary {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Number of categories to rank
        #[arg(long)]
        top: Option<usize>,

        /// Category field used for rankings
        #[arg(long = "by", value_enum, default_value = "final")]
        field: CategoryField,
    },

    /// Rank the most common categories
    Rank {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Number of categories to rank
        #[arg(long)]
        top: Option<usize>,

        /// Category field to rank by
        #[arg(long = "by", value_enum, default_value = "final")]
        field: CategoryField,

        /// Count negative reviews only
        #[arg(long)]
        negative_only: bool,
    },

    /// Compare two apps, platforms or category types
    Compare {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,

        /// Dimension the two sides are taken from
        #[arg(long, value_enum, default_value = "platform")]
        dimension: ComparisonDimension,

        /// Left side value (e.g. "iOS")
        #[arg(long)]
        left: String,

        /// Right side value (e.g. "Android")
        #[arg(long)]
        right: String,
    },

    /// Issue breakdown per category and category type
    Issues {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Write a default .reviewlens.toml in the current directory
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Review dataset (JSON array, dashboard bundle or CSV export)
    pub data: PathBuf,

    /// Field-mapping preset (overrides the configured one)
    #[arg(long, value_enum)]
    pub mapping: Option<MappingPreset>,

    #[command(flatten)]
    pub filters: FilterArgs,
}

/// Dashboard filter controls; "all" leaves a dimension unconstrained.
#[derive(Args, Debug, Clone)]
pub struct FilterArgs {
    #[arg(long, default_value = "all")]
    pub app: String,

    #[arg(long, default_value = "all")]
    pub platform: String,

    /// Positive, Negative, Neutral or Mixed
    #[arg(long, default_value = "all")]
    pub sentiment: String,

    #[arg(long, default_value = "all")]
    pub category_type: String,

    /// Final category label
    #[arg(long, default_value = "all")]
    pub category: String,

    #[arg(long, default_value = "all")]
    pub year: String,

    /// Case-insensitive text search
    #[arg(long, default_value = "")]
    pub search: String,
}

impl FilterArgs {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria::all()
            .with_app(&self.app)
            .with_platform(&self.platform)
            .with_sentiment(&self.sentiment)
            .with_category_type(&self.category_type)
            .with_category(&self.category)
            .with_year(&self.year)
            .with_search(&self.search)
    }
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
