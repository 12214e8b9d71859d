use anyhow::Result;
use clap::Parser;
use reviewlens::cli::{Cli, Commands};
use reviewlens::commands::{
    handle_compare, handle_issues, handle_rank, handle_summary, CompareConfig, RankConfig,
    SummaryConfig,
};
use reviewlens::config::{get_config, init_config, load_config_from, ReviewlensConfig};
use reviewlens::formatting::FormattingConfig;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    if let Commands::Init { force } = cli.command {
        return reviewlens::commands::init_config(force);
    }

    let config = resolve_config(&cli)?;
    let formatting = FormattingConfig::resolve(cli.plain);

    match cli.command {
        Commands::Summary {
            input,
            output,
            top,
            field,
        } => handle_summary(
            config,
            SummaryConfig {
                input,
                output,
                top,
                field,
                formatting,
            },
        ),
        Commands::Rank {
            input,
            output,
            top,
            field,
            negative_only,
        } => handle_rank(
            config,
            RankConfig {
                input,
                output,
                top,
                field,
                negative_only,
                formatting,
            },
        ),
        Commands::Compare {
            input,
            output,
            dimension,
            left,
            right,
        } => handle_compare(
            config,
            CompareConfig {
                input,
                output,
                dimension,
                left,
                right,
                formatting,
            },
        ),
        Commands::Issues { input, output } => handle_issues(config, &input, &output, formatting),
        Commands::Init { .. } => Ok(()),
    }
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from the warn default.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// An explicit `--config` must load; otherwise the discovered file or defaults.
fn resolve_config(cli: &Cli) -> Result<&'static ReviewlensConfig> {
    if let Some(path) = &cli.config {
        let config = load_config_from(path)?;
        if !init_config(config) {
            tracing::warn!("Configuration already initialised; ignoring {}", path.display());
        }
    }
    Ok(get_config())
}
