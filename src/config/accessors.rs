use std::sync::OnceLock;

use super::core::ReviewlensConfig;
use super::loader::load_config;

/// Environment override for the ranking size
pub const TOP_N_ENV: &str = "REVIEWLENS_TOP_N";

/// Cache the configuration
static CONFIG: OnceLock<ReviewlensConfig> = OnceLock::new();

/// Get the cached configuration, discovering it on first use
pub fn get_config() -> &'static ReviewlensConfig {
    CONFIG.get_or_init(load_config)
}

/// Install an explicitly loaded configuration.
///
/// Returns false when a configuration was already cached; the cached one stays.
pub fn init_config(config: ReviewlensConfig) -> bool {
    CONFIG.set(config).is_ok()
}

/// Ranking size with precedence: CLI > environment > config file > default.
pub fn resolve_top_n(cli_value: Option<usize>, config: &ReviewlensConfig) -> usize {
    cli_value
        .or_else(|| top_n_from_env(std::env::var(TOP_N_ENV).ok().as_deref()))
        .unwrap_or(config.ranking.default_top_n)
}

/// Parse an environment value; non-numeric or zero values are ignored.
fn top_n_from_env(value: Option<&str>) -> Option<usize> {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|n| *n > 0)
}
