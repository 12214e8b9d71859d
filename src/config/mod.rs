//! Configuration: `.reviewlens.toml` discovery, parsing, validation and the
//! cached accessors used by the CLI.

mod accessors;
mod core;
mod loader;

pub use accessors::{get_config, init_config, resolve_top_n, TOP_N_ENV};
pub use core::{MappingConfig, OutputConfig, RankingConfig, ReviewlensConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
