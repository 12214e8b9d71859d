use crate::config::{ReviewlensConfig, CONFIG_FILE_NAME};
use crate::io;
use anyhow::Result;
use std::path::Path;

const HEADER: &str = "# Reviewlens Configuration
#
# Every section is optional; removed keys fall back to the values below.
";

/// Default configuration file contents.
pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&ReviewlensConfig::default())?;
    Ok(format!("{HEADER}\n{body}"))
}

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)?;
    println!("Created {CONFIG_FILE_NAME} configuration file");
    Ok(())
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, &default_config_toml()?)
}
