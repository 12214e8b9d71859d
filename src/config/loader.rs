use std::fs;
use std::path::{Path, PathBuf};

use super::core::ReviewlensConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".reviewlens.toml";
const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<ReviewlensConfig> {
    let config = toml::from_str::<ReviewlensConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly requested config file; any problem is an error.
pub fn load_config_from(path: &Path) -> Result<ReviewlensConfig> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Configuration(format!("failed to read {}: {e}", path.display()))
    })?;
    let config = parse_and_validate_config(&contents).map_err(|e| {
        Error::Configuration(format!("invalid config {}: {e}", path.display()))
    })?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Try loading a discovered config file; problems are logged and skipped.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<ReviewlensConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

/// Handle file read errors with appropriate logging
fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // "not found" is the normal case while walking up
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        parent.pop().then_some(parent)
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.reviewlens.toml`.
pub fn discover_config(start: PathBuf) -> Option<ReviewlensConfig> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
}

pub fn load_config() -> ReviewlensConfig {
    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            return ReviewlensConfig::default();
        }
    };

    discover_config(current).unwrap_or_else(|| {
        log::debug!(
            "No config found after checking {} directories. Using default config.",
            MAX_TRAVERSAL_DEPTH
        );
        ReviewlensConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn ancestors_stop_at_depth() {
        let dirs: Vec<PathBuf> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn discovers_config_in_parent() {
        let root = TempDir::new().unwrap();
        let nested = root.path().join("data").join("exports");
        fs::create_dir_all(&nested).unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[ranking]\ndefault_top_n = 7\n",
        )
        .unwrap();

        let config = discover_config(nested).expect("config found");
        assert_eq!(config.ranking.default_top_n, 7);
    }

    #[test]
    fn invalid_discovered_config_is_skipped() {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(CONFIG_FILE_NAME),
            "[thresholds]\napp_gap_points = 500\n",
        )
        .unwrap();
        assert!(try_load_config_from_path(&root.path().join(CONFIG_FILE_NAME)).is_none());
    }

    #[test]
    fn explicit_invalid_config_is_an_error() {
        let root = TempDir::new().unwrap();
        let path = root.path().join("custom.toml");
        fs::write(&path, "[ranking]\ndefault_top_n = \"many\"\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(Error::Configuration(_))
        ));
        assert!(load_config_from(&root.path().join("missing.toml")).is_err());
    }
}
