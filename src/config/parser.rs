//! Configuration file parsing utilities

use std::fs;
use std::path::{Path, PathBuf};

use super::file::DEFAULT_CONFIG_FILE;
use crate::error::{ConfigError, ConfigResult};
use crate::models::config::PartialSettings;

/// Parse a TOML configuration file into PartialSettings
pub fn parse_config_file<P: AsRef<Path>>(path: P) -> ConfigResult<PartialSettings> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config_content(&content, path)
}

/// Parse TOML configuration content into PartialSettings
pub fn parse_config_content<P: AsRef<Path>>(
    content: &str,
    path: P,
) -> ConfigResult<PartialSettings> {
    toml::from_str(content).map_err(|e| ConfigError::Parse {
        path: path.as_ref().to_path_buf(),
        source: e,
    })
}

/// Load the configuration file from the current directory, if there is one
pub fn find_default_config() -> ConfigResult<Option<PartialSettings>> {
    let current_dir_config = PathBuf::from(DEFAULT_CONFIG_FILE);
    if current_dir_config.is_file() {
        return Ok(Some(parse_config_file(current_dir_config)?));
    }

    Ok(None)
}
