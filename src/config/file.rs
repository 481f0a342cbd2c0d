//! Configuration file and environment sources

use std::path::{Path, PathBuf};

use super::{parser, ConfigSource};
use crate::error::{ConfigError, ConfigResult};
use crate::models::config::{PartialSettings, StackCapture};

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".errchain.toml";

/// Default prefix for environment variables
pub const ENV_PREFIX: &str = "ERRCHAIN";

/// Configuration file source
pub struct FileConfig {
    path: PathBuf,
    name: String,
}

impl FileConfig {
    /// Create a new file configuration source with the default path
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            name: "default config file".to_string(),
        }
    }

    /// Create a new file configuration source with a custom path
    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            name: format!("config file ({})", path.as_ref().display()),
        }
    }
}

impl ConfigSource for FileConfig {
    fn load(&self) -> ConfigResult<PartialSettings> {
        if !self.is_available() {
            return Err(ConfigError::NotFound {
                path: self.path.clone(),
            });
        }

        parser::parse_config_file(&self.path)
    }

    fn is_available(&self) -> bool {
        self.path.is_file()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Default for FileConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Environment variable configuration source
pub struct EnvConfig {
    prefix: String,
    name: String,
}

impl EnvConfig {
    /// Create a new environment variable configuration source
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            name: format!("{} environment variables", &prefix),
            prefix,
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    fn var(&self, suffix: &str) -> Option<(String, String)> {
        let key = self.key(suffix);
        std::env::var(&key).ok().map(|value| (key, value))
    }
}

impl ConfigSource for EnvConfig {
    fn load(&self) -> ConfigResult<PartialSettings> {
        let mut settings = PartialSettings::default();

        if let Some((key, value)) = self.var("STACK_CAPTURE") {
            let policy = value
                .parse::<StackCapture>()
                .map_err(|_| ConfigError::InvalidValue { key, value })?;
            settings.stack_capture = Some(policy);
        }

        if let Some((key, value)) = self.var("LOG_FAILURES") {
            let enabled = parse_flag(&value).ok_or(ConfigError::InvalidValue { key, value })?;
            settings.log_failures = Some(enabled);
        }

        Ok(settings)
    }

    fn is_available(&self) -> bool {
        self.var("STACK_CAPTURE").is_some() || self.var("LOG_FAILURES").is_some()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
