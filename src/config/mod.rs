//! Configuration management
//!
//! Settings are read once per process. [`current`] initialises them from the
//! environment on first use unless [`install`] ran before.

pub mod file;
pub mod parser;

use std::sync::OnceLock;

use crate::error::{ConfigError, ConfigResult};
use crate::models::config::{PartialSettings, Settings};

pub use file::{EnvConfig, FileConfig, ENV_PREFIX};
pub use parser::{find_default_config, parse_config_content, parse_config_file};

static SETTINGS: OnceLock<Settings> = OnceLock::new();

/// Trait for configuration sources
pub trait ConfigSource {
    /// Load configuration from this source
    fn load(&self) -> ConfigResult<PartialSettings>;

    /// Check if this configuration source is available
    fn is_available(&self) -> bool;

    /// Get the name of this configuration source for logging
    fn name(&self) -> &str;
}

/// Configuration builder for merging multiple sources.
/// Sources merged later take precedence.
pub struct ConfigBuilder {
    partial: PartialSettings,
}

impl ConfigBuilder {
    /// Create a new configuration builder with defaults
    pub fn new() -> Self {
        Self {
            partial: PartialSettings::default(),
        }
    }

    /// Merge settings from a partial configuration
    pub fn merge(mut self, partial: PartialSettings) -> Self {
        self.partial.merge_from(partial);
        self
    }

    /// Load and merge settings from a configuration source
    pub fn load_from<S: ConfigSource>(self, source: &S) -> ConfigResult<Self> {
        if source.is_available() {
            Ok(self.merge(source.load()?))
        } else {
            Ok(self)
        }
    }

    /// Try to load from a source, keeping current settings if it fails
    pub fn try_load_from<S: ConfigSource>(self, source: &S) -> Self {
        if !source.is_available() {
            return self;
        }
        match source.load() {
            Ok(partial) => self.merge(partial),
            Err(err) => {
                log::warn!("ignoring {}: {}", source.name(), err);
                self
            }
        }
    }

    /// Add configuration from a file
    pub fn add_config_file(self, path: &std::path::Path) -> ConfigResult<Self> {
        let file_config = FileConfig::with_path(path);
        self.load_from(&file_config)
    }

    /// Build the final settings
    pub fn build(self) -> Settings {
        self.partial.to_settings()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Load configuration from the default file, then the environment.
/// Environment variables override the file.
pub fn load_config() -> ConfigResult<Settings> {
    load_config_with_env_prefix(ENV_PREFIX)
}

/// Load configuration with a custom environment variable prefix
pub fn load_config_with_env_prefix(env_prefix: &str) -> ConfigResult<Settings> {
    let mut builder = ConfigBuilder::new();

    if let Some(default_config) = find_default_config()? {
        builder = builder.merge(default_config);
    }

    builder = builder.load_from(&EnvConfig::new(env_prefix))?;

    Ok(builder.build())
}

/// Install process-wide settings. Fails once settings are in use.
pub fn install(settings: Settings) -> ConfigResult<()> {
    SETTINGS
        .set(settings)
        .map_err(|_| ConfigError::AlreadyInstalled)
}

/// Process-wide settings, read from the environment on first use
pub fn current() -> &'static Settings {
    SETTINGS.get_or_init(|| {
        ConfigBuilder::new()
            .try_load_from(&EnvConfig::new(ENV_PREFIX))
            .build()
    })
}
