#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for rmkit
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/rmkit/config.toml)
//! - Environment variables

pub mod constants;

use constants::{
    CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_STACK_SIZE, DEFAULT_TIME_BUFFER,
    DEFAULT_TIME_FORMAT, MAX_TIME_BUFFER, MIN_STACK_SIZE,
};
use rmkit_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub threads: ThreadConfig,

    #[serde(default)]
    pub time: TimeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Thread creation attributes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThreadConfig {
    #[serde(default = "default_stack_size")]
    pub stack_size: usize, // bytes
    /// Request 1:1 kernel threads where the platform offers a choice
    #[serde(default = "default_system_scope")]
    pub system_scope: bool,
}

/// Time rendering defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeConfig {
    #[serde(default = "default_time_format")]
    pub format: String,
    #[serde(default = "default_time_buffer")]
    pub buffer_size: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

/// Log line layout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

// Default implementations

impl Default for ThreadConfig {
    fn default() -> Self {
        Self {
            stack_size: DEFAULT_STACK_SIZE,
            system_scope: true,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            format: DEFAULT_TIME_FORMAT.to_string(),
            buffer_size: DEFAULT_TIME_BUFFER,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: LogFormat::Plain,
        }
    }
}

// Default value functions for serde
fn default_stack_size() -> usize {
    DEFAULT_STACK_SIZE
}

fn default_system_scope() -> bool {
    true
}

fn default_time_format() -> String {
    DEFAULT_TIME_FORMAT.to_string()
}

fn default_time_buffer() -> usize {
    DEFAULT_TIME_BUFFER
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the file contents
    /// contain invalid TOML syntax that cannot be parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|_| ConfigError::NotFound {
                path: path.display().to_string(),
            })?;

        let config: Self = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or contains invalid TOML syntax.
    pub async fn load() -> Result<Self, Error> {
        let config_path = Self::default_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Render the configuration back to TOML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string_pretty(self).map_err(|e| {
            ConfigError::SerializeError {
                error: e.to_string(),
            }
            .into()
        })
    }

    /// Merge with environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values
    /// that cannot be parsed into the expected types.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        // RMKIT_THREAD_STACK_SIZE
        if let Ok(size) = std::env::var("RMKIT_THREAD_STACK_SIZE") {
            self.threads.stack_size = size.parse().map_err(|_| ConfigError::InvalidValue {
                field: "RMKIT_THREAD_STACK_SIZE".to_string(),
                value: size,
            })?;
        }

        // RMKIT_THREAD_SYSTEM_SCOPE
        if let Ok(scope) = std::env::var("RMKIT_THREAD_SYSTEM_SCOPE") {
            self.threads.system_scope = match scope.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "RMKIT_THREAD_SYSTEM_SCOPE".to_string(),
                        value: scope,
                    }
                    .into())
                }
            };
        }

        // RMKIT_TIME_FORMAT
        if let Ok(format) = std::env::var("RMKIT_TIME_FORMAT") {
            self.time.format = format;
        }

        // RMKIT_LOG_LEVEL
        if let Ok(level) = std::env::var("RMKIT_LOG_LEVEL") {
            self.logging.level = level;
        }

        // RMKIT_LOG_FORMAT
        if let Ok(format) = std::env::var("RMKIT_LOG_FORMAT") {
            self.logging.format = match format.as_str() {
                "plain" => LogFormat::Plain,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: "RMKIT_LOG_FORMAT".to_string(),
                        value: format,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Check values that parse fine but cannot be used
    ///
    /// # Errors
    ///
    /// Returns an error naming the first offending field.
    pub fn validate(&self) -> Result<(), Error> {
        if self.threads.stack_size < MIN_STACK_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "threads.stack_size".to_string(),
                value: self.threads.stack_size.to_string(),
            }
            .into());
        }
        if self.time.buffer_size == 0 || self.time.buffer_size > MAX_TIME_BUFFER {
            return Err(ConfigError::InvalidValue {
                field: "time.buffer_size".to_string(),
                value: self.time.buffer_size.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
