//! Configuration management for fullmd.
//!
//! Two layers:
//!
//! - [`TagOptions`]: the options object handed to the markdown tag at
//!   resolution time (`plugins` and `remarkHtml`). Parses from YAML or TOML.
//! - [`Config`]: a `fullmd.toml` file carrying the tag name and default
//!   [`TagOptions`], loaded from an explicit path.
//!
//! ## Example `fullmd.toml`
//!
//! ```toml
//! [tag]
//! name = "!markdown"
//!
//! [[plugins]]
//! resolve = "gfm"
//!
//! [[plugins]]
//! resolve = "external-links"
//! options = { target = "_blank" }
//!
//! [remarkHtml]
//! sanitize = true
//! ```

mod options;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use options::{ExtensionSpec, TagOptions, UNKNOWN_EXTENSION};

/// Default tag name.
pub const DEFAULT_TAG_NAME: &str = "!markdown";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag configuration.
    pub tag: TagConfig,
    /// Default tag options (`plugins`, `remarkHtml`), flattened into the root table.
    #[serde(flatten)]
    pub options: TagOptions,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Tag configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TagConfig {
    /// Tag name as written in documents, e.g. `!markdown`.
    pub name: String,
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_TAG_NAME.to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from an explicit file, or defaults when `None`.
    ///
    /// # Errors
    ///
    /// Returns error if `config_path` doesn't exist, parsing fails, or
    /// validation fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = config_path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.tag.name, "tag.name")?;
        if self.tag.name.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "tag.name cannot contain whitespace".to_owned(),
            ));
        }
        Ok(())
    }
}
