//! Options passed to the markdown tag.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ConfigError;

/// Identifier used for extension specs without a `resolve` entry.
pub const UNKNOWN_EXTENSION: &str = "unknown";

/// One configured extension: which module to load and its options.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct ExtensionSpec {
    /// Extension identifier.
    #[serde(default)]
    pub resolve: Option<String>,
    /// Opaque options handed to the extension factory (`null` when absent).
    #[serde(default)]
    pub options: Value,
}

impl ExtensionSpec {
    /// Create a spec for an identifier with no options.
    #[must_use]
    pub fn new(resolve: impl Into<String>) -> Self {
        Self {
            resolve: Some(resolve.into()),
            options: Value::Null,
        }
    }

    /// Set the extension options.
    #[must_use]
    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    /// Identifier, or [`UNKNOWN_EXTENSION`] when `resolve` is missing or empty.
    #[must_use]
    pub fn id(&self) -> &str {
        match self.resolve.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => UNKNOWN_EXTENSION,
        }
    }
}

/// Options object supplied to the tag when a value is resolved.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TagOptions {
    /// Extensions applied before HTML emission, in order.
    pub plugins: Vec<ExtensionSpec>,
    /// Options passed verbatim to the HTML emission stage.
    #[serde(rename = "remarkHtml", alias = "remark_html", alias = "html")]
    pub html: Value,
}

impl TagOptions {
    /// Parse tag options from YAML.
    ///
    /// Empty input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the YAML is malformed.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(trimmed)?)
    }

    /// Builder-style helper appending an extension.
    #[must_use]
    pub fn with_plugin(mut self, spec: ExtensionSpec) -> Self {
        self.plugins.push(spec);
        self
    }

    /// Builder-style helper setting the HTML options.
    #[must_use]
    pub fn with_html(mut self, html: Value) -> Self {
        self.html = html;
        self
    }
}
