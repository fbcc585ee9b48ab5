//! Extension factories and the registry that resolves them by identifier.
//!
//! An extension is any [`Transform`] that can be created from an identifier
//! and an untyped options object. Factories are registered under their
//! identifier in an [`ExtensionRegistry`]; loading an unknown identifier or
//! passing options the factory does not accept is reported as an
//! [`ExtensionError`] so callers can skip the stage instead of failing.

use std::collections::HashMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::Transform;

/// Error loading or applying an extension.
#[derive(Debug, thiserror::Error)]
pub enum ExtensionError {
    /// No factory is registered under the identifier.
    #[error("Extension '{0}' is not registered")]
    NotFound(String),
    /// The options object does not match what the extension expects.
    #[error("Invalid options for extension '{id}': {source}")]
    InvalidOptions {
        /// Extension identifier.
        id: String,
        /// Deserialization error.
        #[source]
        source: serde_json::Error,
    },
    /// The factory refused to create a transform.
    #[error("Extension '{id}' failed: {message}")]
    Failed {
        /// Extension identifier.
        id: String,
        /// Failure description.
        message: String,
    },
}

/// Creates a transform stage from an options object.
///
/// Implemented for closures so ad-hoc extensions can be registered without a
/// dedicated type.
pub trait ExtensionFactory: Send + Sync {
    /// Create the transform for the given options.
    ///
    /// `options` is `null` when the configuration supplied none.
    fn create(&self, options: &Value) -> Result<Box<dyn Transform>, ExtensionError>;
}

impl<F> ExtensionFactory for F
where
    F: Fn(&Value) -> Result<Box<dyn Transform>, ExtensionError> + Send + Sync,
{
    fn create(&self, options: &Value) -> Result<Box<dyn Transform>, ExtensionError> {
        self(options)
    }
}

/// Deserialize extension options, treating `null` as the defaults.
///
/// # Errors
///
/// Returns [`ExtensionError::InvalidOptions`] if deserialization fails.
pub fn parse_options<T>(id: &str, options: &Value) -> Result<T, ExtensionError>
where
    T: DeserializeOwned + Default,
{
    if options.is_null() {
        return Ok(T::default());
    }
    T::deserialize(options).map_err(|source| ExtensionError::InvalidOptions {
        id: id.to_owned(),
        source,
    })
}

/// Registry mapping extension identifiers to factories.
#[derive(Default, Clone)]
pub struct ExtensionRegistry {
    factories: HashMap<String, Arc<dyn ExtensionFactory>>,
}

impl ExtensionRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory, replacing any previous one with the same identifier.
    pub fn register<F: ExtensionFactory + 'static>(&mut self, id: impl Into<String>, factory: F) {
        self.factories.insert(id.into(), Arc::new(factory));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use]
    pub fn with_extension<F: ExtensionFactory + 'static>(
        mut self,
        id: impl Into<String>,
        factory: F,
    ) -> Self {
        self.register(id, factory);
        self
    }

    /// Check whether an identifier is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    /// Registered identifiers, sorted.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Resolve an identifier and create its transform with the given options.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError::NotFound`] for unknown identifiers, or the
    /// factory's own error.
    pub fn load(&self, id: &str, options: &Value) -> Result<Box<dyn Transform>, ExtensionError> {
        let factory = self
            .factories
            .get(id)
            .ok_or_else(|| ExtensionError::NotFound(id.to_owned()))?;
        factory.create(options)
    }
}
