//! Pipeline cache and builder.
//!
//! HTML pipelines are built once per distinct extension sequence and reused
//! for the lifetime of the cache. The plain-text pipeline does not depend on
//! configuration, so a single instance is built lazily and shared.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use fullmd_config::ExtensionSpec;
use fullmd_extensions::builtin_registry;
use fullmd_pipeline::{
    ExtensionRegistry, HtmlEmitter, Pipeline, PipelineError, plain_text_pipeline,
};
use serde_json::Value;

/// Separator between extension identifiers in a [`CacheKey`].
pub const KEY_SEPARATOR: &str = ":";

/// Cache key derived from an ordered extension sequence.
///
/// Identifiers are joined with [`KEY_SEPARATOR`]. Every spec contributes a
/// non-empty identifier, so the empty string used for the default key (no
/// extensions) never collides with a real sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Key for an empty (or omitted) extension list.
    pub const DEFAULT: Self = Self(String::new());

    /// Derive the key for an extension sequence.
    #[must_use]
    pub fn from_specs(specs: &[ExtensionSpec]) -> Self {
        let ids: Vec<&str> = specs.iter().map(ExtensionSpec::id).collect();
        Self(ids.join(KEY_SEPARATOR))
    }

    /// Raw key string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the key for no extensions.
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_default() {
            f.write_str("default")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// Builds and caches markdown pipelines.
///
/// Holds one HTML pipeline per [`CacheKey`] and the plain-text singleton.
/// Entries are never evicted: extension configuration is expected to stay
/// fixed while the cache lives. Share it between tag instances with an `Arc`.
///
/// The map lock is never held while a pipeline is being built. Two
/// conversions that miss on the same key at the same time both build, and the
/// later insert wins; both pipelines are equivalent.
pub struct PipelineCache {
    registry: ExtensionRegistry,
    html: RwLock<HashMap<CacheKey, Arc<Pipeline>>>,
    plain: OnceLock<Arc<Pipeline>>,
    builds: AtomicUsize,
}

impl Default for PipelineCache {
    fn default() -> Self {
        Self::new(builtin_registry())
    }
}

impl PipelineCache {
    /// Create an empty cache resolving extensions through `registry`.
    #[must_use]
    pub fn new(registry: ExtensionRegistry) -> Self {
        Self {
            registry,
            html: RwLock::new(HashMap::new()),
            plain: OnceLock::new(),
            builds: AtomicUsize::new(0),
        }
    }

    /// Get the HTML pipeline for an extension sequence, building it on first use.
    ///
    /// Extensions that cannot be loaded are skipped with a warning; the rest
    /// of the pipeline is kept. `html_options` configures the final HTML
    /// stage and only matters when the pipeline is built.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidOptions`] if `html_options` is invalid.
    pub fn html_pipeline(
        &self,
        plugins: &[ExtensionSpec],
        html_options: &Value,
    ) -> Result<Arc<Pipeline>, PipelineError> {
        let key = CacheKey::from_specs(plugins);
        if let Some(pipeline) = self.read().get(&key) {
            return Ok(Arc::clone(pipeline));
        }

        let pipeline = Arc::new(self.build_html(&key, plugins, html_options)?);
        self.write().insert(key, Arc::clone(&pipeline));
        Ok(pipeline)
    }

    /// Get the shared plain-text pipeline, building it on first use.
    pub fn plain_pipeline(&self) -> Arc<Pipeline> {
        let pipeline = self.plain.get_or_init(|| {
            tracing::debug!("Building plain-text pipeline");
            Arc::new(plain_text_pipeline())
        });
        Arc::clone(pipeline)
    }

    /// Number of HTML pipelines built so far.
    #[must_use]
    pub fn build_count(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }

    /// Whether an HTML pipeline is cached under `key`.
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.read().contains_key(key)
    }

    /// Number of cached HTML pipelines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether no HTML pipeline has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn build_html(
        &self,
        key: &CacheKey,
        plugins: &[ExtensionSpec],
        html_options: &Value,
    ) -> Result<Pipeline, PipelineError> {
        let emitter = HtmlEmitter::from_value(html_options)?;
        let mut builder = Pipeline::builder();

        for spec in plugins {
            let id = spec.id();
            match self.registry.load(id, &spec.options) {
                Ok(transform) => builder = builder.with_boxed_transform(transform),
                Err(e) => {
                    tracing::warn!(extension = %id, error = %e, "Could not load extension");
                    builder.push_warning(format!("Could not load extension '{id}': {e}"));
                }
            }
        }

        let pipeline = builder.build(emitter);
        self.builds.fetch_add(1, Ordering::Relaxed);
        tracing::info!(
            key = %key,
            stages = pipeline.stage_names().count(),
            skipped = pipeline.warnings().len(),
            "Built HTML pipeline"
        );
        Ok(pipeline)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, Arc<Pipeline>>> {
        self.html.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, Arc<Pipeline>>> {
        self.html.write().unwrap_or_else(PoisonError::into_inner)
    }
}
