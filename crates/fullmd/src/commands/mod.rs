//! CLI command implementations.

mod render;
mod resolve;

use std::path::Path;
use std::sync::Arc;

use fullmd_config::Config;
use fullmd_tag::{LoaderContext, PipelineCache, TagDefinition};

pub(crate) use render::RenderArgs;
pub(crate) use resolve::ResolveArgs;

/// Create the configured tag for a loader context.
fn configured_tag(config: &Config, base_dir: &Path, cache: &Arc<PipelineCache>) -> TagDefinition {
    TagDefinition::markdown(&LoaderContext::new(base_dir), Arc::clone(cache))
        .with_name(config.tag.name.clone())
}
