//! Markdown scalar tag for structured documents.
//!
//! A value tagged `!markdown` is either inline markdown or a path to a
//! markdown file. Each tagged value resolves to a [`Conversion`] holding the
//! rendered HTML and the stripped plain text.
//!
//! # Architecture
//!
//! - [`ContentResolver`]: decides whether the raw scalar is literal markdown
//!   or a file reference and produces the markdown text
//! - [`PipelineCache`]: builds HTML pipelines once per extension sequence and
//!   owns the shared plain-text pipeline
//! - [`TagDefinition`]: the tag itself; runs both pipelines concurrently and
//!   can rewrite every tagged value of a parsed YAML document
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use fullmd_config::TagOptions;
//! use fullmd_tag::{LoaderContext, PipelineCache, TagDefinition};
//!
//! # async fn run() -> Result<(), fullmd_tag::TagError> {
//! let cache = Arc::new(PipelineCache::default());
//! let tag = TagDefinition::markdown(&LoaderContext::new("content"), cache);
//!
//! let result = tag.construct("**bold**", &TagOptions::default()).await?;
//! assert_eq!(result.plain, "bold");
//! # Ok(())
//! # }
//! ```

mod cache;
mod error;
mod resolver;
mod tag;

pub use cache::{CacheKey, KEY_SEPARATOR, PipelineCache};
pub use error::{ResolveError, TagError};
pub use resolver::{ContentResolver, ReadFileFn, is_candidate_path};
pub use tag::{Conversion, LoaderContext, TagDefinition, TagKind};
