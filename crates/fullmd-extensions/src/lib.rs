//! Built-in extensions for fullmd pipelines.
//!
//! Each extension is an [`ExtensionFactory`](fullmd_pipeline::ExtensionFactory)
//! registered under a fixed identifier:
//!
//! | Identifier | Effect |
//! |------------|--------|
//! | `gfm` | GitHub Flavored Markdown parsing (tables, strikethrough, task lists, footnotes) |
//! | `smartypants` | Typographic quotes, dashes and ellipses |
//! | `heading-slugs` | Unique `id` attributes on headings |
//! | `external-links` | `target`/`rel` attributes on absolute links |
//!
//! # Example
//!
//! ```
//! use fullmd_extensions::builtin_registry;
//! use fullmd_pipeline::{HtmlEmitter, Pipeline};
//! use serde_json::Value;
//!
//! let registry = builtin_registry();
//! let slugs = registry.load("heading-slugs", &Value::Null).unwrap();
//! let pipeline = Pipeline::builder()
//!     .with_boxed_transform(slugs)
//!     .build(HtmlEmitter::default());
//! assert_eq!(pipeline.process("# Hello World").unwrap(), "<h1 id=\"hello-world\">Hello World</h1>\n");
//! ```

mod external_links;
mod gfm;
mod slugs;
mod smartypants;

use fullmd_pipeline::ExtensionRegistry;

pub use external_links::{ExternalLinks, ExternalLinksOptions};
pub use gfm::{Gfm, GfmOptions};
pub use slugs::{HeadingSlugs, HeadingSlugsOptions, slugify};
pub use smartypants::SmartyPants;

/// Identifier of the [`Gfm`] extension.
pub const GFM: &str = "gfm";
/// Identifier of the [`SmartyPants`] extension.
pub const SMARTYPANTS: &str = "smartypants";
/// Identifier of the [`HeadingSlugs`] extension.
pub const HEADING_SLUGS: &str = "heading-slugs";
/// Identifier of the [`ExternalLinks`] extension.
pub const EXTERNAL_LINKS: &str = "external-links";

/// Register every built-in extension in an existing registry.
pub fn register_builtins(registry: &mut ExtensionRegistry) {
    registry.register(GFM, gfm::create);
    registry.register(SMARTYPANTS, smartypants::create);
    registry.register(HEADING_SLUGS, slugs::create);
    registry.register(EXTERNAL_LINKS, external_links::create);
}

/// Create a registry holding every built-in extension.
#[must_use]
pub fn builtin_registry() -> ExtensionRegistry {
    let mut registry = ExtensionRegistry::new();
    register_builtins(&mut registry);
    registry
}
