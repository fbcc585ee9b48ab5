//! Markdown transform pipelines with pluggable extension stages.
//!
//! A [`Pipeline`] is an ordered sequence of stages:
//!
//! 1. **Parse**: `pulldown-cmark` turns markdown into an event stream. Each
//!    transform may widen the parser options (tables, footnotes, ...).
//! 2. **Transform**: every [`Transform`] rewrites the event stream in order.
//! 3. **Emit**: a single [`Emitter`] serializes the final events.
//!
//! Two emitters are provided:
//! - [`HtmlEmitter`]: rendered HTML, configured with [`HtmlOptions`]
//! - [`PlainTextEmitter`]: plain text, normally preceded by [`StripMarkdown`]
//!
//! Extension transforms are created by name through an [`ExtensionRegistry`]
//! of [`ExtensionFactory`] implementations.
//!
//! # Example
//!
//! ```
//! use fullmd_pipeline::{HtmlEmitter, Pipeline, plain_text_pipeline};
//!
//! let html = Pipeline::builder().build(HtmlEmitter::default());
//! assert_eq!(html.process("**bold**").unwrap(), "<p><strong>bold</strong></p>\n");
//!
//! let plain = plain_text_pipeline();
//! assert_eq!(plain.process("**bold**").unwrap(), "bold");
//! ```

mod error;
mod extension;
mod html;
mod pipeline;
mod strip;
mod text;
mod transform;

pub use error::{PipelineError, TransformError};
pub use extension::{ExtensionError, ExtensionFactory, ExtensionRegistry, parse_options};
pub use html::{HtmlEmitter, HtmlOptions};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use strip::StripMarkdown;
pub use text::PlainTextEmitter;
pub use transform::{Emitter, Transform};

/// Re-exported so extension crates share the exact parser types.
pub use pulldown_cmark;

/// Build the markdown to plain-text pipeline.
///
/// Always parse, [`StripMarkdown`], [`PlainTextEmitter`] with plain
/// `CommonMark` parser options; it takes no extensions.
#[must_use]
pub fn plain_text_pipeline() -> Pipeline {
    Pipeline::builder()
        .with_transform(StripMarkdown)
        .build(PlainTextEmitter)
}
