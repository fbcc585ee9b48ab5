//! Attributes for links that leave the site.

use std::fmt::{self, Write};

use fullmd_pipeline::pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use fullmd_pipeline::{ExtensionError, Transform, TransformError, parse_options};
use pulldown_cmark_escape::{escape_href, escape_html};
use serde::Deserialize;
use serde_json::Value;

/// Options for [`ExternalLinks`].
///
/// Set a field to `null` to omit the attribute.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExternalLinksOptions {
    /// Value of the `target` attribute.
    pub target: Option<String>,
    /// Value of the `rel` attribute.
    pub rel: Option<String>,
}

impl Default for ExternalLinksOptions {
    fn default() -> Self {
        Self {
            target: Some("_blank".to_owned()),
            rel: Some("nofollow noopener noreferrer".to_owned()),
        }
    }
}

/// Renders absolute `http(s)` and protocol-relative links with `target` and
/// `rel` attributes. Relative links pass through unchanged.
#[derive(Debug, Default)]
pub struct ExternalLinks {
    options: ExternalLinksOptions,
}

impl ExternalLinks {
    /// Create the extension.
    #[must_use]
    pub fn new(options: ExternalLinksOptions) -> Self {
        Self { options }
    }

    /// Opening anchor, escaped the same way `push_html` escapes links.
    fn open_tag(&self, url: &str, title: &str) -> Result<String, fmt::Error> {
        let mut tag = String::from(r#"<a href=""#);
        escape_href(&mut tag, url)?;
        tag.push('"');
        if !title.is_empty() {
            push_attr(&mut tag, "title", title)?;
        }
        if let Some(target) = &self.options.target {
            push_attr(&mut tag, "target", target)?;
        }
        if let Some(rel) = &self.options.rel {
            push_attr(&mut tag, "rel", rel)?;
        }
        tag.push('>');
        Ok(tag)
    }
}

impl Transform for ExternalLinks {
    fn name(&self) -> &str {
        crate::EXTERNAL_LINKS
    }

    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, TransformError> {
        let mut out = Vec::with_capacity(events.len());
        // One entry per open link: whether it was rewritten.
        let mut link_stack: Vec<bool> = Vec::new();

        for event in events {
            match event {
                Event::Start(Tag::Link {
                    ref dest_url,
                    ref title,
                    ..
                }) if is_external(dest_url) => {
                    let tag = self
                        .open_tag(dest_url, title)
                        .map_err(|e| TransformError::new(e.to_string()))?;
                    link_stack.push(true);
                    out.push(Event::InlineHtml(CowStr::from(tag)));
                }
                Event::Start(Tag::Link { .. }) => {
                    link_stack.push(false);
                    out.push(event);
                }
                Event::End(TagEnd::Link) => {
                    if link_stack.pop() == Some(true) {
                        out.push(Event::InlineHtml(CowStr::Borrowed("</a>")));
                    } else {
                        out.push(event);
                    }
                }
                other => out.push(other),
            }
        }

        Ok(out)
    }
}

fn push_attr(tag: &mut String, name: &str, value: &str) -> fmt::Result {
    write!(tag, r#" {name}=""#)?;
    escape_html(&mut *tag, value)?;
    tag.push('"');
    Ok(())
}

fn is_external(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

pub(crate) fn create(options: &Value) -> Result<Box<dyn Transform>, ExtensionError> {
    let options = parse_options(crate::EXTERNAL_LINKS, options)?;
    Ok(Box::new(ExternalLinks::new(options)))
}
