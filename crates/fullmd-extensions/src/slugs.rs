//! Heading anchors.

use std::collections::HashSet;

use fullmd_pipeline::pulldown_cmark::{CowStr, Event, Tag, TagEnd};
use fullmd_pipeline::{ExtensionError, Transform, TransformError, parse_options};
use serde::Deserialize;
use serde_json::Value;

/// Slug used when a heading has no alphanumeric text.
const FALLBACK_SLUG: &str = "heading";

/// Options for [`HeadingSlugs`].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeadingSlugsOptions {
    /// Prepended to every generated id.
    pub prefix: String,
}

/// Adds a unique `id` attribute to every heading.
///
/// Ids are slugs of the heading text; a slug already in use gets the first
/// free `-1`, `-2`, ... suffix. Headings that already carry an id keep it,
/// and generated ids never repeat one of those.
#[derive(Debug, Default)]
pub struct HeadingSlugs {
    options: HeadingSlugsOptions,
}

impl HeadingSlugs {
    /// Create the extension.
    #[must_use]
    pub fn new(options: HeadingSlugsOptions) -> Self {
        Self { options }
    }
}

impl Transform for HeadingSlugs {
    fn name(&self) -> &str {
        crate::HEADING_SLUGS
    }

    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, TransformError> {
        let mut out: Vec<Event<'a>> = Vec::with_capacity(events.len());
        // Explicit ids are reserved up front, wherever they appear.
        let mut used: HashSet<String> = events
            .iter()
            .filter_map(|event| match event {
                Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
                _ => None,
            })
            .collect();
        // Index in `out` of the heading start currently being collected.
        let mut open_heading: Option<usize> = None;
        let mut text = String::new();

        for event in events {
            match &event {
                Event::Start(Tag::Heading { .. }) => {
                    open_heading = Some(out.len());
                    text.clear();
                }
                Event::Text(t) | Event::Code(t) if open_heading.is_some() => text.push_str(t),
                Event::End(TagEnd::Heading(_)) => {
                    if let Some(index) = open_heading.take()
                        && let Some(Event::Start(Tag::Heading { id, .. })) = out.get_mut(index)
                        && id.is_none()
                    {
                        *id = Some(CowStr::from(unique_id(
                            &mut used,
                            &self.options.prefix,
                            &text,
                        )));
                    }
                }
                _ => {}
            }
            out.push(event);
        }

        Ok(out)
    }
}

/// Generate an id not yet in `used` and record it.
fn unique_id(used: &mut HashSet<String>, prefix: &str, text: &str) -> String {
    let mut slug = slugify(text);
    if slug.is_empty() {
        FALLBACK_SLUG.clone_into(&mut slug);
    }
    let base_id = format!("{prefix}{slug}");
    let mut id = base_id.clone();
    let mut suffix = 0usize;
    while used.contains(&id) {
        suffix += 1;
        id = format!("{base_id}-{suffix}");
    }
    used.insert(id.clone());
    id
}

/// Convert text to URL-safe slug.
///
/// Converts to lowercase, replaces whitespace/dashes/underscores with single dashes,
/// and removes other non-alphanumeric characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

pub(crate) fn create(options: &Value) -> Result<Box<dyn Transform>, ExtensionError> {
    let options = parse_options(crate::HEADING_SLUGS, options)?;
    Ok(Box::new(HeadingSlugs::new(options)))
}
