//! HTML emission stage.

use pulldown_cmark::{CowStr, Event, Tag, TagEnd, html};
use serde::Deserialize;
use serde_json::Value;

use crate::{Emitter, PipelineError};

/// URL schemes removed from link and image targets when sanitizing.
const UNSAFE_SCHEMES: [&str; 3] = ["javascript:", "vbscript:", "data:"];

/// Options for the HTML emission stage.
///
/// Deserialized from the opaque HTML options object of the tag configuration.
/// Unknown keys are ignored.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HtmlOptions {
    /// Drop raw HTML written in the source and neutralise script-capable
    /// URLs. On by default; set to `false` to pass raw HTML through.
    pub sanitize: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self { sanitize: true }
    }
}

impl HtmlOptions {
    /// Parse options from an untyped configuration value.
    ///
    /// `null` yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidOptions`] if the value has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, PipelineError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(Self::deserialize(value)?)
    }
}

/// Emits HTML using `pulldown-cmark`'s HTML writer.
#[derive(Debug, Default)]
pub struct HtmlEmitter {
    options: HtmlOptions,
}

impl HtmlEmitter {
    /// Create an emitter with the given options.
    #[must_use]
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    /// Create an emitter from an untyped configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InvalidOptions`] if the value has the wrong shape.
    pub fn from_value(value: &Value) -> Result<Self, PipelineError> {
        HtmlOptions::from_value(value).map(Self::new)
    }

    /// Options this emitter was built with.
    #[must_use]
    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }
}

impl Emitter for HtmlEmitter {
    fn filter_source<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        if self.options.sanitize {
            events.into_iter().filter_map(sanitize).collect()
        } else {
            events
        }
    }

    fn emit(&self, events: Vec<Event<'_>>) -> String {
        let mut out = String::with_capacity(events.len() * 16);
        html::push_html(&mut out, events.into_iter());
        out
    }
}

fn sanitize(event: Event<'_>) -> Option<Event<'_>> {
    match event {
        Event::Html(_)
        | Event::InlineHtml(_)
        | Event::Start(Tag::HtmlBlock)
        | Event::End(TagEnd::HtmlBlock) => None,
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Link {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Some(Event::Start(Tag::Image {
            link_type,
            dest_url: safe_url(dest_url),
            title,
            id,
        })),
        other => Some(other),
    }
}

fn safe_url(url: CowStr<'_>) -> CowStr<'_> {
    let lower = url.trim_start().to_ascii_lowercase();
    if UNSAFE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        CowStr::Borrowed("")
    } else {
        url
    }
}
