//! GitHub Flavored Markdown parsing.

use fullmd_pipeline::pulldown_cmark::{Event, Options};
use fullmd_pipeline::{ExtensionError, Transform, TransformError, parse_options};
use serde::Deserialize;
use serde_json::Value;

/// Which GFM features to enable. All default to `true`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct GfmOptions {
    /// Pipe tables.
    pub tables: bool,
    /// `~~strikethrough~~`.
    pub strikethrough: bool,
    /// `- [ ] task` list items.
    pub tasklists: bool,
    /// `[^note]` footnotes.
    pub footnotes: bool,
}

impl Default for GfmOptions {
    fn default() -> Self {
        Self {
            tables: true,
            strikethrough: true,
            tasklists: true,
            footnotes: true,
        }
    }
}

/// Enables GFM parser features; leaves the event stream untouched.
#[derive(Debug, Default)]
pub struct Gfm {
    options: GfmOptions,
}

impl Gfm {
    /// Create the extension with the given features.
    #[must_use]
    pub fn new(options: GfmOptions) -> Self {
        Self { options }
    }
}

impl Transform for Gfm {
    fn name(&self) -> &str {
        crate::GFM
    }

    fn parser_options(&self) -> Options {
        let mut options = Options::ENABLE_GFM;
        if self.options.tables {
            options |= Options::ENABLE_TABLES;
        }
        if self.options.strikethrough {
            options |= Options::ENABLE_STRIKETHROUGH;
        }
        if self.options.tasklists {
            options |= Options::ENABLE_TASKLISTS;
        }
        if self.options.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }
        options
    }

    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, TransformError> {
        Ok(events)
    }
}

pub(crate) fn create(options: &Value) -> Result<Box<dyn Transform>, ExtensionError> {
    let options = parse_options(crate::GFM, options)?;
    Ok(Box::new(Gfm::new(options)))
}

#[cfg(test)]
mod tests {
    use fullmd_pipeline::{HtmlEmitter, Pipeline};
    use serde_json::json;

    use super::*;

    fn render(markdown: &str, options: &Value) -> String {
        Pipeline::builder()
            .with_boxed_transform(create(options).unwrap())
            .build(HtmlEmitter::default())
            .process(markdown)
            .unwrap()
    }

    #[test]
    fn test_tables_enabled_by_default() {
        let html = render("| a |\n|---|\n| b |", &Value::Null);
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_strikethrough() {
        let html = render("~~gone~~", &Value::Null);
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_tasklist() {
        let html = render("- [x] done", &Value::Null);
        assert!(html.contains("checkbox"));
    }

    #[test]
    fn test_tables_can_be_disabled() {
        let html = render("| a |\n|---|\n| b |", &json!({"tables": false}));
        assert!(!html.contains("<table>"));
    }

    #[test]
    fn test_invalid_options() {
        let result = create(&json!({"tables": "sometimes"}));
        assert!(matches!(result, Err(ExtensionError::InvalidOptions { .. })));
    }
}
