//! Typographic punctuation.

use fullmd_pipeline::pulldown_cmark::{Event, Options};
use fullmd_pipeline::{ExtensionError, Transform, TransformError};
use serde_json::Value;

/// Turns straight quotes into curly quotes, `--`/`---` into dashes and `...`
/// into an ellipsis. Takes no options.
#[derive(Debug, Default, Clone, Copy)]
pub struct SmartyPants;

impl Transform for SmartyPants {
    fn name(&self) -> &str {
        crate::SMARTYPANTS
    }

    fn parser_options(&self) -> Options {
        Options::ENABLE_SMART_PUNCTUATION
    }

    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, TransformError> {
        Ok(events)
    }
}

pub(crate) fn create(_options: &Value) -> Result<Box<dyn Transform>, ExtensionError> {
    Ok(Box::new(SmartyPants))
}

#[cfg(test)]
mod tests {
    use fullmd_pipeline::{HtmlEmitter, Pipeline};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_smart_punctuation() {
        let html = Pipeline::builder()
            .with_transform(SmartyPants)
            .build(HtmlEmitter::default())
            .process("\"quoted\" -- wait...")
            .unwrap();
        assert_eq!(html, "<p>\u{201c}quoted\u{201d} \u{2013} wait\u{2026}</p>\n");
    }
}
