//! Markdown formatting removal.

use pulldown_cmark::{Event, Tag, TagEnd};

use crate::{Transform, TransformError};

/// Removes markdown formatting, leaving only paragraphs of text.
///
/// - Headings, list items and definition list entries become paragraphs
/// - Emphasis, strong, strikethrough, links, block quotes and lists keep
///   their children
/// - Images are replaced by their alt text, inline code by its text
/// - Code blocks, tables, raw HTML, rules, metadata blocks, footnotes and
///   task list markers are removed
#[derive(Debug, Default, Clone, Copy)]
pub struct StripMarkdown;

impl Transform for StripMarkdown {
    fn name(&self) -> &str {
        "strip-markdown"
    }

    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, TransformError> {
        let mut out = Vec::with_capacity(events.len());
        // Nesting depth inside a removed block; zero when not skipping.
        let mut skip_depth = 0usize;

        for event in events {
            if skip_depth > 0 {
                match event {
                    Event::Start(_) => skip_depth += 1,
                    Event::End(_) => skip_depth -= 1,
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(tag) => match tag {
                    Tag::Paragraph
                    | Tag::Heading { .. }
                    | Tag::Item
                    | Tag::DefinitionListTitle
                    | Tag::DefinitionListDefinition => out.push(Event::Start(Tag::Paragraph)),
                    Tag::CodeBlock(_)
                    | Tag::HtmlBlock
                    | Tag::Table(_)
                    | Tag::MetadataBlock(_)
                    | Tag::FootnoteDefinition(_) => skip_depth = 1,
                    _ => {}
                },
                Event::End(tag) => match tag {
                    TagEnd::Paragraph
                    | TagEnd::Heading(_)
                    | TagEnd::Item
                    | TagEnd::DefinitionListTitle
                    | TagEnd::DefinitionListDefinition => out.push(Event::End(TagEnd::Paragraph)),
                    _ => {}
                },
                Event::Text(text)
                | Event::Code(text)
                | Event::InlineMath(text)
                | Event::DisplayMath(text) => out.push(Event::Text(text)),
                Event::SoftBreak => out.push(Event::SoftBreak),
                Event::HardBreak => out.push(Event::HardBreak),
                Event::Html(_)
                | Event::InlineHtml(_)
                | Event::Rule
                | Event::TaskListMarker(_)
                | Event::FootnoteReference(_) => {}
            }
        }

        Ok(out)
    }
}
