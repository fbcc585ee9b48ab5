//! Plain-text emission stage.

use pulldown_cmark::{Event, Tag, TagEnd};

use crate::Emitter;

/// Serializes events as plain text.
///
/// Each paragraph becomes one block; blocks are separated by a blank line.
/// Soft and hard breaks become newlines. Output has no trailing newline.
/// Formatting events are ignored, so this stage is meant to follow
/// [`StripMarkdown`](crate::StripMarkdown).
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextEmitter;

impl Emitter for PlainTextEmitter {
    fn emit(&self, events: Vec<Event<'_>>) -> String {
        let mut blocks: Vec<String> = Vec::new();
        let mut current = String::new();

        for event in events {
            match event {
                Event::Start(Tag::Paragraph) | Event::End(TagEnd::Paragraph) => {
                    flush(&mut blocks, &mut current);
                }
                Event::Text(text) | Event::Code(text) => current.push_str(&text),
                Event::SoftBreak | Event::HardBreak => current.push('\n'),
                _ => {}
            }
        }
        flush(&mut blocks, &mut current);

        blocks.join("\n\n")
    }
}

fn flush(blocks: &mut Vec<String>, current: &mut String) {
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        blocks.push(trimmed.to_owned());
    }
    current.clear();
}
