//! Stage traits.

use pulldown_cmark::{Event, Options};

use crate::TransformError;

/// A stage that rewrites the parsed event stream.
///
/// Transforms run in the order they were added to the pipeline, after parsing
/// and before emission. A transform can also request parser features through
/// [`parser_options`](Self::parser_options); the pipeline parses with the union
/// of all requested options.
pub trait Transform: Send + Sync {
    /// Stage name, used in warnings and errors.
    fn name(&self) -> &str;

    /// Parser options this transform needs.
    fn parser_options(&self) -> Options {
        Options::empty()
    }

    /// Rewrite the event stream.
    fn transform<'a>(&self, events: Vec<Event<'a>>) -> Result<Vec<Event<'a>>, TransformError>;
}

/// Final stage that serializes events into the pipeline output.
pub trait Emitter: Send + Sync {
    /// Filter the parsed source before any transform sees it.
    ///
    /// Only author input passes through here; events produced by transforms
    /// reach [`emit`](Self::emit) unfiltered.
    fn filter_source<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        events
    }

    /// Serialize events to a string.
    fn emit(&self, events: Vec<Event<'_>>) -> String;
}
