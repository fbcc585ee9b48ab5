//! Pipeline assembly and execution.

use pulldown_cmark::{Options, Parser};

use crate::{Emitter, PipelineError, Transform};

/// A reusable markdown transform pipeline.
///
/// Built once with [`PipelineBuilder`] and then run any number of times with
/// [`process`](Self::process). A pipeline holds no per-run state, so one
/// instance can be shared between threads.
pub struct Pipeline {
    options: Options,
    transforms: Vec<Box<dyn Transform>>,
    emitter: Box<dyn Emitter>,
    warnings: Vec<String>,
}

impl Pipeline {
    /// Start building a pipeline seeded with the markdown parse stage.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Parser options used by the parse stage.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        self.options
    }

    /// Names of the transform stages, in application order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.transforms.iter().map(|t| t.name())
    }

    /// Warnings recorded while the pipeline was assembled.
    ///
    /// Contains one entry per extension that could not be loaded and was
    /// left out of the pipeline.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Run markdown through every stage and return the emitted output.
    ///
    /// The emitter's source filter runs right after parsing, then every
    /// transform in order, then the emitter.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Transform`] if any transform fails.
    pub fn process(&self, markdown: &str) -> Result<String, PipelineError> {
        let parsed: Vec<_> = Parser::new_ext(markdown, self.options).collect();
        let mut events = self.emitter.filter_source(parsed);

        for transform in &self.transforms {
            events = transform
                .transform(events)
                .map_err(|source| PipelineError::Transform {
                    stage: transform.name().to_owned(),
                    source,
                })?;
        }

        Ok(self.emitter.emit(events))
    }
}

/// Builder for [`Pipeline`].
///
/// The emission stage is supplied last through [`build`](Self::build), so it
/// always runs after every transform.
pub struct PipelineBuilder {
    options: Options,
    transforms: Vec<Box<dyn Transform>>,
    warnings: Vec<String>,
}

impl Default for PipelineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineBuilder {
    /// Create a builder that parses plain `CommonMark`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Options::empty(),
            transforms: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Add parser options on top of the ones requested by transforms.
    #[must_use]
    pub fn with_parser_options(mut self, options: Options) -> Self {
        self.options |= options;
        self
    }

    /// Append a transform stage.
    #[must_use]
    pub fn with_transform<T: Transform + 'static>(self, transform: T) -> Self {
        self.with_boxed_transform(Box::new(transform))
    }

    /// Append an already boxed transform stage.
    #[must_use]
    pub fn with_boxed_transform(mut self, transform: Box<dyn Transform>) -> Self {
        self.transforms.push(transform);
        self
    }

    /// Record a warning produced while assembling the pipeline.
    pub fn push_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Finish the pipeline with its emission stage.
    #[must_use]
    pub fn build<E: Emitter + 'static>(self, emitter: E) -> Pipeline {
        let options = self
            .transforms
            .iter()
            .fold(self.options, |acc, t| acc | t.parser_options());

        Pipeline {
            options,
            transforms: self.transforms,
            emitter: Box::new(emitter),
            warnings: self.warnings,
        }
    }
}
