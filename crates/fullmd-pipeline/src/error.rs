//! Pipeline error types.

/// Error raised by a [`Transform`](crate::Transform) while rewriting events.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct TransformError(String);

impl TransformError {
    /// Create a transform error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Error produced while building or running a [`Pipeline`](crate::Pipeline).
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A transform stage failed while processing content.
    #[error("Transform '{stage}' failed: {source}")]
    Transform {
        /// Name of the failing stage.
        stage: String,
        /// Underlying transform error.
        #[source]
        source: TransformError,
    },
    /// Emitter options could not be deserialized.
    #[error("Invalid HTML options: {0}")]
    InvalidOptions(#[from] serde_json::Error),
}
