//! Tag error types.

use std::path::PathBuf;

use fullmd_pipeline::PipelineError;

/// Error reading a referenced markdown file.
///
/// Missing files and over-long paths are not errors; the resolver falls back
/// to literal text for those.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The file exists but could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Resolved path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Error resolving a tagged value.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// Content source could not be read.
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    /// Pipeline construction or processing failed.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    /// A pipeline task panicked or was aborted.
    #[error("Conversion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    /// The tag was applied to a sequence or mapping.
    #[error("Tag {tag} expects a scalar value, found a {found}")]
    NotScalar {
        /// Tag name.
        tag: String,
        /// Kind of node found instead.
        found: &'static str,
    },
    /// The conversion could not be turned into a document value.
    #[error("Failed to serialize conversion: {0}")]
    Serialize(#[from] serde_yaml::Error),
}
