//! Content source resolution: inline markdown or a file reference.

use std::borrow::Cow;
use std::io;
use std::path::{Path, PathBuf};

use crate::ResolveError;

/// Type alias for the file reading callback function.
pub type ReadFileFn = dyn Fn(&Path) -> io::Result<String> + Send + Sync;

/// Resolves a raw scalar to the markdown text to render.
///
/// A scalar containing a line break is always literal markdown. Any other
/// non-blank scalar is first tried as a path relative to the base directory:
/// if the file exists its contents replace the scalar, if it does not exist
/// (or the name is too long to be a path) the scalar is used as literal
/// markdown, and any other read failure is an error.
///
/// A single-line scalar that happens to name an existing file is always read
/// from that file; there is no way to force the literal interpretation.
pub struct ContentResolver {
    base_dir: PathBuf,
    /// Callback to read files; `tokio::fs::read_to_string` when `None`.
    read_file: Option<Box<ReadFileFn>>,
}

impl ContentResolver {
    /// Create a resolver reading files relative to `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            read_file: None,
        }
    }

    /// Set the file reading callback.
    #[must_use]
    pub fn with_read_file<F>(mut self, read_file: F) -> Self
    where
        F: Fn(&Path) -> io::Result<String> + Send + Sync + 'static,
    {
        self.read_file = Some(Box::new(read_file));
        self
    }

    /// Directory that relative references are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Produce the markdown text for a raw scalar.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Io`] if the referenced file exists but cannot be
    /// read (permission denied, is a directory, invalid UTF-8, ...).
    pub async fn resolve<'a>(&self, raw: &'a str) -> Result<Cow<'a, str>, ResolveError> {
        if !is_candidate_path(raw) {
            return Ok(Cow::Borrowed(raw));
        }

        let path = self.base_dir.join(raw);
        match self.read(&path).await {
            Ok(content) => {
                tracing::debug!(path = %path.display(), "Loaded markdown from file");
                Ok(Cow::Owned(content))
            }
            Err(e) if is_missing_reference(&e) => Ok(Cow::Borrowed(raw)),
            Err(source) => Err(ResolveError::Io { path, source }),
        }
    }

    async fn read(&self, path: &Path) -> io::Result<String> {
        match &self.read_file {
            Some(read_file) => read_file(path),
            None => tokio::fs::read_to_string(path).await,
        }
    }
}

/// Whether a raw scalar should be tried as a file path.
///
/// Scalars with a line break are literal markdown. Blank scalars are literal
/// too, since joining them to the base directory would name the directory.
#[must_use]
pub fn is_candidate_path(raw: &str) -> bool {
    !raw.contains(['\n', '\r']) && !raw.trim().is_empty()
}

/// Read failures meaning "this is not a file reference": the file does not
/// exist, or the name is too long to be a path.
fn is_missing_reference(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::InvalidFilename
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;

    fn counting_resolver(dir: &Path) -> (ContentResolver, Arc<AtomicUsize>) {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let resolver = ContentResolver::new(dir).with_read_file(move |path| {
            counter.fetch_add(1, Ordering::SeqCst);
            std::fs::read_to_string(path)
        });
        (resolver, reads)
    }

    #[test]
    fn test_is_candidate_path() {
        assert!(is_candidate_path("README.md"));
        assert!(is_candidate_path("**bold**"));
        assert!(!is_candidate_path("line1\nline2"));
        assert!(!is_candidate_path("line1\rline2"));
        assert!(!is_candidate_path(""));
        assert!(!is_candidate_path("   "));
    }

    #[tokio::test]
    async fn test_multi_line_never_reads() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, reads) = counting_resolver(dir.path());

        let text = resolver.resolve("line1\nline2").await.unwrap();
        assert_eq!(text, "line1\nline2");

        let text = resolver.resolve("# Title\r\nbody").await.unwrap();
        assert_eq!(text, "# Title\r\nbody");

        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_multi_line_matching_file_name_still_literal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a\nb"), "file contents").unwrap();
        let (resolver, reads) = counting_resolver(dir.path());

        assert_eq!(resolver.resolve("a\nb").await.unwrap(), "a\nb");
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_literal() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, reads) = counting_resolver(dir.path());

        let text = resolver.resolve("**bold**").await.unwrap();
        assert_eq!(text, "**bold**");
        assert!(matches!(text, Cow::Borrowed(_)));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_existing_file_replaces_raw_text() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docs")).unwrap();
        std::fs::write(dir.path().join("docs/intro.md"), "# Title\n\nBody").unwrap();

        let resolver = ContentResolver::new(dir.path());
        let text = resolver.resolve("docs/intro.md").await.unwrap();
        assert_eq!(text, "# Title\n\nBody");
    }

    #[tokio::test]
    async fn test_absolute_path_ignores_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("abs.md");
        std::fs::write(&file, "absolute").unwrap();

        let resolver = ContentResolver::new("/nonexistent-base");
        let raw = file.to_str().unwrap();
        assert_eq!(resolver.resolve(raw).await.unwrap(), "absolute");
    }

    #[tokio::test]
    async fn test_name_too_long_falls_back_to_literal() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ContentResolver::new(dir.path());

        let raw = "x".repeat(300);
        assert_eq!(resolver.resolve(&raw).await.unwrap(), raw);
    }

    #[tokio::test]
    async fn test_nul_byte_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let resolver = ContentResolver::new(dir.path());

        let err = resolver.resolve("a\0b").await.unwrap_err();
        let ResolveError::Io { path, source } = err;
        assert_eq!(path, dir.path().join("a\0b"));
        assert_eq!(source.kind(), io::ErrorKind::InvalidInput);
    }

    #[tokio::test]
    async fn test_directory_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        let resolver = ContentResolver::new(dir.path());

        let err = resolver.resolve("sub").await.unwrap_err();
        let ResolveError::Io { path, .. } = err;
        assert_eq!(path, dir.path().join("sub"));
    }

    #[tokio::test]
    async fn test_permission_denied_is_fatal() {
        let resolver = ContentResolver::new("/base").with_read_file(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        });

        let err = resolver.resolve("secret.md").await.unwrap_err();
        assert!(err.to_string().contains("secret.md"));
        let ResolveError::Io { source, .. } = err;
        assert_eq!(source.kind(), io::ErrorKind::PermissionDenied);
    }

    #[tokio::test]
    async fn test_blank_scalar_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        let (resolver, reads) = counting_resolver(dir.path());

        assert_eq!(resolver.resolve("").await.unwrap(), "");
        assert_eq!(reads.load(Ordering::SeqCst), 0);
    }
}
