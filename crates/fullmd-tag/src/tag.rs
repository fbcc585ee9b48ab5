//! The markdown tag and per-value conversion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use fullmd_config::{DEFAULT_TAG_NAME, TagOptions};
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use serde_yaml::value::Tag;

use crate::{ContentResolver, PipelineCache, TagError};

/// Kind of YAML node a tag accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TagKind {
    /// Plain scalar (string, number, boolean).
    Scalar,
}

/// Context supplied by the document loader when a tag is created.
#[derive(Clone, Debug)]
pub struct LoaderContext {
    base_dir: PathBuf,
}

impl LoaderContext {
    /// Context resolving file references against `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Context for a document file: references resolve against its directory.
    #[must_use]
    pub fn for_document(path: &Path) -> Self {
        Self::new(path.parent().unwrap_or(Path::new(".")))
    }

    /// Directory file references are resolved against.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Result of converting one tagged value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversion {
    /// Rendered HTML.
    pub html: String,
    /// Markdown with all formatting removed.
    pub plain: String,
}

/// A custom scalar tag that converts markdown into [`Conversion`]s.
///
/// Created once per loader context. Pipelines come from a shared
/// [`PipelineCache`], so many tag instances can reuse the same pipelines.
pub struct TagDefinition {
    name: String,
    resolver: ContentResolver,
    cache: Arc<PipelineCache>,
}

impl TagDefinition {
    /// Create the `!markdown` tag for a loader context.
    #[must_use]
    pub fn markdown(context: &LoaderContext, cache: Arc<PipelineCache>) -> Self {
        Self {
            name: DEFAULT_TAG_NAME.to_owned(),
            resolver: ContentResolver::new(context.base_dir()),
            cache,
        }
    }

    /// Use a different tag name (with or without the leading `!`).
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Replace the content resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: ContentResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Tag name, e.g. `!markdown`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node kind this tag accepts.
    #[must_use]
    pub fn kind(&self) -> TagKind {
        TagKind::Scalar
    }

    /// Whether a parsed YAML tag refers to this tag.
    #[must_use]
    pub fn matches(&self, tag: &Tag) -> bool {
        let found = tag.to_string();
        found.trim_start_matches('!') == self.name.trim_start_matches('!')
    }

    /// Convert one raw scalar.
    ///
    /// Resolves the content source, fetches (or builds) the HTML pipeline
    /// for `options.plugins`, and runs the HTML and plain-text pipelines
    /// concurrently on the blocking pool.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::Resolve`] if a referenced file cannot be read,
    /// [`TagError::Pipeline`] if a pipeline fails, and [`TagError::Task`] if a
    /// pipeline task panics.
    pub async fn construct(&self, raw: &str, options: &TagOptions) -> Result<Conversion, TagError> {
        let markdown: Arc<str> = Arc::from(self.resolver.resolve(raw).await?);
        let html_pipeline = self.cache.html_pipeline(&options.plugins, &options.html)?;
        let plain_pipeline = self.cache.plain_pipeline();

        let html_task = {
            let markdown = Arc::clone(&markdown);
            tokio::task::spawn_blocking(move || html_pipeline.process(&markdown))
        };
        let plain_task = tokio::task::spawn_blocking(move || plain_pipeline.process(&markdown));

        let (html, plain) = tokio::try_join!(html_task, plain_task)?;
        Ok(Conversion {
            html: html?,
            plain: plain?,
        })
    }

    /// Replace every value tagged with this tag in a parsed YAML document.
    ///
    /// Each tagged scalar becomes a mapping with `html` and `plain` keys.
    /// Values under other tags are searched as well; mapping keys are not.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::NotScalar`] if the tag is applied to a sequence or
    /// mapping, or any error from [`construct`](Self::construct).
    pub async fn resolve_document(
        &self,
        mut document: Value,
        options: &TagOptions,
    ) -> Result<Value, TagError> {
        let mut targets: Vec<&mut Value> = Vec::new();
        let mut stack: Vec<&mut Value> = vec![&mut document];

        while let Some(value) = stack.pop() {
            if matches!(value, Value::Tagged(tagged) if self.matches(&tagged.tag)) {
                targets.push(value);
                continue;
            }
            match value {
                Value::Sequence(items) => stack.extend(items.iter_mut()),
                Value::Mapping(map) => stack.extend(map.values_mut()),
                Value::Tagged(tagged) => stack.push(&mut tagged.value),
                _ => {}
            }
        }

        tracing::debug!(tag = %self.name, count = targets.len(), "Resolving tagged values");

        for target in targets {
            let raw = match &*target {
                Value::Tagged(tagged) => self.scalar_text(&tagged.value)?,
                _ => continue,
            };
            let conversion = self.construct(&raw, options).await?;
            *target = serde_yaml::to_value(&conversion)?;
        }

        Ok(document)
    }

    fn scalar_text(&self, value: &Value) -> Result<String, TagError> {
        let not_scalar = |found| TagError::NotScalar {
            tag: self.name.clone(),
            found,
        };
        match value {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::Null => Ok(String::new()),
            Value::Sequence(_) => Err(not_scalar("sequence")),
            Value::Mapping(_) => Err(not_scalar("mapping")),
            Value::Tagged(_) => Err(not_scalar("tagged value")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use fullmd_config::ExtensionSpec;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn tag_in(dir: &Path) -> (TagDefinition, Arc<PipelineCache>) {
        let cache = Arc::new(PipelineCache::default());
        let tag = TagDefinition::markdown(&LoaderContext::new(dir), Arc::clone(&cache));
        (tag, cache)
    }

    #[test]
    fn test_tag_definition() {
        let (tag, _) = tag_in(Path::new("."));
        assert_eq!(tag.name(), "!markdown");
        assert_eq!(tag.kind(), TagKind::Scalar);
        assert!(tag.matches(&Tag::new("markdown")));
        assert!(tag.matches(&Tag::new("!markdown")));
        assert!(!tag.matches(&Tag::new("md")));
    }

    #[test]
    fn test_loader_context_for_document() {
        let context = LoaderContext::for_document(Path::new("/site/data/team.yaml"));
        assert_eq!(context.base_dir(), Path::new("/site/data"));
    }

    #[tokio::test]
    async fn test_inline_bold() {
        let dir = tempfile::tempdir().unwrap();
        let (tag, _) = tag_in(dir.path());

        let result = tag.construct("**bold**", &TagOptions::default()).await.unwrap();
        assert!(result.html.contains("<strong>bold</strong>"));
        assert_eq!(result.plain, "bold");
    }

    #[tokio::test]
    async fn test_multi_line_processed_directly() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&reads);
        let resolver = ContentResolver::new("/base").with_read_file(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(io::Error::from(io::ErrorKind::NotFound))
        });
        let (tag, _) = tag_in(Path::new("/base"));
        let tag = tag.with_resolver(resolver);

        let result = tag.construct("line1\nline2", &TagOptions::default()).await.unwrap();
        assert_eq!(reads.load(Ordering::SeqCst), 0);
        assert_eq!(result.html, "<p>line1\nline2</p>\n");
        assert_eq!(result.plain, "line1\nline2");
    }

    #[tokio::test]
    async fn test_file_reference() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("title.md"), "# Title").unwrap();
        let (tag, _) = tag_in(dir.path());

        let result = tag.construct("title.md", &TagOptions::default()).await.unwrap();
        assert!(result.html.contains("<h1>Title</h1>"));
        assert_eq!(result.plain, "Title");
    }

    #[tokio::test]
    async fn test_missing_extension_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let (tag, cache) = tag_in(dir.path());
        let options = TagOptions::default().with_plugin(ExtensionSpec::new("nonexistent-module"));

        let result = tag.construct("*hi*", &options).await.unwrap();
        assert_eq!(result.html, "<p><em>hi</em></p>\n");
        assert_eq!(result.plain, "hi");

        let pipeline = cache.html_pipeline(&options.plugins, &options.html).unwrap();
        assert!(pipeline.warnings()[0].contains("nonexistent-module"));
    }

    #[tokio::test]
    async fn test_repeated_conversions_build_once() {
        let dir = tempfile::tempdir().unwrap();
        let (tag, cache) = tag_in(dir.path());
        let options = TagOptions::default().with_plugin(ExtensionSpec::new("heading-slugs"));

        for _ in 0..3 {
            tag.construct("# Title", &options).await.unwrap();
        }
        tag.construct("# Title", &TagOptions::default()).await.unwrap();
        tag.construct("# Title", &TagOptions::default().with_plugin(ExtensionSpec::new("heading-slugs")))
            .await
            .unwrap();

        assert_eq!(cache.build_count(), 2);
    }

    #[tokio::test]
    async fn test_tags_share_cache() {
        let cache = Arc::new(PipelineCache::default());
        let first = TagDefinition::markdown(&LoaderContext::new("a"), Arc::clone(&cache));
        let second = TagDefinition::markdown(&LoaderContext::new("b"), Arc::clone(&cache));

        first.construct("x\ny", &TagOptions::default()).await.unwrap();
        second.construct("x\ny", &TagOptions::default()).await.unwrap();
        assert_eq!(cache.build_count(), 1);
    }

    #[tokio::test]
    async fn test_extensions_and_html_options() {
        let dir = tempfile::tempdir().unwrap();
        let (tag, _) = tag_in(dir.path());
        let options = TagOptions::default()
            .with_plugin(ExtensionSpec::new("gfm"))
            .with_plugin(ExtensionSpec::new("heading-slugs"))
            .with_html(json!({"sanitize": true}));

        let result = tag
            .construct("# Notes\n\n~~old~~ <b>new</b>\n\n| a |\n|---|\n| b |", &options)
            .await
            .unwrap();
        assert!(result.html.contains(r#"<h1 id="notes">Notes</h1>"#));
        assert!(result.html.contains("<del>old</del>"));
        assert!(result.html.contains("<table>"));
        assert!(!result.html.contains("<b>"));
        assert_eq!(result.plain, "Notes\n\n~~old~~ new\n\n| a |\n|---|\n| b |");
    }

    #[tokio::test]
    async fn test_external_links_with_sanitize() {
        let (tag, _) = tag_in(Path::new("."));
        let options = TagOptions::default()
            .with_plugin(ExtensionSpec::new("external-links"))
            .with_html(json!({"sanitize": true}));

        let result = tag
            .construct("[site](https://example.com)", &options)
            .await
            .unwrap();
        assert_eq!(
            result.html,
            "<p><a href=\"https://example.com\" target=\"_blank\" rel=\"nofollow noopener noreferrer\">site</a></p>\n"
        );
        assert_eq!(result.plain, "site");
    }

    #[tokio::test]
    async fn test_unreadable_file_is_fatal() {
        let resolver = ContentResolver::new("/base").with_read_file(|_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        });
        let (tag, _) = tag_in(Path::new("/base"));
        let tag = tag.with_resolver(resolver);

        let result = tag.construct("locked.md", &TagOptions::default()).await;
        assert!(matches!(result, Err(TagError::Resolve(_))));
    }

    #[tokio::test]
    async fn test_invalid_html_options_are_fatal() {
        let (tag, _) = tag_in(Path::new("."));
        let options = TagOptions::default().with_html(json!({"sanitize": 3}));

        let result = tag.construct("a\nb", &options).await;
        assert!(matches!(result, Err(TagError::Pipeline(_))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_conversions() {
        let cache = Arc::new(PipelineCache::default());
        let tag = Arc::new(TagDefinition::markdown(&LoaderContext::new("."), Arc::clone(&cache)));

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let tag = Arc::clone(&tag);
                tokio::spawn(async move {
                    let options = TagOptions::default().with_plugin(ExtensionSpec::new("gfm"));
                    tag.construct(&format!("item **{i}**\n"), &options).await
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.unwrap().unwrap();
            assert_eq!(result.plain, format!("item {i}"));
        }
        assert_eq!(cache.len(), 1);
        assert!(cache.build_count() >= 1);
    }

    #[tokio::test]
    async fn test_resolve_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bio.md"), "Loves *Rust*.").unwrap();
        let (tag, _) = tag_in(dir.path());

        let yaml = r"
name: Ada
bio: !markdown bio.md
posts:
  - title: First
    body: !markdown |
      # Hello
      World
  - title: Second
    body: !other keep
";
        let document: Value = serde_yaml::from_str(yaml).unwrap();
        let resolved = tag.resolve_document(document, &TagOptions::default()).await.unwrap();

        assert_eq!(resolved["name"], Value::from("Ada"));
        assert_eq!(
            resolved["bio"],
            serde_yaml::to_value(Conversion {
                html: "<p>Loves <em>Rust</em>.</p>\n".to_owned(),
                plain: "Loves Rust.".to_owned(),
            })
            .unwrap()
        );
        assert_eq!(resolved["posts"][0]["body"]["plain"], Value::from("Hello\n\nWorld"));
        assert_eq!(
            resolved["posts"][0]["body"]["html"],
            Value::from("<h1>Hello</h1>\n<p>World</p>\n")
        );
        assert!(matches!(resolved["posts"][1]["body"], Value::Tagged(_)));
    }

    #[tokio::test]
    async fn test_resolve_document_custom_name() {
        let (tag, _) = tag_in(Path::new("."));
        let tag = tag.with_name("!md");

        let document: Value = serde_yaml::from_str("a: !md \"*x*\"\nb: !markdown \"*y*\"").unwrap();
        let resolved = tag.resolve_document(document, &TagOptions::default()).await.unwrap();

        assert_eq!(resolved["a"]["plain"], Value::from("x"));
        assert!(matches!(resolved["b"], Value::Tagged(_)));
    }

    #[tokio::test]
    async fn test_resolve_document_rejects_sequences() {
        let (tag, _) = tag_in(Path::new("."));
        let document: Value = serde_yaml::from_str("a: !markdown [1, 2]").unwrap();

        let result = tag.resolve_document(document, &TagOptions::default()).await;
        assert!(matches!(
            result,
            Err(TagError::NotScalar { found: "sequence", .. })
        ));
    }

    #[tokio::test]
    async fn test_resolve_document_number_scalar() {
        let (tag, _) = tag_in(Path::new("."));
        let document: Value = serde_yaml::from_str("a: !markdown 42").unwrap();

        let resolved = tag.resolve_document(document, &TagOptions::default()).await.unwrap();
        assert_eq!(resolved["a"]["plain"], Value::from("42"));
    }
}
