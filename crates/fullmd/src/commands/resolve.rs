//! `fullmd resolve` command implementation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Args;
use fullmd_config::Config;
use fullmd_tag::{LoaderContext, PipelineCache};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the resolve command.
#[derive(Args)]
pub(crate) struct ResolveArgs {
    /// YAML document to resolve.
    file: PathBuf,

    /// Path to configuration file (fullmd.toml).
    #[arg(short, long, env = "FULLMD_CONFIG")]
    config: Option<PathBuf>,

    /// Print YAML instead of JSON.
    #[arg(long)]
    yaml: bool,
}

impl ResolveArgs {
    /// Execute the resolve command.
    ///
    /// File references inside the document are resolved relative to the
    /// document's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or parsed, or if any
    /// tagged value fails to convert.
    pub(crate) async fn execute(self, verbose: bool) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref())?;

        let content = tokio::fs::read_to_string(&self.file)
            .await
            .map_err(|source| CliError::Read {
                path: self.file.clone(),
                source,
            })?;
        let document: serde_yaml::Value = serde_yaml::from_str(&content)?;

        let cache = Arc::new(PipelineCache::default());
        let base_dir = document_dir(&self.file);
        let tag = super::configured_tag(&config, &base_dir, &cache);
        let resolved = tag.resolve_document(document, &config.options).await?;

        if verbose {
            output.info(&format!("Pipelines built: {}", cache.build_count()));
        }
        let text = if self.yaml {
            serde_yaml::to_string(&resolved)?
        } else {
            serde_json::to_string_pretty(&resolved)?
        };
        output.result(&text);
        Ok(())
    }
}

/// Base directory for references in a document file.
fn document_dir(file: &Path) -> PathBuf {
    LoaderContext::for_document(file).base_dir().to_path_buf()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_document_dir() {
        assert_eq!(
            document_dir(Path::new("content/team.yaml")),
            PathBuf::from("content")
        );
        assert_eq!(document_dir(Path::new("team.yaml")), PathBuf::from(""));
    }
}
