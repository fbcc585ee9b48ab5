//! `fullmd render` command implementation.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, ValueEnum};
use fullmd_config::Config;
use fullmd_tag::{Conversion, PipelineCache};

use crate::error::CliError;
use crate::output::Output;

/// What to print for a conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Format {
    /// `{ "html": ..., "plain": ... }`.
    #[default]
    Json,
    /// Rendered HTML only.
    Html,
    /// Plain text only.
    Plain,
}

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Inline markdown, or a path to a markdown file.
    value: String,

    /// Directory for resolving relative file paths (default: current directory).
    #[arg(short, long)]
    base_dir: Option<PathBuf>,

    /// Path to configuration file (fullmd.toml).
    #[arg(short, long, env = "FULLMD_CONFIG")]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t)]
    format: Format,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the value cannot be converted.
    pub(crate) async fn execute(self, verbose: bool) -> Result<(), CliError> {
        let output = Output::new();
        let config = Config::load(self.config.as_deref())?;
        let base_dir = self.base_dir.unwrap_or_else(|| PathBuf::from("."));

        let cache = Arc::new(PipelineCache::default());
        let tag = super::configured_tag(&config, &base_dir, &cache);
        let conversion = tag.construct(&self.value, &config.options).await?;

        if verbose {
            output.info(&format!("Pipelines built: {}", cache.build_count()));
        }
        output.result(&format_conversion(conversion, self.format)?);
        Ok(())
    }
}

fn format_conversion(conversion: Conversion, format: Format) -> Result<String, CliError> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(&conversion)?,
        Format::Html => conversion.html,
        Format::Plain => conversion.plain,
    })
}
