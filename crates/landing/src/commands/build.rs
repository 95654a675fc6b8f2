//! `landing build` command implementation.

use std::path::PathBuf;

use clap::Args;
use landing_config::{CliSettings, Config};
use landing_page::{BuildConfig, PageBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Markdown source file (default: README.md).
    #[arg(short, long)]
    pub(crate) source: Option<PathBuf>,

    /// Output HTML file (default: docs/index.html).
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover landing.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            source: self.source,
            output: self.output,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            source = %config.paths_resolved.source.display(),
            output = %config.paths_resolved.output.display(),
            gfm = config.markdown.gfm,
            hard_breaks = config.markdown.hard_breaks,
            "Loaded configuration"
        );

        match &config.config_path {
            Some(path) => output.detail(&format!("Config: {}", path.display())),
            None => output.warning("No landing.toml found, using defaults"),
        }
        output.info(&format!(
            "Source: {}",
            config.paths_resolved.source.display()
        ));

        let report = PageBuilder::new(BuildConfig::from_config(&config)).build()?;

        output.success("Website generated successfully!");
        output.info(&format!("Output: {}", report.output.display()));
        output.detail(&format!(
            "{} headings, {} alerts, {} bytes",
            report.heading_count, report.alert_count, report.bytes_written
        ));
        Ok(())
    }
}
