//! One-shot landing page build.
//!
//! Reads the README, renders it, assembles the page and writes it to the
//! output path. Every run regenerates the page from scratch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use landing_config::{Config, DownloadConfig, PageConfig};
use landing_renderer::{HtmlBackend, MarkdownRenderer, RenderResult};

use crate::template::{PageData, render_page};

/// Configuration for a landing page build.
#[derive(Clone, Debug)]
pub struct BuildConfig {
    /// README to render.
    pub source: PathBuf,
    /// HTML file to write.
    pub output: PathBuf,
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
    /// Render line breaks inside paragraphs as `<br>`.
    pub hard_breaks: bool,
    /// Base URL for repository-relative links.
    pub link_base: Option<String>,
    pub page: PageConfig,
    pub download: DownloadConfig,
}

impl BuildConfig {
    /// Take build settings from a loaded configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            source: config.paths_resolved.source.clone(),
            output: config.paths_resolved.output.clone(),
            gfm: config.markdown.gfm,
            hard_breaks: config.markdown.hard_breaks,
            link_base: config.markdown.link_base.clone(),
            page: config.page.clone(),
            download: config.download.clone(),
        }
    }
}

/// Error returned by the page builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Failed to create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("Failed to write {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Outcome of a successful build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub bytes_written: usize,
    /// Blockquotes rendered as alerts.
    pub alert_count: usize,
    pub heading_count: usize,
}

/// Builds the landing page from a README.
pub struct PageBuilder {
    config: BuildConfig,
    last_updated: Option<String>,
}

impl PageBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            last_updated: None,
        }
    }

    /// Use a fixed "Last updated" string instead of today's date.
    #[must_use]
    pub fn with_last_updated(mut self, last_updated: impl Into<String>) -> Self {
        self.last_updated = Some(last_updated.into());
        self
    }

    /// Render the README to an HTML fragment.
    pub fn render_markdown(&self, markdown: &str) -> RenderResult {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_gfm(self.config.gfm)
            .with_hard_breaks(self.config.hard_breaks);
        if let Some(base) = &self.config.link_base {
            renderer = renderer.with_base_path(base.as_str());
        }
        renderer.render_markdown(markdown)
    }

    /// Render the complete page for the given README text.
    ///
    /// Returns the page and the renderer result it was built from.
    pub fn render_page(&self, markdown: &str) -> (String, RenderResult) {
        let result = self.render_markdown(markdown);
        for warning in &result.warnings {
            tracing::warn!(warning = %warning, "Renderer warning");
        }

        let last_updated = self
            .last_updated
            .clone()
            .unwrap_or_else(|| format_last_updated(Local::now().date_naive()));

        let page = render_page(&PageData {
            page: &self.config.page,
            download: &self.config.download,
            html_content: &result.html,
            last_updated: &last_updated,
        });
        (page, result)
    }

    /// Run the build.
    ///
    /// Nothing is written when the source cannot be read.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or unreadable, or if the
    /// output directory or file cannot be written.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let source = &self.config.source;
        let output = &self.config.output;

        tracing::info!(source = %source.display(), "Reading source");
        let markdown = read_source(source)?;

        let (page, result) = self.render_page(&markdown);
        tracing::debug!(
            headings = result.headings.len(),
            alerts = result.alert_count,
            bytes = page.len(),
            "Rendered page"
        );

        ensure_parent_dir(output)?;
        fs::write(output, &page).map_err(|source| BuildError::Write {
            path: output.clone(),
            source,
        })?;
        tracing::info!(output = %output.display(), "Wrote page");

        Ok(BuildReport {
            source: source.clone(),
            output: output.clone(),
            bytes_written: page.len(),
            alert_count: result.alert_count,
            heading_count: result.headings.len(),
        })
    }
}

/// Format a date for the page footer, e.g. `October 19, 2026`.
#[must_use]
pub fn format_last_updated(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), date.day(), date.year())
}

fn read_source(path: &Path) -> Result<String, BuildError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            BuildError::SourceNotFound(path.to_path_buf())
        } else {
            BuildError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Create the output file's parent directory if it does not exist.
fn ensure_parent_dir(output: &Path) -> Result<(), BuildError> {
    let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if !parent.exists() {
        tracing::debug!(dir = %parent.display(), "Creating output directory");
    }
    fs::create_dir_all(parent).map_err(|source| BuildError::CreateDir {
        path: parent.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn config_in(dir: &Path) -> BuildConfig {
        BuildConfig {
            source: dir.join("README.md"),
            output: dir.join("docs/index.html"),
            gfm: true,
            hard_breaks: true,
            link_base: None,
            page: PageConfig::default(),
            download: DownloadConfig::default(),
        }
    }

    #[test]
    fn test_format_last_updated() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        assert_eq!(format_last_updated(date), "October 19, 2026");
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        assert_eq!(format_last_updated(date), "March 5, 2025");
    }

    #[test]
    fn test_build_creates_output_dir() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());
        fs::write(&config.source, "# Wget\n\n> [!NOTE]\n> Portable build").unwrap();

        let report = PageBuilder::new(config.clone())
            .with_last_updated("October 19, 2026")
            .build()
            .unwrap();

        assert_eq!(report.output, config.output);
        assert_eq!(report.alert_count, 1);
        assert_eq!(report.heading_count, 1);
        let written = fs::read_to_string(&config.output).unwrap();
        assert_eq!(written.len(), report.bytes_written);
        assert!(written.contains("markdown-alert-note"));
        assert!(written.contains("Last updated: October 19, 2026"));
    }

    #[test]
    fn test_build_missing_source() {
        let dir = TempDir::new().unwrap();
        let config = config_in(dir.path());

        let err = PageBuilder::new(config.clone()).build().unwrap_err();

        assert!(matches!(err, BuildError::SourceNotFound(ref p) if *p == config.source));
        assert!(!config.output.exists());
        assert!(!dir.path().join("docs").exists());
    }

    #[test]
    fn test_build_output_in_current_dir() {
        assert!(ensure_parent_dir(Path::new("index.html")).is_ok());
    }

    #[test]
    fn test_render_markdown_uses_link_base() {
        let dir = TempDir::new().unwrap();
        let config = BuildConfig {
            link_base: Some("https://github.com/KnugiHK/wget-on-windows/blob/main".to_owned()),
            ..config_in(dir.path())
        };
        let result = PageBuilder::new(config).render_markdown("[build](BUILD.md)");
        assert!(result.html.contains(
            r#"href="https://github.com/KnugiHK/wget-on-windows/blob/main/BUILD.md""#
        ));
    }

    #[test]
    fn test_render_markdown_soft_breaks() {
        let dir = TempDir::new().unwrap();
        let config = BuildConfig {
            hard_breaks: false,
            ..config_in(dir.path())
        };
        let result = PageBuilder::new(config).render_markdown("one\ntwo");
        assert!(!result.html.contains("<br>"));
    }
}
