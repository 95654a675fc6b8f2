//! End-to-end builds against a temporary project directory.

use std::fs;
use std::path::Path;

use landing_config::{DownloadConfig, PageConfig};
use landing_page::{BuildConfig, BuildError, PageBuilder};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const README: &str = "\
# Windows Binaries of GNU Wget

> [!IMPORTANT]
> Binaries are built with MinGW.

> [!tip] Prefer the x64 build
> on modern systems.

> A plain quote.

| Arch | Notes |
|------|-------|
| x64  | recommended |
";

fn build_config(dir: &Path) -> BuildConfig {
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
fn test_build_writes_page() {
    let dir = TempDir::new().unwrap();
    let config = build_config(dir.path());
    fs::write(&config.source, README).unwrap();

    let report = PageBuilder::new(config.clone())
        .with_last_updated("October 19, 2026")
        .build()
        .unwrap();

    assert_eq!(report.alert_count, 2);
    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.contains(r#"<div class="markdown-alert markdown-alert-important"><div class="markdown-alert-title">❗ IMPORTANT</div><p>Binaries are built with MinGW.</p></div>"#));
    assert!(html.contains(r#"<div class="markdown-alert markdown-alert-tip"><div class="markdown-alert-title">💡 TIP</div><p>Prefer the x64 build<br>"#));
    assert!(html.contains("<blockquote><p>A plain quote.</p></blockquote>"));
    assert!(html.contains("<table>"));
    assert!(!html.contains("[!IMPORTANT]"));
    assert!(!html.contains("[!tip]"));
}

#[test]
fn test_build_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let config = build_config(dir.path());
    fs::write(&config.source, README).unwrap();
    let builder = PageBuilder::new(config.clone()).with_last_updated("October 19, 2026");

    builder.build().unwrap();
    let first = fs::read(&config.output).unwrap();
    builder.build().unwrap();
    let second = fs::read(&config.output).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_source_keeps_existing_output() {
    let dir = TempDir::new().unwrap();
    let config = build_config(dir.path());
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(&config.output, "previous page").unwrap();

    let err = PageBuilder::new(config.clone()).build().unwrap_err();

    assert!(matches!(err, BuildError::SourceNotFound(_)));
    assert!(err.to_string().contains("README.md"));
    assert_eq!(fs::read_to_string(&config.output).unwrap(), "previous page");
}

#[test]
fn test_title_and_warning_alert() {
    let dir = TempDir::new().unwrap();
    let config = build_config(dir.path());

    let (page, result) = PageBuilder::new(config)
        .with_last_updated("October 19, 2026")
        .render_page("# Title\n\n> [!WARNING] Be careful");

    assert_eq!(result.headings.len(), 1);
    assert_eq!(result.headings[0].title, "Title");
    assert_eq!(
        result.html,
        concat!(
            r#"<h1 id="title">Title</h1>"#,
            r#"<div class="markdown-alert markdown-alert-warning"><div class="markdown-alert-title">⚠️ WARNING</div><p>Be careful</p></div>"#,
        )
    );
    assert!(page.contains(&result.html));
}

#[test]
fn test_build_overwrites_output() {
    let dir = TempDir::new().unwrap();
    let config = build_config(dir.path());
    fs::create_dir_all(dir.path().join("docs")).unwrap();
    fs::write(&config.output, "stale").unwrap();
    fs::write(&config.source, "Fresh content").unwrap();

    PageBuilder::new(config.clone()).build().unwrap();

    let html = fs::read_to_string(&config.output).unwrap();
    assert!(html.contains("<p>Fresh content</p>"));
    assert!(!html.contains("stale"));
}
