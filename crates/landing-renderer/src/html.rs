//! HTML backend for markdown rendering.
//!
//! Produces semantic HTML5 output suitable for web display.

use std::borrow::Cow;
use std::fmt::Write;

use crate::backend::{AlertKind, RenderBackend};
use crate::state::escape_html;

/// HTML render backend.
///
/// Produces semantic HTML5 with:
/// - `<pre><code>` for code blocks
/// - `<blockquote>` for blockquotes
/// - `markdown-alert` containers for alerts
/// - `<img>` for images
/// - Repository-relative link resolution against a base URL
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn alert_start(kind: AlertKind, out: &mut String) {
        write!(
            out,
            r#"<div class="markdown-alert markdown-alert-{kind}"><div class="markdown-alert-title">{} {}</div>"#,
            kind.icon(),
            kind.label()
        )
        .unwrap();
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }

    fn transform_link<'a>(url: &'a str, base_path: Option<&str>) -> Cow<'a, str> {
        match base_path {
            Some(base) => Cow::Owned(resolve_link(url, base)),
            None => Cow::Borrowed(url),
        }
    }
}

/// Resolve a repository-relative link against a base URL.
///
/// README links are written relative to the repository root, which breaks once
/// the content is served from a different location. With a base URL such as
/// `https://github.com/owner/repo/blob/main`:
/// - `./BUILD.md` → `https://github.com/owner/repo/blob/main/BUILD.md`
/// - `docs/../LICENSE` → `https://github.com/owner/repo/blob/main/LICENSE`
/// - `/patches/README.md#usage` → `https://github.com/owner/repo/blob/main/patches/README.md#usage`
///
/// Links with a scheme, protocol-relative links and fragment-only links are
/// returned unchanged.
fn resolve_link(url: &str, base_url: &str) -> String {
    if url.is_empty() || url.starts_with('#') || url.starts_with("//") || has_scheme(url) {
        return url.to_owned();
    }

    let (path_part, suffix) = match url.find(['#', '?']) {
        Some(pos) => (&url[..pos], &url[pos..]),
        None => (url, ""),
    };

    let resolved = resolve_relative_path(path_part);
    format!("{}/{resolved}{suffix}", base_url.trim_end_matches('/'))
}

/// Whether a URL starts with a scheme like `https:` or `mailto:`.
fn has_scheme(url: &str) -> bool {
    url.split_once(':').is_some_and(|(scheme, _)| {
        !scheme.is_empty()
            && scheme
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Normalize a relative path, handling `.` and `..` components.
///
/// `..` never climbs above the root.
fn resolve_relative_path(relative: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }
    segments.join("/")
}
