//! HTML page template for the landing page.
//!
//! The page chrome (styles, header, footer, download modal and its script)
//! lives in `assets/page.html` and is compiled into the binary. Placeholders
//! of the form `{{name}}` are filled in a single pass, so text inside the
//! rendered README is never re-scanned for placeholders.

use std::borrow::Cow;
use std::fmt::Write;

use landing_config::{DownloadConfig, DownloadOption, PageConfig};
use landing_renderer::escape_html;

const PAGE_TEMPLATE: &str = include_str!("../assets/page.html");

/// Indentation of option buttons inside `.option-buttons`.
const BUTTON_INDENT: &str = "                        ";

/// All data needed to render the landing page.
pub struct PageData<'a> {
    pub page: &'a PageConfig,
    pub download: &'a DownloadConfig,
    /// Rendered README fragment, inserted verbatim.
    pub html_content: &'a str,
    /// Preformatted "Last updated" date.
    pub last_updated: &'a str,
}

/// Render the complete landing page.
pub fn render_page(data: &PageData<'_>) -> String {
    let architecture_buttons = render_option_buttons("arch", &data.download.architectures);
    let ssl_buttons = render_option_buttons("ssl", &data.download.ssl_libraries);
    let release_base_url = script_string(&data.download.release_base_url);

    fill_placeholders(PAGE_TEMPLATE, |name| match name {
        "title" => Some(escape_html(&data.page.title)),
        "subtitle" => Some(escape_html(&data.page.subtitle)),
        "repository_url" => Some(escape_html(&data.page.repository_url)),
        "maintainer" => Some(escape_html(&data.page.maintainer)),
        "maintainer_url" => Some(escape_html(&data.page.maintainer_url)),
        "last_updated" => Some(escape_html(data.last_updated)),
        "content" => Some(Cow::Borrowed(data.html_content)),
        "architecture_buttons" => Some(Cow::Borrowed(architecture_buttons.as_str())),
        "ssl_buttons" => Some(Cow::Borrowed(ssl_buttons.as_str())),
        "release_base_url" => Some(Cow::Borrowed(release_base_url.as_str())),
        _ => None,
    })
}

/// Render one selectable button per download option.
fn render_option_buttons(option: &str, items: &[DownloadOption]) -> String {
    let mut html = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            html.push('\n');
        }
        let _ = write!(
            html,
            r#"{BUTTON_INDENT}<button class="option-btn" data-option="{option}" data-value="{}">{}</button>"#,
            escape_html(&item.value),
            escape_html(&item.label)
        );
    }
    html
}

/// Encode a string as a JavaScript string literal safe inside `<script>`.
fn script_string(value: &str) -> String {
    serde_json::Value::String(value.to_owned())
        .to_string()
        .replace("</", r"<\/")
}

/// Replace `{{name}}` placeholders using `lookup`.
///
/// Unknown names and unterminated placeholders are kept as-is.
fn fill_placeholders<'v, F>(template: &str, lookup: F) -> String
where
    F: Fn(&str) -> Option<Cow<'v, str>>,
{
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let name = &after[..end];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => out.push_str(&rest[start..start + end + 4]),
        }
        rest = &after[end + 2..];
    }

    out.push_str(rest);
    out
}
