//! Mutable state tracked while walking markdown events.

use std::borrow::Cow;
use std::collections::HashMap;

use pulldown_cmark::Alignment;

/// A heading encountered during rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain-text title.
    pub title: String,
    /// Anchor id written to the `id` attribute.
    pub id: String,
}

/// Escape text for use in HTML content and attribute values.
///
/// Borrows the input when nothing needs escaping.
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Collects code block content between start and end events.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    lang: Option<String>,
    content: String,
}

impl CodeBlockState {
    pub(crate) fn start(&mut self, lang: Option<String>) {
        self.active = true;
        self.lang = lang;
        self.content.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub(crate) fn push_newline(&mut self) {
        self.content.push('\n');
    }

    /// Finish the block, returning its language and content.
    pub(crate) fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.lang.take(), std::mem::take(&mut self.content))
    }
}

/// Tracks the current table's alignments and position.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    alignments: Vec<Alignment>,
    in_head: bool,
    cell_index: usize,
}

impl TableState {
    pub(crate) fn start(&mut self, alignments: Vec<Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub(crate) fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub(crate) fn end_head(&mut self) {
        self.in_head = false;
    }

    pub(crate) fn is_in_head(&self) -> bool {
        self.in_head
    }

    pub(crate) fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub(crate) fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Inline style attribute for the current cell, or empty.
    pub(crate) fn current_alignment_style(&self) -> &'static str {
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            Some(Alignment::None) | None => "",
        }
    }
}

/// Collects image alt text between start and end events.
#[derive(Debug, Default)]
pub(crate) struct ImageState {
    active: bool,
    alt: String,
}

impl ImageState {
    pub(crate) fn start(&mut self) {
        self.active = true;
        self.alt.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.active
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }

    pub(crate) fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt)
    }
}

/// Buffers heading content so the opening tag can carry a generated id.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    level: Option<u8>,
    text: String,
    html: String,
    used_ids: HashMap<String, usize>,
    headings: Vec<Heading>,
}

impl HeadingState {
    pub(crate) fn start_heading(&mut self, level: u8) {
        self.level = Some(level);
        self.text.clear();
        self.html.clear();
    }

    pub(crate) fn is_active(&self) -> bool {
        self.level.is_some()
    }

    /// Append plain text (used for the id and title).
    pub(crate) fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    /// Append rendered HTML (used for the heading body).
    pub(crate) fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub(crate) fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    /// Finish the current heading.
    ///
    /// Returns `(level, id, html)` and records the heading.
    pub(crate) fn complete_heading(&mut self) -> Option<(u8, String, String)> {
        let level = self.level.take()?;
        let title = self.text.trim().to_owned();
        let id = self.unique_id(&slugify(&title));
        self.headings.push(Heading {
            level,
            title,
            id: id.clone(),
        });
        Some((level, id, std::mem::take(&mut self.html)))
    }

    pub(crate) fn take_headings(&mut self) -> Vec<Heading> {
        self.used_ids.clear();
        std::mem::take(&mut self.headings)
    }

    /// Deduplicate ids: `faq`, `faq-1`, `faq-2`, ...
    ///
    /// Suffixed ids skip any id already emitted, including ones that came
    /// from a literal heading such as `FAQ-1`.
    fn unique_id(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "section" } else { base };
        let Some(&count) = self.used_ids.get(base) else {
            self.used_ids.insert(base.to_owned(), 0);
            return base.to_owned();
        };

        let mut n = count;
        let id = loop {
            n += 1;
            let candidate = format!("{base}-{n}");
            if !self.used_ids.contains_key(&candidate) {
                break candidate;
            }
        };
        self.used_ids.insert(base.to_owned(), n);
        self.used_ids.insert(id.clone(), 0);
        id
    }
}

/// GitHub-style anchor slug: lowercase, punctuation dropped, spaces to `-`.
fn slugify(title: &str) -> String {
    title
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' {
                Some(c.to_lowercase().collect::<String>())
            } else if c.is_whitespace() {
                Some("-".to_owned())
            } else {
                None
            }
        })
        .collect()
}
