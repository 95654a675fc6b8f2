//! Render backend trait and alert kinds.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Kind of a GitHub-style alert blockquote (`> [!NOTE]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl AlertKind {
    /// All alert kinds, in the order GitHub documents them.
    pub const ALL: [Self; 5] = [
        Self::Note,
        Self::Tip,
        Self::Important,
        Self::Warning,
        Self::Caution,
    ];

    /// Lowercase name, used for CSS classes (`markdown-alert-note`).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tip => "tip",
            Self::Important => "important",
            Self::Warning => "warning",
            Self::Caution => "caution",
        }
    }

    /// Uppercase label shown in the alert title.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "NOTE",
            Self::Tip => "TIP",
            Self::Important => "IMPORTANT",
            Self::Warning => "WARNING",
            Self::Caution => "CAUTION",
        }
    }

    /// Emoji icon shown before the label.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Note => "📘",
            Self::Tip => "💡",
            Self::Important => "❗",
            Self::Warning => "⚠️",
            Self::Caution => "🚨",
        }
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown alert kind.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownAlertKind;

impl FromStr for AlertKind {
    type Err = UnknownAlertKind;

    /// Parse a kind name, ignoring ASCII case (`note`, `Note`, `NOTE`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or(UnknownAlertKind)
    }
}

/// Format-specific rendering hooks.
///
/// The generic [`MarkdownRenderer`](crate::MarkdownRenderer) handles document
/// structure and calls into the backend for elements whose markup differs
/// between output formats. All methods append to `out`.
pub trait RenderBackend {
    /// Render a fenced or indented code block.
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Open a plain blockquote.
    fn blockquote_start(out: &mut String);

    /// Close a plain blockquote.
    fn blockquote_end(out: &mut String);

    /// Open an alert container, including its title line.
    fn alert_start(kind: AlertKind, out: &mut String);

    /// Close an alert container.
    fn alert_end(kind: AlertKind, out: &mut String);

    /// Render an image.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Transform a link destination, optionally relative to `base_path`.
    fn transform_link<'a>(url: &'a str, base_path: Option<&str>) -> Cow<'a, str>;

    /// Render a hard line break.
    fn hard_break(out: &mut String) {
        out.push_str("<br>\n");
    }

    /// Render a thematic break.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    /// Render a task list checkbox.
    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}
