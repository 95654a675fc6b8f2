//! Blockquote handlers.
//!
//! Before a blockquote is rendered, the renderer passes the text of its first
//! line to each registered [`BlockquoteHandler`] in order. The first handler
//! returning something other than [`QuoteResult::PassThrough`] decides how the
//! blockquote is rendered. If every handler passes, the blockquote is rendered
//! by the backend as a plain quote.

use std::sync::LazyLock;

use regex::Regex;

use crate::backend::AlertKind;

/// Matches an alert marker at the start of a blockquote's first line.
static ALERT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\[!(NOTE|TIP|IMPORTANT|WARNING|CAUTION)\]\s*").unwrap()
});

/// Outcome of offering a blockquote to a [`BlockquoteHandler`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QuoteResult {
    /// Render the blockquote as an alert of the given kind.
    ///
    /// `rest` replaces the first line's text.
    Alert { kind: AlertKind, rest: String },
    /// Wrap the blockquote content in custom markup.
    ///
    /// `rest` replaces the first line's text.
    Wrap {
        open: String,
        close: String,
        rest: String,
    },
    /// Not handled; try the next handler.
    PassThrough,
}

/// Decides how a blockquote is rendered.
///
/// `first_line` is the leading text of the blockquote's first paragraph, up to
/// the first line break or inline element. Handlers are only consulted for
/// blockquotes that open with such text.
pub trait BlockquoteHandler {
    fn process(&mut self, first_line: &str) -> QuoteResult;

    /// Warnings collected while processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Built-in handler for GitHub-style alerts (`> [!WARNING]`).
///
/// The marker is matched case-insensitively and stripped together with any
/// whitespace that follows it. Unknown markers such as `[!BOGUS]` pass through.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlertHandler;

impl BlockquoteHandler for AlertHandler {
    fn process(&mut self, first_line: &str) -> QuoteResult {
        let Some(captures) = ALERT_MARKER.captures(first_line) else {
            return QuoteResult::PassThrough;
        };
        // The regex only admits the five known names.
        let Ok(kind) = captures[1].parse::<AlertKind>() else {
            return QuoteResult::PassThrough;
        };
        QuoteResult::Alert {
            kind,
            rest: first_line[captures[0].len()..].to_owned(),
        }
    }
}
