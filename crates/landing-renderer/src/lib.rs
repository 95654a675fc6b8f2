//! Markdown renderer with a pluggable backend and blockquote handlers.
//!
//! This crate provides a generic [`MarkdownRenderer`] that produces HTML
//! fragments through the [`RenderBackend`] trait.
//!
//! # Architecture
//!
//! - [`HtmlBackend`]: Produces semantic HTML5 with relative link resolution
//!
//! Shared functionality (tables, lists, inline formatting) is handled by the
//! generic renderer, while format-specific elements (code blocks, blockquotes,
//! alerts, images) are delegated to the backend.
//!
//! Blockquotes go through a chain of [`BlockquoteHandler`]s before being
//! rendered. The built-in [`AlertHandler`] turns `> [!NOTE]` style quotes into
//! labeled alert containers; anything no handler claims is rendered as a plain
//! `<blockquote>`.
//!
//! # Example
//!
//! ```
//! use landing_renderer::{HtmlBackend, MarkdownRenderer};
//!
//! let result = MarkdownRenderer::<HtmlBackend>::new()
//!     .render_markdown("# Hello\n\n> [!TIP] Use the x64 build");
//! assert!(result.html.contains("markdown-alert-tip"));
//! ```

mod backend;
mod blockquote;
mod html;
mod renderer;
mod state;
mod util;

pub use backend::{AlertKind, RenderBackend, UnknownAlertKind};
pub use blockquote::{AlertHandler, BlockquoteHandler, QuoteResult};
pub use html::HtmlBackend;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{Heading, escape_html};
