//! Landing page assembly for a project README.
//!
//! [`PageBuilder`] reads the README, renders it with
//! [`landing_renderer::MarkdownRenderer`], wraps the fragment in the page
//! template and writes a single HTML file.

mod builder;
mod template;

pub use builder::{BuildConfig, BuildError, BuildReport, PageBuilder, format_last_updated};
pub use template::{PageData, render_page};
