//! Generic markdown renderer with pluggable backend.

use std::collections::VecDeque;
use std::fmt::Write;
use std::marker::PhantomData;

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd, TextMergeStream};

use crate::backend::{AlertKind, RenderBackend};
use crate::blockquote::{AlertHandler, BlockquoteHandler, QuoteResult};
use crate::state::{CodeBlockState, Heading, HeadingState, ImageState, TableState, escape_html};
use crate::util::{fence_language, heading_level_to_num};

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Headings in document order.
    pub headings: Vec<Heading>,
    /// Number of blockquotes rendered as alerts.
    pub alert_count: usize,
    /// Warnings reported by blockquote handlers.
    pub warnings: Vec<String>,
}

/// How an open blockquote is closed.
#[derive(Debug)]
enum QuoteFrame {
    Plain,
    Alert(AlertKind),
    Wrap(String),
}

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling common elements (tables, lists, inline formatting) generically.
///
/// # Blockquote Handlers
///
/// Every blockquote is first offered to the registered [`BlockquoteHandler`]s.
/// [`AlertHandler`] is registered by default; more can be added with
/// [`with_blockquote_handler`](Self::with_blockquote_handler). Handlers are
/// checked in order and the first returning a non-`PassThrough` result wins.
pub struct MarkdownRenderer<B: RenderBackend> {
    output: String,
    code: CodeBlockState,
    table: TableState,
    image: ImageState,
    heading: HeadingState,
    base_path: Option<String>,
    pending_image: Option<(String, String)>,
    handlers: Vec<Box<dyn BlockquoteHandler>>,
    gfm: bool,
    hard_breaks: bool,
    /// One frame per open blockquote, innermost last.
    quote_stack: Vec<QuoteFrame>,
    alert_count: usize,
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer.
    ///
    /// GFM and hard line breaks are enabled, and [`AlertHandler`] is registered.
    #[must_use]
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(4096),
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::default(),
            base_path: None,
            pending_image: None,
            handlers: vec![Box::new(AlertHandler)],
            gfm: true,
            hard_breaks: true,
            quote_stack: Vec::new(),
            alert_count: 0,
            _backend: PhantomData,
        }
    }

    /// Set base URL for resolving repository-relative links.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<String>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Render line breaks inside paragraphs as `<br>`.
    ///
    /// Enabled by default. When disabled, a soft break is a plain newline.
    #[must_use]
    pub fn with_hard_breaks(mut self, enabled: bool) -> Self {
        self.hard_breaks = enabled;
        self
    }

    /// Add a blockquote handler after the existing ones.
    ///
    /// # Example
    ///
    /// ```
    /// use landing_renderer::{BlockquoteHandler, HtmlBackend, MarkdownRenderer, QuoteResult};
    ///
    /// struct Spoiler;
    ///
    /// impl BlockquoteHandler for Spoiler {
    ///     fn process(&mut self, first_line: &str) -> QuoteResult {
    ///         match first_line.strip_prefix("spoiler:") {
    ///             Some(rest) => QuoteResult::Wrap {
    ///                 open: "<details>".to_owned(),
    ///                 close: "</details>".to_owned(),
    ///                 rest: rest.trim_start().to_owned(),
    ///             },
    ///             None => QuoteResult::PassThrough,
    ///         }
    ///     }
    /// }
    ///
    /// let result = MarkdownRenderer::<HtmlBackend>::new()
    ///     .with_blockquote_handler(Spoiler)
    ///     .render_markdown("> spoiler: it was the butler");
    /// assert_eq!(result.html, "<details><p>it was the butler</p></details>");
    /// ```
    #[must_use]
    pub fn with_blockquote_handler<H: BlockquoteHandler + 'static>(mut self, handler: H) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Remove the built-in [`AlertHandler`] and any other registered handlers.
    #[must_use]
    pub fn without_alerts(mut self) -> Self {
        self.handlers.clear();
        self
    }

    /// Get parser options based on GFM configuration.
    ///
    /// Alert markers are detected by [`AlertHandler`], so the parser's own
    /// blockquote tag support stays off.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult {
        self.render(self.create_parser(markdown))
    }

    /// Get all warnings from all handlers.
    pub fn handler_warnings(&self) -> impl Iterator<Item = String> + '_ {
        self.handlers.iter().flat_map(|h| h.warnings()).cloned()
    }

    /// Push content to output or heading buffer based on context.
    fn push_inline(&mut self, content: &str) {
        if self.heading.is_active() {
            self.heading.push_html(content);
        } else {
            self.output.push_str(content);
        }
    }

    /// Render markdown events and return the result.
    ///
    /// Adjacent text events are merged first so a blockquote's first line
    /// reaches the handlers in one piece.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult
    where
        I: Iterator<Item = Event<'a>>,
    {
        let mut queue: VecDeque<Event<'a>> = TextMergeStream::new(events).collect();
        while let Some(event) = queue.pop_front() {
            match event {
                Event::Start(Tag::BlockQuote(_)) => self.start_blockquote(&mut queue),
                event => self.process_event(event),
            }
        }

        RenderResult {
            html: std::mem::take(&mut self.output),
            headings: self.heading.take_headings(),
            alert_count: std::mem::take(&mut self.alert_count),
            warnings: self.handler_warnings().collect(),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.hard_break(),
            Event::Rule => self.horizontal_rule(),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    /// Open a blockquote, letting handlers claim it based on its first line.
    ///
    /// `queue` holds the events following the blockquote start. When a handler
    /// claims the quote, the first line's text is replaced by the handler's
    /// remainder; a paragraph left empty by that is dropped.
    fn start_blockquote<'a>(&mut self, queue: &mut VecDeque<Event<'a>>) {
        let result = match (queue.front(), queue.get(1)) {
            (Some(Event::Start(Tag::Paragraph)), Some(Event::Text(first_line))) => self
                .handlers
                .iter_mut()
                .map(|handler| handler.process(first_line))
                .find(|result| *result != QuoteResult::PassThrough)
                .unwrap_or(QuoteResult::PassThrough),
            _ => QuoteResult::PassThrough,
        };

        let rest = match result {
            QuoteResult::PassThrough => {
                self.quote_stack.push(QuoteFrame::Plain);
                B::blockquote_start(&mut self.output);
                return;
            }
            QuoteResult::Alert { kind, rest } => {
                self.alert_count += 1;
                self.quote_stack.push(QuoteFrame::Alert(kind));
                B::alert_start(kind, &mut self.output);
                rest
            }
            QuoteResult::Wrap { open, close, rest } => {
                self.output.push_str(&open);
                self.quote_stack.push(QuoteFrame::Wrap(close));
                rest
            }
        };

        if rest.is_empty() {
            queue.remove(1);
            if matches!(queue.get(1), Some(Event::SoftBreak | Event::HardBreak)) {
                queue.remove(1);
            }
            if matches!(queue.get(1), Some(Event::End(TagEnd::Paragraph))) {
                queue.drain(..2);
            }
        } else {
            queue[1] = Event::Text(CowStr::from(rest));
        }
    }

    fn end_blockquote(&mut self) {
        match self.quote_stack.pop() {
            Some(QuoteFrame::Alert(kind)) => B::alert_end(kind, &mut self.output),
            Some(QuoteFrame::Wrap(close)) => self.output.push_str(&close),
            Some(QuoteFrame::Plain) | None => B::blockquote_end(&mut self.output),
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("<p>");
                }
            }
            Tag::Heading { level, .. } => {
                // Opening tag is written in end_tag after we have the ID.
                self.heading.start_heading(heading_level_to_num(level));
            }
            Tag::BlockQuote(_) => {
                // Only reachable when events bypass `render`'s lookahead.
                self.quote_stack.push(QuoteFrame::Plain);
                B::blockquote_start(&mut self.output);
            }
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(ref info) => fence_language(info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(start) => match start {
                Some(1) => self.output.push_str("<ol>"),
                Some(n) => write!(self.output, r#"<ol start="{n}">"#).unwrap(),
                None => self.output.push_str("<ul>"),
            },
            Tag::Item => {
                self.output.push_str("<li>");
            }
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => {
                self.output.push_str("<dl>");
            }
            Tag::DefinitionListTitle => {
                self.output.push_str("<dt>");
            }
            Tag::DefinitionListDefinition => {
                self.output.push_str("<dd>");
            }
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.output.push_str("<table>");
            }
            Tag::TableHead => {
                self.table.start_head();
                self.output.push_str("<thead><tr>");
            }
            Tag::TableRow => {
                self.table.start_row();
                self.output.push_str("<tr>");
            }
            Tag::TableCell => {
                let align = self.table.current_alignment_style();
                let tag = if self.table.is_in_head() { "th" } else { "td" };
                write!(self.output, "<{tag}{align}>").unwrap();
            }
            Tag::Emphasis => self.push_inline("<em>"),
            Tag::Strong => self.push_inline("<strong>"),
            Tag::Strikethrough => self.push_inline("<s>"),
            Tag::Link { dest_url, .. } => {
                let href = B::transform_link(&dest_url, self.base_path.as_deref());
                let link_tag = format!(r#"<a href="{}">"#, escape_html(&href));
                self.push_inline(&link_tag);
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                // Start collecting alt text; image will be rendered in end_tag
                self.image.start();
                self.pending_image = Some((dest_url.to_string(), title.to_string()));
            }
            Tag::Superscript => self.push_inline("<sup>"),
            Tag::Subscript => self.push_inline("<sub>"),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                if !self.code.is_active() {
                    self.output.push_str("</p>");
                }
            }
            TagEnd::Heading(_level) => {
                if let Some((level, id, html)) = self.heading.complete_heading() {
                    write!(
                        self.output,
                        r#"<h{level} id="{id}">{}</h{level}>"#,
                        html.trim()
                    )
                    .unwrap();
                }
            }
            TagEnd::BlockQuote(_) => self.end_blockquote(),
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                B::code_block(lang.as_deref(), &content, &mut self.output);
            }
            TagEnd::List(ordered) => {
                self.output.push_str(if ordered { "</ol>" } else { "</ul>" });
            }
            TagEnd::Item => {
                self.output.push_str("</li>");
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Image => {
                // Render image with collected alt text
                let alt = self.image.end();
                if let Some((src, title)) = self.pending_image.take() {
                    let mut img = String::new();
                    B::image(&src, &alt, &title, &mut img);
                    self.push_inline(&img);
                }
            }
            TagEnd::DefinitionList => {
                self.output.push_str("</dl>");
            }
            TagEnd::DefinitionListTitle => {
                self.output.push_str("</dt>");
            }
            TagEnd::DefinitionListDefinition => {
                self.output.push_str("</dd>");
            }
            TagEnd::Table => {
                self.output.push_str("</tbody></table>");
            }
            TagEnd::TableHead => {
                self.output.push_str("</tr></thead><tbody>");
                self.table.end_head();
            }
            TagEnd::TableRow => {
                self.output.push_str("</tr>");
            }
            TagEnd::TableCell => {
                self.output.push_str(if self.table.is_in_head() {
                    "</th>"
                } else {
                    "</td>"
                });
                self.table.next_cell();
            }
            TagEnd::Emphasis => self.push_inline("</em>"),
            TagEnd::Strong => self.push_inline("</strong>"),
            TagEnd::Strikethrough => self.push_inline("</s>"),
            TagEnd::Link => self.push_inline("</a>"),
            TagEnd::Superscript => self.push_inline("</sup>"),
            TagEnd::Subscript => self.push_inline("</sub>"),
        }
    }

    fn text(&mut self, text: &str) {
        if self.code.is_active() {
            self.code.push_str(text);
        } else if self.image.is_active() {
            self.image.push_str(text);
        } else if self.heading.is_active() {
            self.heading.push_text(text);
            self.heading.push_html(&escape_html(text));
        } else {
            self.output.push_str(&escape_html(text));
        }
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
        } else if self.heading.is_active() {
            self.heading.push_text(code);
            write!(
                self.heading.html_buffer(),
                "<code>{}</code>",
                escape_html(code)
            )
            .unwrap();
        } else {
            write!(self.output, "<code>{}</code>", escape_html(code)).unwrap();
        }
    }

    fn raw_html(&mut self, html: &str) {
        self.push_inline(html);
    }

    fn soft_break(&mut self) {
        if self.code.is_active() {
            self.code.push_newline();
        } else if self.image.is_active() {
            self.image.push_str(" ");
        } else if self.hard_breaks {
            self.hard_break();
        } else {
            if self.heading.is_active() {
                self.heading.push_text(" ");
            }
            self.push_inline("\n");
        }
    }

    fn hard_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(" ");
        }
        let mut br = String::new();
        B::hard_break(&mut br);
        self.push_inline(&br);
    }

    fn horizontal_rule(&mut self) {
        B::horizontal_rule(&mut self.output);
    }

    fn task_list_marker(&mut self, checked: bool) {
        B::task_list_marker(checked, &mut self.output);
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HtmlBackend;
    use pretty_assertions::assert_eq;
    use pulldown_cmark::{Options, Parser};

    fn render_html(markdown: &str) -> RenderResult {
        MarkdownRenderer::<HtmlBackend>::new().render_markdown(markdown)
    }

    fn render_with_base_path(markdown: &str, base_path: &str) -> RenderResult {
        MarkdownRenderer::<HtmlBackend>::new()
            .with_base_path(base_path)
            .render_markdown(markdown)
    }

    #[test]
    fn test_html_basic_paragraph() {
        let result = render_html("Hello, world!");
        assert_eq!(result.html, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_html_heading_with_id() {
        let result = render_html("## Section Title");
        assert_eq!(result.html, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(
            result.headings,
            vec![Heading {
                level: 2,
                title: "Section Title".to_owned(),
                id: "section-title".to_owned(),
            }]
        );
    }

    #[test]
    fn test_html_code_block() {
        let result = render_html("```rust\nfn main() {}\n```");
        assert_eq!(
            result.html,
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_html_code_block_escaped() {
        let result = render_html("```\nwget -O- <url> & exit\n```");
        assert!(result.html.contains("wget -O- &lt;url&gt; &amp; exit"));
    }

    #[test]
    fn test_html_blockquote() {
        let result = render_html("> some text");
        assert_eq!(result.html, "<blockquote><p>some text</p></blockquote>");
        assert_eq!(result.alert_count, 0);
    }

    #[test]
    fn test_warning_alert_same_line() {
        let result = render_html("# Title\n\n> [!WARNING] Be careful");
        assert_eq!(
            result.html,
            concat!(
                r#"<h1 id="title">Title</h1>"#,
                r#"<div class="markdown-alert markdown-alert-warning">"#,
                r#"<div class="markdown-alert-title">⚠️ WARNING</div>"#,
                "<p>Be careful</p></div>"
            )
        );
        assert_eq!(result.alert_count, 1);
    }

    #[test]
    fn test_note_alert_marker_on_own_line() {
        let result = render_html("> [!NOTE]\n> This is a **note**.");
        assert_eq!(
            result.html,
            concat!(
                r#"<div class="markdown-alert markdown-alert-note">"#,
                r#"<div class="markdown-alert-title">📘 NOTE</div>"#,
                "<p>This is a <strong>note</strong>.</p></div>"
            )
        );
    }

    #[test]
    fn test_alert_marker_own_paragraph_dropped() {
        let result = render_html("> [!TIP]\n>\n> Use the x64 build.");
        assert_eq!(
            result.html,
            concat!(
                r#"<div class="markdown-alert markdown-alert-tip">"#,
                r#"<div class="markdown-alert-title">💡 TIP</div>"#,
                "<p>Use the x64 build.</p></div>"
            )
        );
    }

    #[test]
    fn test_alert_marker_with_hard_break() {
        let result = render_html("> [!CAUTION]  \n> Hot");
        assert!(result.html.ends_with("🚨 CAUTION</div><p>Hot</p></div>"));
    }

    #[test]
    fn test_alert_marker_only() {
        let result = render_html("> [!IMPORTANT]");
        assert_eq!(
            result.html,
            concat!(
                r#"<div class="markdown-alert markdown-alert-important">"#,
                r#"<div class="markdown-alert-title">❗ IMPORTANT</div>"#,
                "</div>"
            )
        );
    }

    #[test]
    fn test_all_alert_kinds() {
        let cases = [
            ("NOTE", "note", "📘"),
            ("TIP", "tip", "💡"),
            ("IMPORTANT", "important", "❗"),
            ("WARNING", "warning", "⚠️"),
            ("CAUTION", "caution", "🚨"),
        ];
        for (marker, class, icon) in cases {
            let result = render_html(&format!("> [!{marker}]\n> Body text"));
            assert!(
                result
                    .html
                    .contains(&format!("markdown-alert markdown-alert-{class}")),
                "{marker}: {}",
                result.html
            );
            assert!(
                result.html.contains(&format!("{icon} {marker}</div>")),
                "{marker}: {}",
                result.html
            );
            assert!(result.html.contains("<p>Body text</p>"));
            assert!(!result.html.contains("[!"));
        }
    }

    #[test]
    fn test_alert_case_insensitive() {
        let lower = render_html("> [!note] Read this");
        let title = render_html("> [!Note] Read this");
        let upper = render_html("> [!NOTE] Read this");
        assert_eq!(lower.html, upper.html);
        assert_eq!(title.html, upper.html);
        assert!(upper.html.contains("📘 NOTE"));
    }

    #[test]
    fn test_unknown_marker_is_plain_blockquote() {
        let result = render_html("> [!BOGUS] Hello");
        assert_eq!(
            result.html,
            "<blockquote><p>[!BOGUS] Hello</p></blockquote>"
        );
        assert_eq!(result.alert_count, 0);
    }

    #[test]
    fn test_marker_after_emphasis_is_plain_blockquote() {
        let result = render_html("> *x* [!NOTE]");
        assert!(result.html.starts_with("<blockquote>"));
    }

    #[test]
    fn test_alert_with_list() {
        let result = render_html("> [!WARNING]\n> Be careful:\n> - Item 1\n> - Item 2");
        assert!(result.html.contains("markdown-alert-warning"));
        assert!(result.html.contains("<p>Be careful:</p>"));
        assert!(result.html.contains("<ul><li>Item 1</li><li>Item 2</li></ul>"));
        assert!(result.html.ends_with("</ul></div>"));
    }

    #[test]
    fn test_nested_blockquotes_decided_separately() {
        let result = render_html("> [!NOTE] Outer\n>\n> > inner quote");
        assert_eq!(
            result.html,
            concat!(
                r#"<div class="markdown-alert markdown-alert-note">"#,
                r#"<div class="markdown-alert-title">📘 NOTE</div>"#,
                "<p>Outer</p>",
                "<blockquote><p>inner quote</p></blockquote>",
                "</div>"
            )
        );
    }

    #[test]
    fn test_alert_inside_plain_blockquote() {
        let result = render_html("> outer\n>\n> > [!TIP] inner");
        assert!(result.html.starts_with("<blockquote><p>outer</p>"));
        assert!(result.html.contains("💡 TIP</div><p>inner</p></div>"));
        assert!(result.html.ends_with("</div></blockquote>"));
    }

    #[test]
    fn test_without_alerts() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .without_alerts()
            .render_markdown("> [!NOTE] Hi");
        assert_eq!(result.html, "<blockquote><p>[!NOTE] Hi</p></blockquote>");
    }

    #[test]
    fn test_soft_break_as_hard_break() {
        let result = render_html("line one\nline two");
        assert_eq!(result.html, "<p>line one<br>\nline two</p>");
    }

    #[test]
    fn test_soft_break_without_hard_breaks() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_hard_breaks(false)
            .render_markdown("line one\nline two");
        assert_eq!(result.html, "<p>line one\nline two</p>");
    }

    #[test]
    fn test_html_image() {
        let result = render_html("![Alt text](image.png)");
        assert_eq!(
            result.html,
            r#"<p><img src="image.png" alt="Alt text"></p>"#
        );
    }

    #[test]
    fn test_html_table() {
        let result = render_html("| A | B |\n|---|--:|\n| 1 | 2 |");
        assert_eq!(
            result.html,
            concat!(
                "<table><thead><tr><th>A</th>",
                r#"<th style="text-align: right">B</th></tr></thead>"#,
                "<tbody><tr><td>1</td>",
                r#"<td style="text-align: right">2</td></tr></tbody></table>"#
            )
        );
    }

    #[test]
    fn test_html_link_with_base_path() {
        let result = render_with_base_path("[Build](./BUILD.md)", "https://example.com/repo");
        assert!(
            result
                .html
                .contains(r#"href="https://example.com/repo/BUILD.md""#)
        );
    }

    #[test]
    fn test_html_link_escaped() {
        let result = render_html("[q](https://example.com/?a=1&b=2)");
        assert!(
            result
                .html
                .contains(r#"href="https://example.com/?a=1&amp;b=2""#)
        );
    }

    #[test]
    fn test_raw_html_passthrough() {
        let result = render_html("<p align=\"center\">logo</p>");
        assert!(result.html.contains("<p align=\"center\">logo</p>"));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let result = render_html("## FAQ\n\n## FAQ\n\n## FAQ");
        let ids: Vec<_> = result.headings.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, ["faq", "faq-1", "faq-2"]);
    }

    #[test]
    fn test_heading_ids_never_repeat() {
        let result = render_html("## FAQ\n\n## FAQ\n\n## FAQ-1");
        assert_eq!(
            result.html,
            concat!(
                r#"<h2 id="faq">FAQ</h2>"#,
                r#"<h2 id="faq-1">FAQ</h2>"#,
                r#"<h2 id="faq-1-1">FAQ-1</h2>"#,
            )
        );
    }

    #[test]
    fn test_multiline_heading_id_separates_words() {
        let result = render_html("Title\nsecond\n=====");
        assert_eq!(
            result.html,
            "<h1 id=\"title-second\">Title<br>\nsecond</h1>"
        );
        assert_eq!(result.headings[0].title, "Title second");
    }

    #[test]
    fn test_multiline_heading_id_without_hard_breaks() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_hard_breaks(false)
            .render_markdown("Title\nsecond\n=====");
        assert_eq!(result.headings[0].id, "title-second");
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render_html("## Install `wget`");
        assert!(result.html.contains("<code>wget</code>"));
        assert_eq!(result.headings[0].title, "Install wget");
    }

    #[test]
    fn test_heading_with_link() {
        let result = render_html("## See [docs](https://example.com)");
        assert_eq!(
            result.html,
            r#"<h2 id="see-docs">See <a href="https://example.com">docs</a></h2>"#
        );
    }

    #[test]
    fn test_emphasis() {
        let result = render_html("*italic* and **bold**");
        assert!(result.html.contains("<em>italic</em>"));
        assert!(result.html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_strikethrough() {
        let result = render_html("~~deleted~~");
        assert!(result.html.contains("<s>deleted</s>"));
    }

    #[test]
    fn test_lists() {
        let result = render_html("- Item 1\n- Item 2");
        assert_eq!(result.html, "<ul><li>Item 1</li><li>Item 2</li></ul>");

        let result = render_html("3. Third\n4. Fourth");
        assert!(result.html.starts_with(r#"<ol start="3">"#));
        assert!(result.html.ends_with("</ol>"));
    }

    #[test]
    fn test_task_list_html() {
        let result = render_html("- [ ] Unchecked\n- [x] Checked");
        assert!(result.html.contains(r#"<input type="checkbox" disabled>"#));
        assert!(
            result
                .html
                .contains(r#"<input type="checkbox" checked disabled>"#)
        );
    }

    #[test]
    fn test_default_renderer() {
        let parser = Parser::new("Hello");
        let mut renderer = MarkdownRenderer::<HtmlBackend>::default();
        let result = renderer.render(parser);
        assert_eq!(result.html, "<p>Hello</p>");
    }

    #[test]
    fn test_renderer_reusable() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new();
        let first = renderer.render_markdown("## A\n\n> [!NOTE] x");
        let second = renderer.render_markdown("## A\n\n> [!NOTE] x");
        assert_eq!(first.html, second.html);
        assert_eq!(second.alert_count, 1);
        assert_eq!(second.headings[0].id, "a");
    }

    // Blockquote handler tests

    struct SpoilerHandler;

    impl BlockquoteHandler for SpoilerHandler {
        fn process(&mut self, first_line: &str) -> QuoteResult {
            match first_line.strip_prefix("[!SPOILER]") {
                Some(rest) => QuoteResult::Wrap {
                    open: "<details>".to_owned(),
                    close: "</details>".to_owned(),
                    rest: rest.trim_start().to_owned(),
                },
                None => QuoteResult::PassThrough,
            }
        }
    }

    struct ClaimEverything;

    impl BlockquoteHandler for ClaimEverything {
        fn process(&mut self, first_line: &str) -> QuoteResult {
            QuoteResult::Alert {
                kind: AlertKind::Caution,
                rest: first_line.to_owned(),
            }
        }
    }

    struct WarningHandler {
        warnings: Vec<String>,
    }

    impl BlockquoteHandler for WarningHandler {
        fn process(&mut self, _first_line: &str) -> QuoteResult {
            QuoteResult::PassThrough
        }

        fn warnings(&self) -> &[String] {
            &self.warnings
        }
    }

    #[test]
    fn test_custom_handler_wrap() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_blockquote_handler(SpoilerHandler)
            .render_markdown("> [!SPOILER]\n> The end");
        assert_eq!(result.html, "<details><p>The end</p></details>");
        assert_eq!(result.alert_count, 0);
    }

    #[test]
    fn test_custom_handler_passthrough_falls_back() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_blockquote_handler(SpoilerHandler)
            .render_markdown("> plain");
        assert_eq!(result.html, "<blockquote><p>plain</p></blockquote>");
    }

    #[test]
    fn test_handlers_checked_in_order() {
        // The built-in alert handler runs first and claims NOTE.
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_blockquote_handler(ClaimEverything)
            .render_markdown("> [!NOTE] first\n\n> other");
        assert!(result.html.contains("markdown-alert-note"));
        assert!(result.html.contains("🚨 CAUTION</div><p>other</p>"));
        assert_eq!(result.alert_count, 2);
    }

    #[test]
    fn test_render_result_includes_warnings() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_blockquote_handler(WarningHandler {
                warnings: vec!["warning 1".into(), "warning 2".into()],
            })
            .render_markdown("Hello");
        assert_eq!(result.warnings, ["warning 1", "warning 2"]);
    }

    #[test]
    fn test_render_result_empty_warnings_by_default() {
        let result = render_html("Hello");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_gfm_disabled() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_gfm(false);
        let result = renderer.render_markdown("| A | B |\n|---|---|\n| 1 | 2 |");
        assert!(!result.html.contains("<table>"));
    }

    #[test]
    fn test_parser_options_with_gfm() {
        let renderer = MarkdownRenderer::<HtmlBackend>::new();
        let options = renderer.parser_options();
        assert!(options.contains(Options::ENABLE_TABLES));
        assert!(options.contains(Options::ENABLE_STRIKETHROUGH));
        assert!(options.contains(Options::ENABLE_TASKLISTS));
        assert!(!options.contains(Options::ENABLE_GFM));
    }

    #[test]
    fn test_parser_options_without_gfm() {
        let renderer = MarkdownRenderer::<HtmlBackend>::new().with_gfm(false);
        assert_eq!(renderer.parser_options(), Options::empty());
    }
}
