//! Markdown to HTML through an element mapping
//!
//! The parser's event stream is folded into a tree: every element collects
//! its rendered children and is then rendered by the mapping entry for its
//! name, or as a plain tag when there is none.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::html::{styled_line_to_highlighted_html, IncludeBackground};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

use super::mapping::ElementMapping;
use super::{Props, RenderContext};
use crate::helpers::{html_escape, strip_html};

/// Marker separating a post's excerpt from the rest of its body
pub const MORE_MARKER: &str = "<!-- more -->";

/// Markdown renderer with optional syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    highlight: bool,
}

/// An element whose children are still being collected
struct Frame {
    tag: &'static str,
    props: Props,
    children: String,
    kind: FrameKind,
}

enum FrameKind {
    Element,
    /// Children pass through without a surrounding tag
    Transparent,
    CodeBlock(Option<String>),
    Image,
    TableHead,
    TableRow,
}

impl Frame {
    fn new(tag: &'static str, props: Props, kind: FrameKind) -> Self {
        Self {
            tag,
            props,
            children: String::new(),
            kind,
        }
    }

    fn element(tag: &'static str) -> Self {
        Self::new(tag, Props::new(), FrameKind::Element)
    }
}

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_HEADING_ATTRIBUTES
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("InspiredGitHub", true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, highlight: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            highlight,
        }
    }

    /// Render markdown, translating elements through `mapping`
    pub fn render(&self, markdown: &str, mapping: &ElementMapping, ctx: &RenderContext<'_>) -> String {
        let mut stack = vec![Frame::new("root", Props::new(), FrameKind::Transparent)];
        let mut alignments: Vec<Alignment> = Vec::new();
        let mut cell_index = 0;
        // Depth of markup nested inside an image's alt text
        let mut alt_depth = 0usize;

        for event in Parser::new_ext(markdown, options()) {
            let in_image = matches!(stack.last().map(|f| &f.kind), Some(FrameKind::Image));

            match event {
                Event::Start(_) if in_image => alt_depth += 1,
                Event::End(_) if in_image && alt_depth > 0 => alt_depth -= 1,

                Event::Start(tag) => {
                    let frame = match tag {
                        Tag::Table(aligns) => {
                            alignments = aligns;
                            Frame::element("table")
                        }
                        Tag::TableHead => {
                            cell_index = 0;
                            Frame::new("thead", Props::new(), FrameKind::TableHead)
                        }
                        Tag::TableRow => {
                            cell_index = 0;
                            Frame::new("tr", Props::new(), FrameKind::TableRow)
                        }
                        Tag::TableCell => {
                            let in_head = stack
                                .iter()
                                .any(|f| matches!(f.kind, FrameKind::TableHead));
                            let mut props = Props::new();
                            if let Some(align) = alignments.get(cell_index).and_then(align_value) {
                                props.insert("style".to_string(), format!("text-align: {}", align));
                            }
                            cell_index += 1;
                            Frame::new(if in_head { "th" } else { "td" }, props, FrameKind::Element)
                        }
                        other => self.open(other),
                    };
                    stack.push(frame);
                }

                Event::End(_) => {
                    if stack.len() < 2 {
                        continue;
                    }
                    let Some(frame) = stack.pop() else { continue };
                    let html = self.close(frame, mapping, ctx);
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push_str(&html);
                    }
                }

                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        match top.kind {
                            FrameKind::CodeBlock(_) | FrameKind::Image => top.children.push_str(&text),
                            _ => top.children.push_str(&html_escape(&text)),
                        }
                    }
                }

                Event::Code(code) => {
                    if let Some(top) = stack.last_mut() {
                        if in_image {
                            top.children.push_str(&code);
                        } else {
                            let html = mapping.render("code", &Props::new(), &html_escape(&code), ctx);
                            top.children.push_str(&html);
                        }
                    }
                }

                Event::Html(html) | Event::InlineHtml(html) => {
                    if let Some(top) = stack.last_mut() {
                        if !in_image {
                            top.children.push_str(&html);
                        }
                    }
                }

                Event::FootnoteReference(label) => {
                    if let Some(top) = stack.last_mut() {
                        let id = slug::slugify(&label);
                        top.children.push_str(&format!(
                            r##"<sup class="footnote-reference"><a href="#fn-{}">{}</a></sup>"##,
                            id,
                            html_escape(&label)
                        ));
                    }
                }

                Event::TaskListMarker(checked) => {
                    if let Some(top) = stack.last_mut() {
                        let marker = if checked {
                            r#"<input type="checkbox" disabled checked /> "#
                        } else {
                            r#"<input type="checkbox" disabled /> "#
                        };
                        top.children.push_str(marker);
                    }
                }

                Event::SoftBreak => {
                    if let Some(top) = stack.last_mut() {
                        top.children.push(if in_image { ' ' } else { '\n' });
                    }
                }

                Event::HardBreak => {
                    if let Some(top) = stack.last_mut() {
                        top.children.push_str(if in_image { " " } else { "<br />\n" });
                    }
                }

                Event::Rule => {
                    if let Some(top) = stack.last_mut() {
                        top.children.push_str("<hr />\n");
                    }
                }

                _ => {}
            }
        }

        // Unbalanced input: fold whatever is still open
        while stack.len() > 1 {
            if let Some(frame) = stack.pop() {
                let html = self.close(frame, mapping, ctx);
                if let Some(parent) = stack.last_mut() {
                    parent.children.push_str(&html);
                }
            }
        }

        stack.pop().map(|root| root.children).unwrap_or_default()
    }

    fn open(&self, tag: Tag<'_>) -> Frame {
        match tag {
            Tag::Paragraph => Frame::element("p"),
            Tag::Heading {
                level,
                id,
                classes,
                attrs,
            } => {
                let mut props = Props::new();
                if let Some(id) = id {
                    props.insert("id".to_string(), id.to_string());
                }
                if !classes.is_empty() {
                    let classes: Vec<String> = classes.iter().map(|c| c.to_string()).collect();
                    props.insert("class".to_string(), classes.join(" "));
                }
                for (key, value) in attrs {
                    props.insert(key.to_string(), value.map(|v| v.to_string()).unwrap_or_default());
                }
                Frame::new(heading_tag(level), props, FrameKind::Element)
            }
            Tag::BlockQuote(_) => Frame::element("blockquote"),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|l| l.to_string())
                        .filter(|l| !l.is_empty()),
                    CodeBlockKind::Indented => None,
                };
                Frame::new("pre", Props::new(), FrameKind::CodeBlock(lang))
            }
            Tag::HtmlBlock => Frame::new("html", Props::new(), FrameKind::Transparent),
            Tag::List(Some(start)) => {
                let mut props = Props::new();
                if start != 1 {
                    props.insert("start".to_string(), start.to_string());
                }
                Frame::new("ol", props, FrameKind::Element)
            }
            Tag::List(None) => Frame::element("ul"),
            Tag::Item => Frame::element("li"),
            Tag::FootnoteDefinition(label) => {
                let mut props = Props::new();
                props.insert("class".to_string(), "footnote-definition".to_string());
                props.insert("id".to_string(), format!("fn-{}", slug::slugify(&label)));
                Frame::new("div", props, FrameKind::Element)
            }
            Tag::Emphasis => Frame::element("em"),
            Tag::Strong => Frame::element("strong"),
            Tag::Strikethrough => Frame::element("del"),
            Tag::Link {
                dest_url, title, ..
            } => {
                let mut props = Props::new();
                props.insert("href".to_string(), dest_url.to_string());
                if !title.is_empty() {
                    props.insert("title".to_string(), title.to_string());
                }
                Frame::new("a", props, FrameKind::Element)
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut props = Props::new();
                props.insert("src".to_string(), dest_url.to_string());
                if !title.is_empty() {
                    props.insert("title".to_string(), title.to_string());
                }
                Frame::new("img", props, FrameKind::Image)
            }
            _ => Frame::new("span", Props::new(), FrameKind::Transparent),
        }
    }

    fn close(&self, frame: Frame, mapping: &ElementMapping, ctx: &RenderContext<'_>) -> String {
        match frame.kind {
            FrameKind::Transparent => frame.children,
            FrameKind::TableHead => format!("<thead><tr>{}</tr></thead>\n", frame.children),
            FrameKind::TableRow => format!("<tr>{}</tr>\n", frame.children),
            FrameKind::Image => {
                let mut props = frame.props;
                let src = props.shift_remove("src").unwrap_or_default();
                let mut ordered = Props::new();
                ordered.insert("src".to_string(), src);
                ordered.insert("alt".to_string(), strip_html(&frame.children));
                ordered.extend(props);
                mapping.render("img", &ordered, "", ctx)
            }
            FrameKind::CodeBlock(lang) => {
                let code = self.highlight_code(&frame.children, lang.as_deref());
                let mut code_props = Props::new();
                if let Some(lang) = &lang {
                    code_props.insert("class".to_string(), format!("language-{}", lang));
                }
                let code = mapping.render("code", &code_props, &code, ctx);
                format!("{}\n", mapping.render("pre", &frame.props, &code, ctx))
            }
            FrameKind::Element => {
                let html = mapping.render(frame.tag, &frame.props, &frame.children, ctx);
                if is_block(frame.tag) {
                    format!("{}\n", html)
                } else {
                    html
                }
            }
        }
    }

    /// Highlight a code block with inline styles, falling back to escaped text
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        if !self.highlight {
            return html_escape(code);
        }

        let syntax = lang
            .and_then(|lang| {
                self.syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            })
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());
        let Some(theme) = theme else {
            return html_escape(code);
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut html = String::with_capacity(code.len() * 2);
        for line in LinesWithEndings::from(code) {
            let highlighted = highlighter
                .highlight_line(line, &self.syntax_set)
                .and_then(|regions| styled_line_to_highlighted_html(&regions[..], IncludeBackground::No));
            match highlighted {
                Ok(line_html) => html.push_str(&line_html),
                Err(e) => {
                    tracing::debug!("Highlighting failed, using plain text: {}", e);
                    return html_escape(code);
                }
            }
        }
        html
    }

    /// Plain text of a markdown fragment, with block boundaries as spaces
    pub fn plain_text(markdown: &str) -> String {
        let mut text = String::new();
        for event in Parser::new_ext(markdown, options()) {
            match event {
                Event::Text(t) | Event::Code(t) => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak => text.push(' '),
                Event::End(TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item) => text.push(' '),
                _ => {}
            }
        }
        text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Plain text of the first paragraph
    pub fn first_paragraph(markdown: &str) -> Option<String> {
        let mut text = String::new();
        let mut in_paragraph = false;
        for event in Parser::new_ext(markdown, options()) {
            match event {
                Event::Start(Tag::Paragraph) => in_paragraph = true,
                Event::End(TagEnd::Paragraph) if in_paragraph => break,
                Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
                Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
                _ => {}
            }
        }
        let text = text.trim().to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    /// Source text before `<!-- more -->`, if the marker is present
    pub fn excerpt(content: &str) -> Option<&str> {
        content.find(MORE_MARKER).map(|pos| content[..pos].trim())
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn align_value(align: &Alignment) -> Option<&'static str> {
    match align {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}

fn is_block(tag: &str) -> bool {
    matches!(
        tag,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "ul" | "ol" | "li" | "table" | "div"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layout::Theme;
    use crate::config::{ColorsConfig, SiteConfig};
    use crate::router::SiteRouter;

    fn render(markdown: &str, mapping: &ElementMapping) -> String {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);
        MarkdownRenderer::with_options("InspiredGitHub", false).render(markdown, mapping, &ctx)
    }

    #[test]
    fn test_render_plain_without_mapping() {
        let html = render("# Hello World\n\nThis is a test.", &ElementMapping::empty());
        assert!(html.contains("<h1>Hello World</h1>"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_render_through_mapping() {
        let mapping = ElementMapping::standard(&ColorsConfig::default());
        let html = render(
            "# Title\n\n## Section\n\n### Minor\n\nSome *text* with [a link](/about.html).\n\n- one\n- two\n\n1. first\n",
            &mapping,
        );
        assert!(html.contains(r#"<h1 class="pf-content-h1">Title</h1>"#));
        assert!(html.contains(r#"<h2 class="pf-content-h2">Section</h2>"#));
        assert!(html.contains("<h3>Minor</h3>"));
        assert!(html.contains(r#"<p class="pf-content-p">Some <em>text</em> with "#));
        assert!(html.contains(
            r#"<a class="pf-content-a" href="/about.html" target="_blank">a link</a>"#
        ));
        assert!(html.contains(r#"<ul class="pf-content-ul">"#));
        assert!(html.contains(r#"<ol class="pf-content-ol">"#));
        assert!(html.contains("<li>one</li>"));
    }

    #[test]
    fn test_code_block_uses_pre_and_code() {
        let mapping = ElementMapping::standard(&ColorsConfig::default());
        let html = render("```rust\nfn main() { 1 < 2; }\n```", &mapping);
        assert!(html.contains(r#"<pre class="pf-content-pre"><code class="pf-content-code language-rust">"#));
        assert!(html.contains("fn main() { 1 &lt; 2; }"));
    }

    #[test]
    fn test_code_block_highlighted() {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);
        let html = MarkdownRenderer::new().render("```rust\nfn main() {}\n```", &ElementMapping::empty(), &ctx);
        assert!(html.contains("<span style="));
        assert!(html.contains(r#"<code class="language-rust">"#));
    }

    #[test]
    fn test_inline_code_and_image() {
        let mapping = ElementMapping::standard(&ColorsConfig::default());
        let html = render("Use `x & y` here.\n\n![A *cat* & dog](/cat.png \"Cat\")", &mapping);
        assert!(html.contains(r#"<code class="pf-content-code">x &amp; y</code>"#));
        assert!(html.contains(
            r#"<img class="pf-content-img" src="/cat.png" alt="A cat &amp; dog" title="Cat" />"#
        ));
    }

    #[test]
    fn test_ordered_list_start() {
        let html = render("3. three\n4. four\n", &ElementMapping::empty());
        assert!(html.contains(r#"<ol start="3">"#));
    }

    #[test]
    fn test_table() {
        let html = render("| a | b |\n|:--|--:|\n| 1 | 2 |\n", &ElementMapping::empty());
        assert!(html.contains(r#"<thead><tr><th style="text-align: left">a</th>"#));
        assert!(html.contains(r#"<td style="text-align: right">2</td>"#));
    }

    #[test]
    fn test_plain_text_and_first_paragraph() {
        let md = "# Title\n\nFirst *para*\ncontinues.\n\nSecond.";
        assert_eq!(
            MarkdownRenderer::plain_text(md),
            "Title First para continues. Second."
        );
        assert_eq!(
            MarkdownRenderer::first_paragraph(md),
            Some("First para continues.".to_string())
        );
        assert_eq!(MarkdownRenderer::first_paragraph("# Only"), None);
    }

    #[test]
    fn test_excerpt() {
        let content = "This is excerpt.\n<!-- more -->\nThis is more content.";
        assert_eq!(MarkdownRenderer::excerpt(content), Some("This is excerpt."));
        assert_eq!(MarkdownRenderer::excerpt("No marker"), None);
    }

    #[test]
    fn test_more_marker_is_not_rendered_as_text() {
        let html = render("Intro.\n\n<!-- more -->\n\nRest.", &ElementMapping::empty());
        assert!(html.contains("<p>Intro.</p>"));
        assert!(html.contains("<p>Rest.</p>"));
        assert!(!html.contains("&lt;!--"));
    }
}
