//! Content frame for post bodies

use super::mapping::ElementMapping;
use super::markdown::MarkdownRenderer;
use super::{Props, RenderContext};

/// Wraps nested content so that every mapped element renders through the
/// frame's [`ElementMapping`]
pub struct Content<'a> {
    mapping: &'a ElementMapping,
    markdown: &'a MarkdownRenderer,
}

impl<'a> Content<'a> {
    pub fn new(mapping: &'a ElementMapping, markdown: &'a MarkdownRenderer) -> Self {
        Self { mapping, markdown }
    }

    /// Wrap already-rendered children unchanged
    pub fn render(&self, children: &str, ctx: &RenderContext<'_>) -> String {
        self.mapping.render("wrapper", &Props::new(), children, ctx)
    }

    /// Render markdown children through the mapping, inside the wrapper
    pub fn render_markdown(&self, markdown: &str, ctx: &RenderContext<'_>) -> String {
        let children = self.markdown.render(markdown, self.mapping, ctx);
        self.render(&children, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layout::Theme;
    use crate::config::{ColorsConfig, SiteConfig};
    use crate::router::SiteRouter;

    #[test]
    fn test_children_pass_through_unchanged() {
        let mapping = ElementMapping::standard(&ColorsConfig::default());
        let markdown = MarkdownRenderer::with_options("InspiredGitHub", false);
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);

        let html = Content::new(&mapping, &markdown).render("<span>raw</span>", &ctx);
        assert_eq!(html, r#"<main class="pf-content-wrapper"><span>raw</span></main>"#);
    }

    #[test]
    fn test_descendants_use_mapping() {
        let mapping = ElementMapping::standard(&ColorsConfig::default());
        let markdown = MarkdownRenderer::with_options("InspiredGitHub", false);
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);

        let html = Content::new(&mapping, &markdown)
            .render_markdown("> quoted [link](https://example.com)", &ctx);
        assert!(html.starts_with(r#"<main class="pf-content-wrapper">"#));
        assert!(html.contains("<blockquote>"));
        assert!(html.contains(
            r#"<a class="pf-content-a" href="https://example.com" target="_blank">link</a>"#
        ));
    }

    #[test]
    fn test_link_hrefs_only_prefix_root_relative() {
        let mapping = ElementMapping::standard(&ColorsConfig::default());
        let markdown = MarkdownRenderer::with_options("InspiredGitHub", false);
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::new("/blog");
        let ctx = RenderContext::new(&router, &theme);

        let html = Content::new(&mapping, &markdown).render_markdown(
            "[n](other.html) [t](tel:123) [q](?page=2) [r](/posts/a.html)",
            &ctx,
        );
        assert!(html.contains(r#"href="other.html""#));
        assert!(html.contains(r#"href="tel:123""#));
        assert!(html.contains(r#"href="?page=2""#));
        assert!(html.contains(r#"href="/blog/posts/a.html""#));
    }

    #[test]
    fn test_empty_mapping_has_no_wrapper() {
        let mapping = ElementMapping::empty();
        let markdown = MarkdownRenderer::with_options("InspiredGitHub", false);
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);

        let html = Content::new(&mapping, &markdown).render_markdown("Hi", &ctx);
        assert_eq!(html, "<p>Hi</p>\n");
    }
}
