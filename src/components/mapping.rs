//! Styled renderers for Markdown elements
//!
//! [`ElementMapping::standard`] associates each supported element name with
//! the renderer used inside a [`Content`](super::Content) frame. Elements
//! missing from the mapping render as plain tags.

use indexmap::IndexMap;

use super::style::{ScopedStyle, Style, StyleSheet};
use super::{render_attrs, Props, RenderContext};
use crate::config::ColorsConfig;

/// Element names the standard mapping covers
pub const ELEMENTS: [&str; 10] = [
    "wrapper", "a", "img", "pre", "code", "h1", "h2", "p", "ul", "ol",
];

const FONT_STACK: &str = r#"-apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, Oxygen, Ubuntu, Cantarell, "Fira Sans", "Droid Sans", "Helvetica Neue", Arial, sans-serif, "Apple Color Emoji", "Segoe UI Emoji", "Segoe UI Symbol""#;

/// Renders one kind of element
pub trait ElementRenderer: Send + Sync {
    /// Render the element around already-rendered `children`
    fn render(&self, props: &Props, children: &str, ctx: &RenderContext<'_>) -> String;

    /// Scoped style this renderer applies, if any
    fn style(&self) -> Option<&ScopedStyle> {
        None
    }
}

/// A plain HTML tag carrying a scoped class
pub struct StyledElement {
    tag: &'static str,
    scoped: ScopedStyle,
    void: bool,
}

impl StyledElement {
    pub fn new(tag: &'static str, name: &str, style: Style) -> Self {
        Self {
            tag,
            scoped: ScopedStyle::new("content", name, style),
            void: matches!(tag, "img" | "br" | "hr" | "input"),
        }
    }

    /// Props with the scoped class merged into any caller-supplied class
    fn with_class(&self, props: &Props) -> Props {
        let mut merged = Props::new();
        let class = match props.get("class") {
            Some(extra) if !extra.is_empty() => format!("{} {}", self.scoped.class, extra),
            _ => self.scoped.class.clone(),
        };
        merged.insert("class".to_string(), class);
        for (key, value) in props {
            if key != "class" {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }
}

impl ElementRenderer for StyledElement {
    fn render(&self, props: &Props, children: &str, _ctx: &RenderContext<'_>) -> String {
        let attrs = render_attrs(&self.with_class(props));
        if self.void {
            format!("<{}{} />", self.tag, attrs)
        } else {
            format!("<{tag}{}>{}</{tag}>", attrs, children, tag = self.tag)
        }
    }

    fn style(&self) -> Option<&ScopedStyle> {
        Some(&self.scoped)
    }
}

/// Anchor whose href goes through the router and which always opens in a
/// new browsing context
pub struct RouterLink {
    anchor: StyledElement,
}

impl RouterLink {
    pub fn new(style: Style) -> Self {
        Self {
            anchor: StyledElement::new("a", "a", style),
        }
    }
}

impl ElementRenderer for RouterLink {
    fn render(&self, props: &Props, children: &str, ctx: &RenderContext<'_>) -> String {
        let mut props = props.clone();
        if let Some(href) = props.get("href").cloned() {
            let resolved = ctx.router.resolve(&href);
            ctx.router.enqueue(&resolved);
            props.insert("href".to_string(), resolved);
        }
        props.shift_remove("target");
        props.insert("target".to_string(), "_blank".to_string());
        self.anchor.render(&props, children, ctx)
    }

    fn style(&self) -> Option<&ScopedStyle> {
        self.anchor.style()
    }
}

/// Fixed association from element name to renderer
pub struct ElementMapping {
    entries: IndexMap<&'static str, Box<dyn ElementRenderer>>,
}

impl ElementMapping {
    /// An empty mapping: every element renders as a plain tag
    pub fn empty() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// The content styles used for post bodies
    pub fn standard(colors: &ColorsConfig) -> Self {
        let heading = Style::new()
            .set("color", "#333")
            .set("font-weight", "500")
            .set("letter-spacing", "-0.0125rem")
            .set("margin-top", "20px")
            .set("margin-bottom", "10px");

        let list = Style::new()
            .set("margin", "0 10px")
            .set("padding", "0 10px")
            .set("list-style-position", "inside");

        let mut mapping = Self::empty();
        mapping.insert(
            "wrapper",
            StyledElement::new(
                "main",
                "wrapper",
                Style::new()
                    .set("font-size", "1.8rem")
                    .set("font-weight", "300")
                    .set("line-height", "1.5")
                    .set("font-family", FONT_STACK),
            ),
        );
        mapping.insert(
            "a",
            RouterLink::new(Style::new().set("color", format!("{} !important", colors.link))),
        );
        mapping.insert(
            "img",
            StyledElement::new("img", "img", Style::new().set("max-width", "100%")),
        );
        mapping.insert(
            "pre",
            StyledElement::new(
                "pre",
                "pre",
                Style::new()
                    .set("overflow", "scroll")
                    .set("max-height", "300px")
                    .set("padding", "10px")
                    .set("font-size", "1.6rem")
                    .set("border", "1px solid #ddd")
                    .set("border-radius", "3px"),
            ),
        );
        mapping.insert(
            "code",
            StyledElement::new("code", "code", Style::new().set("display", "block")),
        );
        mapping.insert(
            "h1",
            StyledElement::new(
                "h1",
                "h1",
                Style::new()
                    .include(&heading)
                    .set("color", colors.header.clone())
                    .set("font-size", "4rem"),
            ),
        );
        mapping.insert(
            "h2",
            StyledElement::new(
                "h2",
                "h2",
                Style::new().include(&heading).set("font-size", "2.6rem"),
            ),
        );
        mapping.insert(
            "p",
            StyledElement::new("p", "p", Style::new().set("margin", "25px 0")),
        );
        mapping.insert("ul", StyledElement::new("ul", "ul", Style::new().include(&list)));
        mapping.insert("ol", StyledElement::new("ol", "ol", Style::new().include(&list)));
        mapping
    }

    fn insert(&mut self, name: &'static str, renderer: impl ElementRenderer + 'static) {
        self.entries.insert(name, Box::new(renderer));
    }

    pub fn get(&self, name: &str) -> Option<&dyn ElementRenderer> {
        self.entries.get(name).map(|r| r.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.keys().copied()
    }

    /// Render `tag` through its mapping entry, or as a plain tag when the
    /// mapping has none
    pub fn render(
        &self,
        tag: &str,
        props: &Props,
        children: &str,
        ctx: &RenderContext<'_>,
    ) -> String {
        match self.get(tag) {
            Some(renderer) => renderer.render(props, children, ctx),
            None => render_plain(tag, props, children),
        }
    }

    /// Rules for every styled entry
    pub fn stylesheet(&self) -> StyleSheet {
        let mut sheet = StyleSheet::new();
        for renderer in self.entries.values() {
            if let Some(scoped) = renderer.style() {
                sheet.insert(scoped);
            }
        }
        sheet
    }
}

/// Render an unmapped element
pub(crate) fn render_plain(tag: &str, props: &Props, children: &str) -> String {
    let attrs = render_attrs(props);
    match tag {
        "img" | "br" | "hr" | "input" => format!("<{}{} />", tag, attrs),
        "wrapper" => children.to_string(),
        _ => format!("<{tag}{}>{}</{tag}>", attrs, children, tag = tag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::layout::Theme;
    use crate::config::SiteConfig;
    use crate::router::SiteRouter;

    fn props(pairs: &[(&str, &str)]) -> Props {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn mapping() -> ElementMapping {
        ElementMapping::standard(&ColorsConfig::default())
    }

    #[test]
    fn test_every_element_has_an_entry() {
        let mapping = mapping();
        for name in ELEMENTS {
            assert!(mapping.contains(name), "missing entry for {}", name);
        }
        assert_eq!(mapping.names().count(), ELEMENTS.len());
    }

    #[test]
    fn test_link_always_opens_in_new_context() {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);
        let mapping = mapping();

        for extra in [&[][..], &[("target", "_self")][..], &[("target", "")][..]] {
            let mut p = props(&[("href", "/about.html")]);
            for (k, v) in extra {
                p.insert(k.to_string(), v.to_string());
            }
            let html = mapping.render("a", &p, "About", &ctx);
            assert!(html.contains(r#"target="_blank""#), "{}", html);
            assert_eq!(html.matches("target=").count(), 1);
        }
    }

    #[test]
    fn test_link_resolves_through_router() {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::new("/blog");
        let ctx = RenderContext::new(&router, &theme);
        let html = mapping().render("a", &props(&[("href", "/posts/x.html")]), "x", &ctx);
        assert!(html.contains(r#"href="/blog/posts/x.html""#));
        assert!(html.starts_with(r#"<a class="pf-content-a""#));
    }

    #[test]
    fn test_props_pass_through() {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);
        let html = mapping().render(
            "img",
            &props(&[("src", "/a.png"), ("alt", "A \"quoted\" alt"), ("class", "wide")]),
            "",
            &ctx,
        );
        assert_eq!(
            html,
            r#"<img class="pf-content-img wide" src="/a.png" alt="A &quot;quoted&quot; alt" />"#
        );
    }

    #[test]
    fn test_unmapped_element_renders_plain() {
        let theme = Theme::from_config(&SiteConfig::default());
        let router = SiteRouter::default();
        let ctx = RenderContext::new(&router, &theme);
        let html = mapping().render("h3", &Props::new(), "Title", &ctx);
        assert_eq!(html, "<h3>Title</h3>");
    }

    #[test]
    fn test_stylesheet() {
        let css = ElementMapping::standard(&ColorsConfig {
            header: "#123456".to_string(),
            ..Default::default()
        })
        .stylesheet()
        .to_css();
        assert!(css.contains(".pf-content-h1 { color: #123456; font-weight: 500;"));
        assert!(css.contains("font-size: 4rem;"));
        assert!(css.contains(".pf-content-a { color: #0094FF !important; }"));
        assert!(css.contains(".pf-content-ul { margin: 0 10px; padding: 0 10px; list-style-position: inside; }"));
        assert!(css.contains(".pf-content-code { display: block; }"));
    }
}
