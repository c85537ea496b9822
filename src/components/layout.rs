//! Layout primitives
//!
//! Small building blocks in the styled-system manner: spacing and font
//! sizes are indices into the [`Theme`] scales, colors are theme paths such
//! as `black` or `gray.1`.

use indexmap::IndexMap;

use super::style::Style;
use super::{render_attrs, Props, RenderContext};
use crate::config::{ColorsConfig, SiteConfig};

/// Design scales resolved by the layout primitives
#[derive(Debug, Clone)]
pub struct Theme {
    pub space: Vec<u32>,
    pub font_sizes: Vec<u32>,
    pub fonts: IndexMap<String, String>,
    pub line_heights: IndexMap<String, String>,
    pub letter_spacings: IndexMap<String, String>,
    pub colors: ColorsConfig,
}

impl Theme {
    pub fn from_config(config: &SiteConfig) -> Self {
        let fonts = [
            ("body", "-apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, sans-serif"),
            ("robotoslab", "\"Roboto Slab\", Georgia, serif"),
            ("mono", "Menlo, Consolas, monospace"),
        ];
        let line_heights = [("solid", "1"), ("title", "1.25"), ("copy", "1.5")];
        let letter_spacings = [("normal", "normal"), ("tracked", "0.1em"), ("tight", "-0.05em")];

        Self {
            space: vec![0, 4, 8, 16, 32, 64, 128],
            font_sizes: vec![12, 14, 16, 20, 24, 32, 48, 64],
            fonts: to_map(&fonts),
            line_heights: to_map(&line_heights),
            letter_spacings: to_map(&letter_spacings),
            colors: config.colors.clone(),
        }
    }

    /// Space scale step in px; indices past the scale are taken as pixels
    pub fn space(&self, step: usize) -> String {
        px(self.space.get(step).copied().unwrap_or(step as u32))
    }

    pub fn font_size(&self, step: usize) -> String {
        px(self.font_sizes.get(step).copied().unwrap_or(step as u32))
    }

    /// Resolve a color path (`black`, `gray.1`, `header`); unknown values
    /// are used verbatim
    pub fn color(&self, path: &str) -> String {
        match path.split_once('.') {
            Some(("gray", index)) => index
                .parse::<usize>()
                .ok()
                .and_then(|i| self.colors.gray.get(i).cloned())
                .unwrap_or_else(|| path.to_string()),
            _ => match path {
                "black" => self.colors.black.clone(),
                "header" => self.colors.header.clone(),
                "link" => self.colors.link.clone(),
                other => other.to_string(),
            },
        }
    }

    fn lookup(map: &IndexMap<String, String>, key: &str) -> String {
        map.get(key).cloned().unwrap_or_else(|| key.to_string())
    }
}

fn to_map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn px(value: u32) -> String {
    if value == 0 {
        "0".to_string()
    } else {
        format!("{}px", value)
    }
}

/// Style props resolved against a theme
#[derive(Debug, Clone, Default)]
pub struct System {
    props: Vec<SystemProp>,
}

#[derive(Debug, Clone)]
enum SystemProp {
    MarginTop(usize),
    MarginRight(usize),
    MarginLeft(usize),
    FontSize(usize),
    FontWeight(String),
    FontFamily(String),
    LineHeight(String),
    LetterSpacing(String),
    Color(String),
    Raw(String, String),
}

impl System {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mt(self, step: usize) -> Self {
        self.push(SystemProp::MarginTop(step))
    }

    pub fn mr(self, step: usize) -> Self {
        self.push(SystemProp::MarginRight(step))
    }

    pub fn ml(self, step: usize) -> Self {
        self.push(SystemProp::MarginLeft(step))
    }

    pub fn font_size(self, step: usize) -> Self {
        self.push(SystemProp::FontSize(step))
    }

    pub fn font_weight(self, weight: &str) -> Self {
        self.push(SystemProp::FontWeight(weight.to_string()))
    }

    pub fn font_family(self, name: &str) -> Self {
        self.push(SystemProp::FontFamily(name.to_string()))
    }

    pub fn line_height(self, name: &str) -> Self {
        self.push(SystemProp::LineHeight(name.to_string()))
    }

    pub fn letter_spacing(self, name: &str) -> Self {
        self.push(SystemProp::LetterSpacing(name.to_string()))
    }

    pub fn color(self, path: &str) -> Self {
        self.push(SystemProp::Color(path.to_string()))
    }

    /// A literal CSS declaration (`display`, `width`, ...)
    pub fn css(self, property: &str, value: &str) -> Self {
        self.push(SystemProp::Raw(property.to_string(), value.to_string()))
    }

    fn push(mut self, prop: SystemProp) -> Self {
        self.props.push(prop);
        self
    }

    pub fn resolve(&self, theme: &Theme) -> Style {
        self.props.iter().fold(Style::new(), |style, prop| match prop {
            SystemProp::MarginTop(s) => style.set("margin-top", theme.space(*s)),
            SystemProp::MarginRight(s) => style.set("margin-right", theme.space(*s)),
            SystemProp::MarginLeft(s) => style.set("margin-left", theme.space(*s)),
            SystemProp::FontSize(s) => style.set("font-size", theme.font_size(*s)),
            SystemProp::FontWeight(w) => style.set("font-weight", w.clone()),
            SystemProp::FontFamily(f) => style.set("font-family", Theme::lookup(&theme.fonts, f)),
            SystemProp::LineHeight(l) => {
                style.set("line-height", Theme::lookup(&theme.line_heights, l))
            }
            SystemProp::LetterSpacing(l) => {
                style.set("letter-spacing", Theme::lookup(&theme.letter_spacings, l))
            }
            SystemProp::Color(c) => style.set("color", theme.color(c)),
            SystemProp::Raw(p, v) => style.set(p, v.clone()),
        })
    }
}

/// A layout primitive: tag, base class, base style and system props
#[derive(Debug, Clone)]
pub struct Primitive {
    tag: &'static str,
    class: &'static str,
    base: Style,
    system: System,
    attrs: Props,
}

impl Primitive {
    fn new(tag: &'static str, class: &'static str, base: Style) -> Self {
        Self {
            tag,
            class,
            base,
            system: System::new(),
            attrs: Props::new(),
        }
    }

    pub fn system(mut self, system: System) -> Self {
        self.system = system;
        self
    }

    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn render(&self, children: &str, ctx: &RenderContext<'_>) -> String {
        let style = self.base.clone().include(&self.system.resolve(ctx.theme));
        let mut props = Props::new();
        props.insert("class".to_string(), self.class.to_string());
        if !style.is_empty() {
            props.insert("style".to_string(), style.to_css());
        }
        for (key, value) in &self.attrs {
            props.insert(key.clone(), value.clone());
        }
        format!(
            "<{tag}{}>{}</{tag}>",
            render_attrs(&props),
            children,
            tag = self.tag
        )
    }
}

pub fn grid() -> Primitive {
    Primitive::new(
        "div",
        "pf-grid",
        Style::new().set("width", "100%").set("margin", "0 auto"),
    )
}

pub fn row() -> Primitive {
    Primitive::new(
        "div",
        "pf-row",
        Style::new().set("display", "flex").set("flex-wrap", "wrap"),
    )
}

/// A column `width` twelfths wide, shifted right by `left` twelfths
pub fn column(width: u8, left: u8) -> Primitive {
    let mut style = Style::new()
        .set("flex", format!("0 0 {}", percent(width)))
        .set("max-width", percent(width));
    if left > 0 {
        style = style.set("margin-left", percent(left));
    }
    Primitive::new("div", "pf-column", style)
}

fn percent(twelfths: u8) -> String {
    let value = f64::from(twelfths.min(12)) * 100.0 / 12.0;
    format!("{}%", (value * 10000.0).round() / 10000.0)
}

pub fn boxed() -> Primitive {
    Primitive::new("div", "pf-box", Style::new())
}

pub fn heading() -> Primitive {
    Primitive::new("h2", "pf-heading", Style::new().set("margin", "0"))
}

pub fn text() -> Primitive {
    Primitive::new("span", "pf-text", Style::new())
}

/// Vertical gap between blocks
pub fn spacer(step: usize) -> Primitive {
    Primitive::new("div", "pf-spacer", Style::new()).system(System::new().mt(step))
}

/// Internal link resolved through the router
pub fn link(to: &str, ctx: &RenderContext<'_>) -> Primitive {
    let href = ctx.router.resolve(to);
    ctx.router.enqueue(&href);
    Primitive::new("a", "pf-link", Style::new()).attr("href", href)
}
