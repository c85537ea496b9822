//! Scoped CSS primitives
//!
//! A [`Style`] is an ordered list of declarations. Later declarations for
//! the same property replace earlier ones, so a shared base can be included
//! first and specialised afterwards.

use indexmap::IndexMap;

/// Base rules every rendered page (and every story) carries.
/// `html { font-size: 62.5% }` makes `1rem` equal 10px for the content styles.
pub const GLOBAL_CSS: &str = r#"*, *::before, *::after { box-sizing: border-box; }
html { font-size: 62.5%; }
body { margin: 0; color: #333; font-size: 1.6rem; background: #fff; }
a { color: inherit; text-decoration: none; }
img { display: block; }
"#;

/// An ordered set of CSS declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    declarations: IndexMap<String, String>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property, replacing any previous value
    pub fn set(mut self, property: &str, value: impl Into<String>) -> Self {
        self.declarations
            .insert(property.to_string(), value.into());
        self
    }

    /// Mix in another style's declarations
    pub fn include(mut self, other: &Style) -> Self {
        for (property, value) in &other.declarations {
            self.declarations.insert(property.clone(), value.clone());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Render as a declaration block body (`a: b; c: d;`)
    pub fn to_css(&self) -> String {
        self.declarations
            .iter()
            .map(|(property, value)| format!("{}: {};", property, value))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A style bound to a generated class name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedStyle {
    pub class: String,
    pub style: Style,
}

impl ScopedStyle {
    pub fn new(scope: &str, name: &str, style: Style) -> Self {
        Self {
            class: format!("pf-{}-{}", scope, name),
            style,
        }
    }

    /// Render as a full CSS rule
    pub fn rule(&self) -> String {
        format!(".{} {{ {} }}", self.class, self.style.to_css())
    }
}

/// Collected rules for one stylesheet
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: IndexMap<String, ScopedStyle>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scoped: &ScopedStyle) {
        self.rules.insert(scoped.class.clone(), scoped.clone());
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for scoped in self.rules.values() {
            css.push_str(&scoped.rule());
            css.push('\n');
        }
        css
    }
}
