//! Presentational components
//!
//! Every component is a pure function of its inputs and a [`RenderContext`]
//! and returns an HTML fragment.

pub mod content;
pub mod layout;
pub mod mapping;
pub mod markdown;
pub mod page;
pub mod post_list;
pub mod style;

use indexmap::IndexMap;

use crate::helpers::html_escape;
use crate::router::RouterHooks;
use layout::Theme;

pub use content::Content;
pub use mapping::{ElementMapping, ElementRenderer};
pub use markdown::MarkdownRenderer;
pub use post_list::PostListView;

/// Attributes passed to an element, in insertion order
pub type Props = IndexMap<String, String>;

/// Ambient values shared by every component in a render pass
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    pub router: &'a dyn RouterHooks,
    pub theme: &'a Theme,
}

impl<'a> RenderContext<'a> {
    pub fn new(router: &'a dyn RouterHooks, theme: &'a Theme) -> Self {
        Self { router, theme }
    }
}

/// Render attributes as ` key="value"` pairs. Empty values render as bare
/// boolean attributes.
pub(crate) fn render_attrs(props: &Props) -> String {
    let mut out = String::new();
    for (key, value) in props {
        if value.is_empty() {
            out.push_str(&format!(" {}", key));
        } else {
            out.push_str(&format!(r#" {}="{}""#, key, html_escape(value)));
        }
    }
    out
}
