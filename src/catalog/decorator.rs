//! Story decorators

use crate::components::style::GLOBAL_CSS;

/// Identifies the story being decorated
#[derive(Debug, Clone, Copy)]
pub struct StoryContext<'a> {
    pub group: &'a str,
    pub name: &'a str,
}

/// Wraps a rendered story
pub trait Decorator: Send + Sync {
    fn name(&self) -> &str;

    fn decorate(&self, story: &str, ctx: &StoryContext<'_>) -> String;
}

/// Centers the story in the viewport
#[derive(Debug, Default)]
pub struct Centered;

impl Decorator for Centered {
    fn name(&self) -> &str {
        "centered"
    }

    fn decorate(&self, story: &str, _ctx: &StoryContext<'_>) -> String {
        format!(
            concat!(
                r#"<div class="pf-centered" style="position: fixed; top: 0; left: 0; bottom: 0; right: 0; "#,
                r#"display: flex; align-items: center; overflow: auto;">"#,
                r#"<div style="margin: auto; max-height: 100%;">{}</div></div>"#
            ),
            story
        )
    }
}

/// Supplies the global rules and component styles every story relies on
#[derive(Debug, Default)]
pub struct GlobalDecorator {
    stylesheet: String,
}

impl GlobalDecorator {
    /// `stylesheet` is emitted after the global rules
    pub fn new(stylesheet: impl Into<String>) -> Self {
        Self {
            stylesheet: stylesheet.into(),
        }
    }
}

impl Decorator for GlobalDecorator {
    fn name(&self) -> &str {
        "global"
    }

    fn decorate(&self, story: &str, ctx: &StoryContext<'_>) -> String {
        format!(
            "<style>\n{}{}</style>\n<div class=\"pf-global\" data-story=\"{}\">{}</div>",
            GLOBAL_CSS,
            self.stylesheet,
            crate::helpers::html_escape(&format!("{}/{}", ctx.group, ctx.name)),
            story
        )
    }
}
