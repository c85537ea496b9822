//! HTML document shell

use crate::helpers::html_escape;

/// A complete HTML page around a rendered body
#[derive(Debug, Clone, Default)]
pub struct PageShell<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub language: &'a str,
    pub stylesheets: Vec<String>,
    /// Inline CSS placed in a `<style>` element
    pub inline_css: Option<&'a str>,
    pub body: &'a str,
}

impl<'a> PageShell<'a> {
    pub fn new(title: &'a str, body: &'a str) -> Self {
        Self {
            title,
            body,
            language: "en",
            ..Default::default()
        }
    }

    pub fn render(&self) -> String {
        let mut head = vec![
            r#"<meta charset="utf-8">"#.to_string(),
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#.to_string(),
            meta_generator(),
            format!("<title>{}</title>", html_escape(self.title)),
        ];
        if !self.description.is_empty() {
            head.push(format!(
                r#"<meta name="description" content="{}">"#,
                html_escape(self.description)
            ));
        }
        for href in &self.stylesheets {
            head.push(format!(r#"<link rel="stylesheet" href="{}">"#, href));
        }
        if let Some(css) = self.inline_css {
            head.push(format!("<style>\n{}</style>", css));
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"{}\">\n<head>\n{}\n</head>\n<body>\n{}\n</body>\n</html>\n",
            html_escape(self.language),
            head.join("\n"),
            self.body
        )
    }
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="postframe {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}
