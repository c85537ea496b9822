//! Generator module - writes the static site

use anyhow::Result;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::components::layout::{self, System, Theme};
use crate::components::page::PageShell;
use crate::components::style::GLOBAL_CSS;
use crate::components::{Content, ElementMapping, MarkdownRenderer, PostListView, RenderContext};
use crate::content::{Article, Post};
use crate::helpers::{decode_path, html_escape, time_tag};
use crate::router::{RouterHooks, SiteRouter};
use crate::Site;

/// Site-relative path of the shared stylesheet
pub const STYLESHEET_PATH: &str = "/css/postframe.css";

/// Static site generator
pub struct Generator {
    site: Site,
    mapping: ElementMapping,
    markdown: MarkdownRenderer,
    theme: Theme,
    router: SiteRouter,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Self {
        let config = &site.config;
        Self {
            site: site.clone(),
            mapping: ElementMapping::standard(&config.colors),
            markdown: MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.enable),
            theme: Theme::from_config(config),
            router: SiteRouter::new(config.root.clone()),
        }
    }

    fn ctx(&self) -> RenderContext<'_> {
        RenderContext::new(&self.router, &self.theme)
    }

    /// Generate the entire site. `articles` are rendered in the given order.
    pub fn generate(&self, articles: &[Article]) -> Result<()> {
        fs::create_dir_all(&self.site.public_dir)?;

        self.copy_source_assets()?;
        self.write_stylesheet()?;

        let posts: Vec<Post> = articles.iter().map(|a| a.post.clone()).collect();
        self.generate_index(&posts)?;
        self.generate_post_pages(articles)?;
        self.generate_data_index(&posts)?;

        Ok(())
    }

    /// Stylesheet with the global rules and every content style
    pub fn stylesheet(&self) -> String {
        format!("{}{}", GLOBAL_CSS, self.mapping.stylesheet().to_css())
    }

    fn write_stylesheet(&self) -> Result<()> {
        let path = self.site.public_dir.join(STYLESHEET_PATH.trim_start_matches('/'));
        write_file(&path, &self.stylesheet())
    }

    fn page<'a>(&self, title: &'a str, description: &'a str, body: &'a str) -> PageShell<'a> {
        let mut page = PageShell::new(title, body);
        page.description = description;
        page.stylesheets.push(self.router.resolve(STYLESHEET_PATH));
        page
    }

    /// Render the post list page
    pub fn render_index(&self, posts: &[Post]) -> String {
        let ctx = self.ctx();
        let config = &self.site.config;

        let header = layout::heading()
            .system(System::new().font_size(5).color("header"))
            .render(&html_escape(&config.title), &ctx);
        let list = PostListView::new(posts)
            .with_date_format(&config.date_format)
            .render(&ctx);
        let body = layout::grid()
            .system(System::new().css("max-width", "960px").css("padding", "32px 16px"))
            .render(&format!("{}{}{}", header, layout::spacer(4).render("", &ctx), list), &ctx);

        self.page(&config.title, &config.description, &body).render()
    }

    fn generate_index(&self, posts: &[Post]) -> Result<()> {
        let html = self.render_index(posts);
        write_file(&self.site.public_dir.join("index.html"), &html)?;
        tracing::debug!("Generated index with {} posts", posts.len());
        Ok(())
    }

    /// Render a post detail page: header, then the body inside the content frame
    pub fn render_post(&self, article: &Article) -> String {
        let ctx = self.ctx();
        let post = &article.post;
        let config = &self.site.config;

        let back = layout::link("/", &ctx).render(&html_escape(&config.title), &ctx);
        let title = self
            .mapping
            .render("h1", &Default::default(), &html_escape(&post.title), &ctx);
        let meta = layout::boxed()
            .system(System::new().font_size(1).color("gray.1"))
            .render(
                &format!(
                    "{} | {} min read",
                    time_tag(&post.created_at, &config.date_format),
                    post.time_to_read
                ),
                &ctx,
            );
        let image = match &post.featured_image {
            Some(src) => {
                let mut props = crate::components::Props::new();
                props.insert("src".to_string(), self.router.resolve(src));
                props.insert(
                    "alt".to_string(),
                    post.featured_image_alt.clone().unwrap_or_default(),
                );
                self.mapping.render("img", &props, "", &ctx)
            }
            None => String::new(),
        };
        let content = Content::new(&self.mapping, &self.markdown).render_markdown(&article.body, &ctx);

        let body = layout::grid()
            .system(System::new().css("max-width", "760px").css("padding", "32px 16px"))
            .render(&format!("{}{}{}{}{}", back, title, meta, image, content), &ctx);

        self.page(&post.title, &post.description, &body).render()
    }

    fn generate_post_pages(&self, articles: &[Article]) -> Result<()> {
        for article in articles {
            let html = self.render_post(article);
            // Same segment the cards link to, as it appears on disk
            let relative = decode_path(&article.post.path());
            let path = self.site.public_dir.join(relative.trim_start_matches('/'));
            write_file(&path, &html)?;
            tracing::debug!("Generated {}", article.post.path());
        }
        Ok(())
    }

    /// Post summaries as JSON, for client-side consumers
    fn generate_data_index(&self, posts: &[Post]) -> Result<()> {
        let json = serde_json::to_string_pretty(posts)?;
        write_file(&self.site.public_dir.join("posts.json"), &json)
    }

    /// Copy non-post files (images, etc.) from the source directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            // Directories starting with `_` hold content, not assets
            let hidden = relative
                .components()
                .any(|c| c.as_os_str().to_string_lossy().starts_with('_'));
            if hidden {
                continue;
            }

            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }
}

pub(crate) fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use chrono::{FixedOffset, TimeZone};
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn article(id: &str, body: &str) -> Article {
        let created = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2020, 6, 1, 0, 0, 0)
            .unwrap();
        Article {
            post: Post::new(id, format!("Post {}", id), created).with_time_to_read(2),
            body: body.to_string(),
            source: format!("_posts/{}.md", id),
            full_source: format!("source/_posts/{}.md", id).into(),
            published: true,
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_generate_writes_pages() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        fs::create_dir_all(site.source_dir.join("images")).unwrap();
        fs::write(site.source_dir.join("images").join("a.png"), b"png").unwrap();

        let generator = Generator::new(&site);
        generator
            .generate(&[article("one", "# One\n\nBody one."), article("two", "Body two.")])
            .unwrap();

        let index = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(index.contains(r#"href="/posts/one.html""#));
        assert!(index.contains(r#"href="/posts/two.html""#));
        assert!(index.contains(r#"<link rel="stylesheet" href="/css/postframe.css">"#));

        let one = fs::read_to_string(site.public_dir.join("posts").join("one.html")).unwrap();
        assert!(one.contains(r#"<main class="pf-content-wrapper">"#));
        assert!(one.contains(r#"<time datetime="2020-06-01T00:00:00+00:00">Jun 1, 2020</time> | 2 min read"#));

        assert!(site.public_dir.join("css").join("postframe.css").exists());
        assert!(site.public_dir.join("images").join("a.png").exists());

        let data: Vec<Post> =
            serde_json::from_str(&fs::read_to_string(site.public_dir.join("posts.json")).unwrap())
                .unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].id, "one");
    }

    #[test]
    fn test_root_prefix_applies_to_links() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig {
            root: "/blog".to_string(),
            ..Default::default()
        };
        let site = Site::with_config(dir.path(), config);
        let html = Generator::new(&site).render_index(&[article("x", "").post]);
        assert!(html.contains(r#"href="/blog/posts/x.html""#));
        assert!(html.contains(r#"href="/blog/css/postframe.css""#));
    }

    #[test]
    fn test_stylesheet_contains_content_rules() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        let css = Generator::new(&site).stylesheet();
        assert!(css.starts_with("*, *::before"));
        assert!(css.contains(".pf-content-pre {"));
    }
}
