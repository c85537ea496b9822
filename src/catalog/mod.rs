//! Story catalog for developing components in isolation
//!
//! [`Catalog::configure`] discovers every story file under the stories
//! root, registers its stories, applies the [`Centered`] and
//! [`GlobalDecorator`] decorators to all of them and renders links through
//! a [`MockRouter`], so components that link into the site work without the
//! rest of the site.

mod decorator;
mod mock;
mod story;

pub use decorator::{Centered, Decorator, GlobalDecorator, StoryContext};
pub use mock::{Action, MockRouter, NAVIGATE_ACTION};
pub use story::{load_stories, CatalogError, ComponentKind, Story, StoryBody};

use anyhow::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

use crate::components::layout::Theme;
use crate::components::page::PageShell;
use crate::components::{Content, ElementMapping, MarkdownRenderer, PostListView, RenderContext};
use crate::config::SiteConfig;
use crate::generator::write_file;
use crate::helpers::html_escape;

lazy_static! {
    /// Files registered as story definitions
    static ref STORY_FILE: Regex = Regex::new(r"\.stories\.(ya?ml|json|toml)$").unwrap();
}

/// Intercepts link clicks and reports them to the server as navigation
const NAVIGATE_SCRIPT: &str = r#"<script>
document.addEventListener('click', function (event) {
    var link = event.target.closest('a[href]');
    if (!link) return;
    event.preventDefault();
    fetch('/__navigate?path=' + encodeURIComponent(link.getAttribute('href')));
});
</script>"#;

/// Registered stories and the decorators applied to them
pub struct Catalog {
    stories: Vec<Story>,
    decorators: Vec<Box<dyn Decorator>>,
    router: Arc<MockRouter>,
    mapping: ElementMapping,
    markdown: MarkdownRenderer,
    theme: Theme,
    date_format: String,
}

impl Catalog {
    /// An empty catalog with no decorators
    pub fn new(config: &SiteConfig, router: Arc<MockRouter>) -> Self {
        Self {
            stories: Vec::new(),
            decorators: Vec::new(),
            router,
            mapping: ElementMapping::standard(&config.colors),
            markdown: MarkdownRenderer::with_options(&config.highlight.theme, config.highlight.enable),
            theme: Theme::from_config(config),
            date_format: config.date_format.clone(),
        }
    }

    /// Discover and register every story under `root`, then install the
    /// standard decorators. Story files that fail to load are logged and
    /// skipped.
    pub fn configure(root: &Path, config: &SiteConfig, router: Arc<MockRouter>) -> Self {
        let mut catalog = Self::new(config, router);

        for path in discover(root) {
            if let Err(e) = catalog.load(&path) {
                tracing::warn!("Skipping story file: {}", e);
            }
        }

        let stylesheet = catalog.mapping.stylesheet().to_css();
        catalog.add_decorator(Centered);
        catalog.add_decorator(GlobalDecorator::new(stylesheet));

        tracing::info!(
            "Registered {} stories from {:?}",
            catalog.stories.len(),
            root
        );
        catalog
    }

    /// Register the stories of one file
    pub fn load(&mut self, path: &Path) -> Result<usize, CatalogError> {
        let stories = load_stories(path)?;
        let count = stories.len();
        for story in stories {
            self.register(story);
        }
        tracing::debug!("Loaded {} stories from {:?}", count, path);
        Ok(count)
    }

    pub fn register(&mut self, story: Story) {
        self.stories.push(story);
    }

    /// Decorators wrap in registration order: the first added is innermost
    pub fn add_decorator(&mut self, decorator: impl Decorator + 'static) {
        self.decorators.push(Box::new(decorator));
    }

    pub fn stories(&self) -> &[Story] {
        &self.stories
    }

    pub fn decorators(&self) -> impl Iterator<Item = &str> {
        self.decorators.iter().map(|d| d.name())
    }

    /// Render the story's component without decorators
    pub fn render_component(&self, story: &Story) -> String {
        let ctx = RenderContext::new(&*self.router, &self.theme);
        match &story.body {
            StoryBody::PostList(posts) => PostListView::new(posts)
                .with_date_format(&self.date_format)
                .render(&ctx),
            StoryBody::Content(markdown) => {
                Content::new(&self.mapping, &self.markdown).render_markdown(markdown, &ctx)
            }
        }
    }

    /// Render the story with every decorator applied
    pub fn render_story(&self, story: &Story) -> String {
        let ctx = StoryContext {
            group: &story.group,
            name: &story.name,
        };
        self.decorators
            .iter()
            .fold(self.render_component(story), |html, decorator| {
                decorator.decorate(&html, &ctx)
            })
    }

    /// Full page for one story
    pub fn story_page(&self, story: &Story) -> String {
        let title = format!("{} / {}", story.group, story.name);
        let body = format!("{}\n{}", self.render_story(story), NAVIGATE_SCRIPT);
        PageShell::new(&title, &body).render()
    }

    /// Catalog index listing every story by group
    pub fn index_page(&self) -> String {
        let mut body = String::from("<nav class=\"pf-catalog\">\n<h1>Stories</h1>\n");
        let mut current_group: Option<&str> = None;

        for story in &self.stories {
            if current_group != Some(story.group.as_str()) {
                if current_group.is_some() {
                    body.push_str("</ul>\n");
                }
                body.push_str(&format!("<h2>{}</h2>\n<ul>\n", html_escape(&story.group)));
                current_group = Some(story.group.as_str());
            }
            body.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>\n",
                story.path(),
                html_escape(&story.name)
            ));
        }
        if current_group.is_some() {
            body.push_str("</ul>\n");
        }
        body.push_str("</nav>");

        PageShell::new("Stories", &body).render()
    }

    /// Write the index and one page per story under `out_dir`
    pub fn write(&self, out_dir: &Path) -> Result<()> {
        if out_dir.exists() {
            fs::remove_dir_all(out_dir)?;
        }
        write_file(&out_dir.join("index.html"), &self.index_page())?;
        for story in &self.stories {
            write_file(&out_dir.join(story.path()), &self.story_page(story))?;
        }
        Ok(())
    }
}

/// Story files under `root`, in path order
pub fn discover(root: &Path) -> Vec<PathBuf> {
    if !root.exists() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| STORY_FILE.is_match(&e.file_name().to_string_lossy()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

fn is_ignored(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    entry.depth() > 0
        && entry.file_type().is_dir()
        && (name.starts_with('.') || name == "target" || name == "node_modules")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const LIST_STORIES: &str = r#"
title: PostList
component: post-list
stories:
  - name: Empty
  - name: Two posts
    posts:
      - {id: first, title: First, date: 2020-06-01}
      - {id: second, title: Second, date: 2020-06-02, featured_image: /img/2.png}
"#;

    const CONTENT_STORIES: &str = r#"
title: Content
component: content
stories:
  - name: Link
    markdown: "See [the post](/posts/first.html)."
"#;

    fn stories_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("components").join("list")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules")).unwrap();
        fs::write(
            dir.path().join("components").join("list").join("PostList.stories.yml"),
            LIST_STORIES,
        )
        .unwrap();
        fs::write(dir.path().join("Content.stories.yaml"), CONTENT_STORIES).unwrap();
        fs::write(dir.path().join("notes.yml"), "title: not a story").unwrap();
        fs::write(
            dir.path().join("node_modules").join("Dep.stories.yml"),
            LIST_STORIES,
        )
        .unwrap();
        fs::write(dir.path().join("Broken.stories.yml"), "title: [").unwrap();
        dir
    }

    fn catalog(dir: &TempDir) -> Catalog {
        Catalog::configure(dir.path(), &SiteConfig::default(), Arc::new(MockRouter::new()))
    }

    #[test]
    fn test_discover_matches_story_files_recursively() {
        let dir = stories_dir();
        let names: Vec<String> = discover(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec!["Broken.stories.yml", "Content.stories.yaml", "PostList.stories.yml"]
        );
    }

    #[test]
    fn test_configure_registers_and_decorates() {
        let dir = stories_dir();
        let catalog = catalog(&dir);

        // The broken file is skipped
        assert_eq!(catalog.stories().len(), 3);
        assert_eq!(catalog.decorators().collect::<Vec<_>>(), vec!["centered", "global"]);
    }

    #[test]
    fn test_every_story_is_decorated() {
        let dir = stories_dir();
        let catalog = catalog(&dir);
        for story in catalog.stories() {
            let html = catalog.render_story(story);
            // Global wraps centered, which wraps the component
            assert!(html.starts_with("<style>"), "{}", story.name);
            let global = html.find("pf-global").unwrap();
            let centered = html.find("pf-centered").unwrap();
            assert!(global < centered);
        }
    }

    #[test]
    fn test_post_list_story_renders_cards() {
        let dir = stories_dir();
        let catalog = catalog(&dir);
        let story = catalog
            .stories()
            .iter()
            .find(|s| s.name == "Two posts")
            .unwrap();
        let html = catalog.render_component(story);
        assert_eq!(html.matches(r#"data-role="post-card""#).count(), 2);
        assert_eq!(html.matches(r#"data-role="separator""#).count(), 1);
        assert!(html.contains(r#"href="/posts/first.html""#));
        assert!(html.contains("Jun 2, 2020"));
    }

    #[test]
    fn test_links_render_without_site_prefix() {
        let dir = stories_dir();
        let config = SiteConfig {
            root: "/blog".to_string(),
            ..Default::default()
        };
        let catalog = Catalog::configure(dir.path(), &config, Arc::new(MockRouter::new()));
        let story = catalog.stories().iter().find(|s| s.name == "Link").unwrap();
        let html = catalog.render_component(story);
        assert!(html.contains(r#"href="/posts/first.html""#));
        assert!(html.contains(r#"target="_blank""#));
    }

    #[test]
    fn test_write_catalog() {
        let dir = stories_dir();
        let out = TempDir::new().unwrap();
        let catalog = catalog(&dir);
        catalog.write(out.path()).unwrap();

        let index = fs::read_to_string(out.path().join("index.html")).unwrap();
        assert!(index.contains(r#"<a href="postlist/two-posts.html">Two posts</a>"#));
        assert!(index.contains("<h2>Content</h2>"));

        let page = fs::read_to_string(out.path().join("postlist").join("empty.html")).unwrap();
        assert!(page.contains("/__navigate?path="));
        assert!(out.path().join("content").join("link.html").exists());
    }

    #[test]
    fn test_missing_root() {
        let dir = TempDir::new().unwrap();
        assert!(discover(&dir.path().join("nope")).is_empty());
    }
}
