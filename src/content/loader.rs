//! Content loader - loads posts from the source directory

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::frontmatter::parse_date_string;
use super::{Article, FrontMatter, Post, PostError};
use crate::components::MarkdownRenderer;
use crate::helpers::{count_words, truncate};
use crate::Site;

/// Loads posts from `<source_dir>/_posts`
pub struct ContentLoader<'a> {
    site: &'a Site,
    tz: Tz,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Result<Self> {
        let tz = site.config.tz()?;
        Ok(Self { site, tz })
    }

    pub fn posts_dir(&self) -> std::path::PathBuf {
        self.site.source_dir.join("_posts")
    }

    /// Load all articles, newest first. Files that fail to load are logged
    /// and skipped.
    pub fn load_articles(&self) -> Result<Vec<Article>> {
        let posts_dir = self.posts_dir();
        if !posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut articles = Vec::new();

        for entry in WalkDir::new(&posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && is_markdown_file(path) {
                match self.load_article(path) {
                    Ok(article) => {
                        if article.published || self.site.config.render_drafts {
                            articles.push(article);
                        } else {
                            tracing::debug!("Skipping unpublished post {:?}", path);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load post {:?}: {}", path, e);
                    }
                }
            }
        }

        articles.sort_by(|a, b| b.post.created_at.cmp(&a.post.created_at));

        // Ids name output files; the newest post keeps a contested id
        let mut seen = HashSet::new();
        articles.retain(|article| {
            let fresh = seen.insert(article.post.id.clone());
            if !fresh {
                tracing::warn!(
                    "Skipping {}: id '{}' is already used by a newer post",
                    article.source,
                    article.post.id
                );
            }
            fresh
        });

        Ok(articles)
    }

    /// Post summaries in list order
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        Ok(self
            .load_articles()?
            .into_iter()
            .map(|article| article.post)
            .collect())
    }

    /// Load a single post from a file
    pub fn load_article(&self, path: &Path) -> Result<Article> {
        let content = fs::read_to_string(path)?;

        let source = path
            .strip_prefix(&self.site.source_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let (fm, body) = FrontMatter::parse(&content).map_err(|e| PostError::FrontMatter {
            path: source.clone(),
            message: e.to_string(),
        })?;

        let created_at = match &fm.date {
            Some(value) => {
                parse_date_string(value, self.tz).ok_or_else(|| PostError::InvalidDate {
                    value: value.clone(),
                    path: source.clone(),
                })?
            }
            None => file_modified(path)?,
        };

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let id = match fm.id.as_deref().map(str::trim) {
            Some(id) if is_safe_id(id) => id.to_string(),
            Some(id) if !id.is_empty() => {
                let slugged = slug::slugify(id);
                tracing::warn!("Post id '{}' in {} is not a file name, using '{}'", id, source, slugged);
                slugged
            }
            _ => slug::slugify(&stem),
        };
        if id.is_empty() {
            return Err(PostError::InvalidId {
                value: fm.id.clone().unwrap_or_default(),
                path: source,
            }
            .into());
        }
        let title = fm.title.clone().unwrap_or_else(|| stem.clone());

        let description = match &fm.description {
            Some(description) => description.clone(),
            None => derive_description(body, self.site.config.excerpt_length),
        };

        let time_to_read = fm.time_to_read.unwrap_or_else(|| {
            reading_time(
                count_words(&MarkdownRenderer::plain_text(body)),
                self.site.config.words_per_minute,
            )
        });

        let mut post = Post::new(id, title, created_at)
            .with_description(description)
            .with_time_to_read(time_to_read);
        if let Some(image) = fm.featured_image.clone() {
            post = post.with_featured_image(image, fm.featured_image_alt.clone());
        }

        Ok(Article {
            post,
            body: body.to_string(),
            source,
            full_source: path.to_path_buf(),
            published: fm.published,
            extra: fm.extra,
        })
    }
}

/// Excerpt before `<!-- more -->`, else the first paragraph, as plain text
pub fn derive_description(body: &str, length: usize) -> String {
    let text = match MarkdownRenderer::excerpt(body) {
        Some(excerpt) => MarkdownRenderer::plain_text(excerpt),
        None => MarkdownRenderer::first_paragraph(body).unwrap_or_default(),
    };
    truncate(&text, length, Some("…"))
}

/// Minutes to read `words` words, never less than one
pub fn reading_time(words: usize, words_per_minute: usize) -> u32 {
    let wpm = words_per_minute.max(1) as f64;
    ((words as f64 / wpm).round() as u32).max(1)
}

fn file_modified(path: &Path) -> Result<DateTime<FixedOffset>> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified).fixed_offset())
}

/// An id usable as a single file name under `posts/`
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && !id.contains('/')
        && !id.contains('\\')
        && !id.contains("..")
        && !id.starts_with('.')
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown" || e == "mdx")
        .unwrap_or(false)
}
