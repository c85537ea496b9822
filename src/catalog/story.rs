//! Story definitions
//!
//! A story file describes one component and a list of named inputs to
//! render it with:
//!
//! ```yaml
//! title: PostList
//! component: post-list
//! stories:
//!   - name: Single post
//!     posts:
//!       - id: hello
//!         title: Hello
//!         date: 2020-06-01
//! ```

use chrono_tz::Tz;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::content::{parse_date_string, Post};

/// Errors raised while loading story files
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid story '{story}' in {path}: {message}")]
    InvalidStory {
        path: String,
        story: String,
        message: String,
    },
}

/// Component a story file exercises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComponentKind {
    PostList,
    Content,
}

#[derive(Debug, Deserialize)]
struct StoryFile {
    title: String,
    component: ComponentKind,
    #[serde(default)]
    stories: Vec<StoryDef>,
}

#[derive(Debug, Deserialize)]
struct StoryDef {
    name: String,
    #[serde(default)]
    posts: Vec<PostFixture>,
    markdown: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostFixture {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(deserialize_with = "date_text")]
    date: String,
    #[serde(default = "default_time_to_read", alias = "timeToRead")]
    time_to_read: u32,
    #[serde(alias = "featuredImage")]
    featured_image: Option<String>,
    #[serde(alias = "featuredImageAlt")]
    featured_image_alt: Option<String>,
}

fn default_time_to_read() -> u32 {
    1
}

/// Accepts a quoted date or a bare TOML date/datetime literal
fn date_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    match toml::Value::deserialize(deserializer)? {
        toml::Value::String(s) => Ok(s),
        toml::Value::Datetime(dt) => Ok(dt.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a date, found {}",
            other.type_str()
        ))),
    }
}

/// Input a story renders its component with
#[derive(Debug, Clone, PartialEq)]
pub enum StoryBody {
    PostList(Vec<Post>),
    Content(String),
}

/// A single registered story
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    /// Catalog group (the story file's title)
    pub group: String,
    pub name: String,
    pub source: PathBuf,
    pub body: StoryBody,
}

impl Story {
    /// Output path relative to the catalog root
    pub fn path(&self) -> String {
        format!("{}/{}.html", slug::slugify(&self.group), slug::slugify(&self.name))
    }
}

/// Parse every story in a story file
pub fn load_stories(path: &Path) -> Result<Vec<Story>, CatalogError> {
    let display = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
        path: display.clone(),
        source,
    })?;

    let file = parse_story_file(path, &content).map_err(|message| CatalogError::Parse {
        path: display.clone(),
        message,
    })?;

    file.stories
        .into_iter()
        .map(|def| {
            let invalid = |message: String| CatalogError::InvalidStory {
                path: display.clone(),
                story: def.name.clone(),
                message,
            };

            let body = match file.component {
                ComponentKind::PostList => StoryBody::PostList(
                    def.posts
                        .iter()
                        .map(|fixture| fixture.to_post().map_err(&invalid))
                        .collect::<Result<_, _>>()?,
                ),
                ComponentKind::Content => match &def.markdown {
                    Some(markdown) => StoryBody::Content(markdown.clone()),
                    None => return Err(invalid("content stories need `markdown`".to_string())),
                },
            };

            Ok(Story {
                group: file.title.clone(),
                name: def.name.clone(),
                source: path.to_path_buf(),
                body,
            })
        })
        .collect()
}

fn parse_story_file(path: &Path, content: &str) -> Result<StoryFile, String> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(content).map_err(|e| e.to_string()),
        Some("toml") => toml::from_str(content).map_err(|e| e.to_string()),
        _ => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    }
}

impl PostFixture {
    fn to_post(&self) -> Result<Post, String> {
        let created_at = parse_date_string(&self.date, Tz::UTC)
            .ok_or_else(|| format!("post '{}' has invalid date '{}'", self.id, self.date))?;

        let mut post = Post::new(self.id.clone(), self.title.clone(), created_at)
            .with_description(self.description.clone())
            .with_time_to_read(self.time_to_read);
        if let Some(image) = &self.featured_image {
            post = post.with_featured_image(image.clone(), self.featured_image_alt.clone());
        }
        Ok(post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_yaml_post_list_stories() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "list.stories.yml",
            r#"
title: PostList
component: post-list
stories:
  - name: Empty
  - name: With image
    posts:
      - id: hello
        title: Hello
        date: 2020-06-01
        timeToRead: 3
        featuredImage: /img/hello.png
"#,
        );

        let stories = load_stories(&path).unwrap();
        assert_eq!(stories.len(), 2);
        assert_eq!(stories[0].body, StoryBody::PostList(Vec::new()));
        assert_eq!(stories[1].path(), "postlist/with-image.html");
        match &stories[1].body {
            StoryBody::PostList(posts) => {
                assert_eq!(posts[0].time_to_read, 3);
                assert_eq!(posts[0].featured_image.as_deref(), Some("/img/hello.png"));
            }
            other => panic!("unexpected body {:?}", other),
        }
    }

    #[test]
    fn test_load_toml_and_json() {
        let dir = TempDir::new().unwrap();
        let toml_path = write(
            &dir,
            "content.stories.toml",
            "title = \"Content\"\ncomponent = \"content\"\n\n[[stories]]\nname = \"Heading\"\nmarkdown = \"# Hi\"\n",
        );
        let json_path = write(
            &dir,
            "content.stories.json",
            r#"{"title": "Content", "component": "content", "stories": [{"name": "Para", "markdown": "Hi"}]}"#,
        );

        let stories = load_stories(&toml_path).unwrap();
        assert_eq!(stories[0].body, StoryBody::Content("# Hi".to_string()));
        let stories = load_stories(&json_path).unwrap();
        assert_eq!(stories[0].name, "Para");
    }

    #[test]
    fn test_toml_bare_dates() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "list.stories.toml",
            r#"
title = "PostList"
component = "post-list"

[[stories]]
name = "Dated"

[[stories.posts]]
id = "day"
title = "Day"
date = 2020-06-01

[[stories.posts]]
id = "moment"
title = "Moment"
date = 2020-06-02T10:30:00Z
"#,
        );
        let stories = load_stories(&path).unwrap();
        let StoryBody::PostList(posts) = &stories[0].body else {
            panic!("expected a post list");
        };
        assert_eq!(posts[0].created_at.to_rfc3339(), "2020-06-01T00:00:00+00:00");
        assert_eq!(posts[1].created_at.to_rfc3339(), "2020-06-02T10:30:00+00:00");
    }

    #[test]
    fn test_non_date_fixture_value() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "n.stories.json",
            r#"{"title": "PostList", "component": "post-list", "stories": [{"name": "Num", "posts": [{"id": "x", "title": "X", "date": 7}]}]}"#,
        );
        assert!(matches!(load_stories(&path), Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn test_invalid_fixture_date() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "bad.stories.yml",
            "title: PostList\ncomponent: post-list\nstories:\n  - name: Bad\n    posts:\n      - {id: x, title: X, date: yesterday}\n",
        );
        let err = load_stories(&path).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidStory { ref story, .. } if story == "Bad"));
    }

    #[test]
    fn test_content_story_requires_markdown() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "c.stories.yml",
            "title: Content\ncomponent: content\nstories:\n  - name: Empty\n",
        );
        assert!(matches!(
            load_stories(&path),
            Err(CatalogError::InvalidStory { .. })
        ));
    }

    #[test]
    fn test_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "x.stories.yml", "title: [unclosed");
        assert!(matches!(load_stories(&path), Err(CatalogError::Parse { .. })));
    }
}
