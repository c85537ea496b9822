//! Post models

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::helpers::post_path;

/// Summary of a blog post, as shown in the post list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Identifier used in the post URL
    pub id: String,

    pub title: String,

    /// Plain text excerpt
    pub description: String,

    /// Publication time, in the author's timezone
    pub created_at: DateTime<FixedOffset>,

    /// Estimated reading time in minutes
    pub time_to_read: u32,

    /// Featured image reference (path or URL)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image_alt: Option<String>,
}

impl Post {
    /// Create a post with minimal required fields
    pub fn new(id: impl Into<String>, title: impl Into<String>, created_at: DateTime<FixedOffset>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            created_at,
            time_to_read: 1,
            featured_image: None,
            featured_image_alt: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_time_to_read(mut self, minutes: u32) -> Self {
        self.time_to_read = minutes;
        self
    }

    pub fn with_featured_image(mut self, src: impl Into<String>, alt: Option<String>) -> Self {
        self.featured_image = Some(src.into());
        self.featured_image_alt = alt;
        self
    }

    /// Site-relative URL of the post's detail page
    pub fn path(&self) -> String {
        post_path(&self.id)
    }
}

/// A post loaded from disk together with its Markdown body
#[derive(Debug, Clone)]
pub struct Article {
    pub post: Post,

    /// Markdown body without front-matter
    pub body: String,

    /// Source file path (relative to the source directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    pub published: bool,

    /// Custom front-matter fields
    pub extra: HashMap<String, serde_yaml::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date() -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2020, 6, 1, 9, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_post_path() {
        let post = Post::new("hello-world", "Hello", date());
        assert_eq!(post.path(), "/posts/hello-world.html");
    }

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "id": "a",
            "title": "A",
            "description": "d",
            "createdAt": "2020-06-01T09:00:00+00:00",
            "timeToRead": 4,
            "featuredImage": "/img/a.png"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.created_at, date());
        assert_eq!(post.time_to_read, 4);
        assert_eq!(post.featured_image.as_deref(), Some("/img/a.png"));
        assert_eq!(post.featured_image_alt, None);
    }
}
