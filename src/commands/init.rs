//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use super::new::DEFAULT_SCAFFOLD;

const CONFIG: &str = r#"# Site
title: Postframe
description: ''
author: ''
language: en
timezone: ''

# URL
url: http://example.com
root: ''

# Directory
source_dir: source
public_dir: public
stories_dir: stories

# Writing
render_drafts: false
date_format: MMM D, YYYY
words_per_minute: 265
excerpt_length: 140
highlight:
  enable: true
  theme: InspiredGitHub

# Colors
colors:
  header: '#1b1b1b'
  link: '#0094FF'
"#;

const POST_LIST_STORIES: &str = include_str!("../../stories/post_list.stories.yml");
const CONTENT_STORIES: &str = include_str!("../../stories/content.stories.yml");

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    if target_dir.join("_config.yml").exists() {
        anyhow::bail!("A site already exists in {:?}", target_dir);
    }

    fs::create_dir_all(target_dir.join("source").join("_posts"))?;
    fs::create_dir_all(target_dir.join("scaffolds"))?;
    fs::create_dir_all(target_dir.join("stories"))?;

    fs::write(target_dir.join("_config.yml"), CONFIG)?;
    fs::write(target_dir.join("scaffolds").join("post.md"), DEFAULT_SCAFFOLD)?;
    fs::write(
        target_dir.join("stories").join("post_list.stories.yml"),
        POST_LIST_STORIES,
    )?;
    fs::write(
        target_dir.join("stories").join("content.stories.yml"),
        CONTENT_STORIES,
    )?;

    let now = chrono::Local::now();
    let sample_post = format!(
        r#"---
id: hello-world
title: Hello World
date: {}
---

Welcome to your new blog. This post lives in `source/_posts/hello-world.md`.

<!-- more -->

## Quick Start

### Create a new post

```bash
$ postframe new "My New Post"
```

### Run the server

```bash
$ postframe server
```

### Browse the component catalog

```bash
$ postframe server --catalog
```
"#,
        now.format("%Y-%m-%d %H:%M:%S")
    );

    fs::write(
        target_dir.join("source").join("_posts").join("hello-world.md"),
        sample_post,
    )?;

    tracing::info!("Initialized site in {:?}", target_dir);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, load_stories};
    use crate::content::loader::ContentLoader;
    use crate::Site;
    use tempfile::TempDir;

    #[test]
    fn test_init_creates_loadable_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();

        let site = Site::new(dir.path()).unwrap();
        assert_eq!(site.config.title, "Postframe");
        assert_eq!(site.config.colors.link, "#0094FF");

        let posts = ContentLoader::new(&site).unwrap().load_posts().unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "hello-world");
        assert_eq!(
            posts[0].description,
            "Welcome to your new blog. This post lives in source/_posts/hello-world.md."
        );

        let files = catalog::discover(&site.stories_dir);
        assert_eq!(files.len(), 2);
        for file in files {
            assert!(!load_stories(&file).unwrap().is_empty());
        }
    }

    #[test]
    fn test_init_refuses_existing_site() {
        let dir = TempDir::new().unwrap();
        init_site(dir.path()).unwrap();
        assert!(init_site(dir.path()).is_err());
    }
}
