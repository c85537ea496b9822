//! List site content

use anyhow::Result;

use crate::catalog::{self, load_stories};
use crate::content::loader::ContentLoader;
use crate::helpers::format_date;
use crate::Site;

/// List posts or stories
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let articles = ContentLoader::new(site)?.load_articles()?;
            println!("Posts ({}):", articles.len());
            for article in articles {
                println!(
                    "  {} - {} ({} min read) [{}]",
                    format_date(&article.post.created_at, "YYYY-MM-DD"),
                    article.post.title,
                    article.post.time_to_read,
                    article.source
                );
            }
        }
        "story" | "stories" => {
            let files = catalog::discover(&site.stories_dir);
            println!("Story files ({}):", files.len());
            for path in files {
                match load_stories(&path) {
                    Ok(stories) => {
                        for story in stories {
                            println!("  {} / {} [{}]", story.group, story.name, story.path());
                        }
                    }
                    Err(e) => println!("  {}", e),
                }
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, story", content_type);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::TempDir;

    #[test]
    fn test_unknown_type() {
        let dir = TempDir::new().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        assert!(run(&site, "post").is_ok());
        assert!(run(&site, "stories").is_ok());
        assert!(run(&site, "tag").is_err());
    }
}
