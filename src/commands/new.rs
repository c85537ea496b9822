//! Create a new post

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a new post under `_posts`, returning its path. `path` overrides
/// the file name, which otherwise is the slugified title.
pub fn create_post(site: &Site, title: &str, path: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();
    let id = slug::slugify(title);
    if id.is_empty() {
        anyhow::bail!("Cannot derive a post id from title {:?}", title);
    }

    let target_dir = site.source_dir.join("_posts");
    fs::create_dir_all(&target_dir)?;

    let filename = match path {
        Some(p) => format!("{}.md", p.trim_end_matches(".md")),
        None => format!("{}.md", id),
    };
    let file_path = target_dir.join(filename);

    // Load scaffold template
    let scaffold_path = site.base_dir.join("scaffolds").join("post.md");
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        DEFAULT_SCAFFOLD.to_string()
    };

    let content = scaffold_content
        .replace("{{ id }}", &id)
        .replace("{{ title }}", &yaml_string(title))
        .replace("{{ date }}", &now.format("%Y-%m-%d %H:%M:%S").to_string());

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

/// Run the new command
pub fn run(site: &Site, title: &str, path: Option<&str>) -> Result<()> {
    let file_path = create_post(site, title, path)?;
    println!("Created: {:?}", file_path);
    Ok(())
}

pub(crate) const DEFAULT_SCAFFOLD: &str = r#"---
id: {{ id }}
title: {{ title }}
date: {{ date }}
description:
featured_image:
featured_image_alt:
---
"#;

/// Quote a title so YAML reads it back verbatim
fn yaml_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}
