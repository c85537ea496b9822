//! postframe: a blog front-end
//!
//! Renders a post list and styled Markdown content to static HTML, and
//! builds a catalog of component stories for developing the components in
//! isolation.

pub mod catalog;
pub mod commands;
pub mod components;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod router;
pub mod server;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// A site rooted at a directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Source directory
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Root searched for story definitions
    pub stories_dir: PathBuf,
}

impl Site {
    /// Open a site, reading `_config.yml` when present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let config_path = base_dir.as_ref().join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Open a site with an explicit configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let stories_dir = base_dir.join(&config.stories_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            stories_dir,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Build the story catalog
    pub fn build_catalog(&self) -> Result<()> {
        commands::catalog::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
