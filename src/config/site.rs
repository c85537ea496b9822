//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub url: String,
    /// Path prefix prepended to every internal link
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    /// Root searched (recursively) for story definition files
    pub stories_dir: String,

    // Writing
    pub render_drafts: bool,
    pub date_format: String,
    pub words_per_minute: usize,
    pub excerpt_length: usize,
    #[serde(default)]
    pub highlight: HighlightConfig,

    // Theme
    #[serde(default)]
    pub colors: ColorsConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Postframe".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),
            timezone: String::new(),

            url: "http://example.com".to_string(),
            root: String::new(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            stories_dir: "stories".to_string(),

            render_drafts: false,
            date_format: "MMM D, YYYY".to_string(),
            words_per_minute: 265,
            excerpt_length: 140,
            highlight: HighlightConfig::default(),

            colors: ColorsConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Timezone used for front-matter dates without an explicit offset.
    /// An empty setting means UTC.
    pub fn tz(&self) -> Result<Tz> {
        if self.timezone.trim().is_empty() {
            return Ok(Tz::UTC);
        }
        self.timezone
            .trim()
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }
}

/// Syntax highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "InspiredGitHub".to_string(),
        }
    }
}

/// Palette shared by the content styles and layout primitives
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorsConfig {
    pub header: String,
    pub link: String,
    pub black: String,
    /// Gray ramp addressed as `gray.0`, `gray.1`, ...
    pub gray: Vec<String>,
}

impl Default for ColorsConfig {
    fn default() -> Self {
        Self {
            header: "#1b1b1b".to_string(),
            link: "#0094FF".to_string(),
            black: "#000".to_string(),
            gray: vec![
                "#333".to_string(),
                "#777".to_string(),
                "#aaa".to_string(),
                "#ddd".to_string(),
            ],
        }
    }
}
