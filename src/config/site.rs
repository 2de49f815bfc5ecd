//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Number of posts on each listing page
pub const POSTS_PER_PAGE: usize = 20;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,

    // Directory
    pub posts_dir: String,
    pub videos_dir: String,
    pub public_dir: String,
    pub static_dir: String,

    // Pagination
    pub per_page: usize,

    /// Hide drafts from listings
    pub production: bool,

    #[serde(default)]
    pub highlight: HighlightConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "en".to_string(),
            url: "http://localhost:4000".to_string(),

            posts_dir: "src/content/blog".to_string(),
            videos_dir: "src/content/videos".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),

            per_page: POSTS_PER_PAGE,

            production: false,

            highlight: HighlightConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let mut config: SiteConfig = serde_yaml::from_str(&content)?;
        if config.per_page == 0 {
            tracing::warn!("per_page must be positive, using {}", POSTS_PER_PAGE);
            config.per_page = POSTS_PER_PAGE;
        }
        Ok(config)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
