//! Generator module - prerenders every page into the public directory

use anyhow::{Context as _, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use walkdir::WalkDir;

use crate::content::MarkdownRenderer;
use crate::pages::Pages;
use crate::templates::{page_url, TemplateRenderer};
use crate::Site;

/// Counts of what a generation run wrote
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerateStats {
    pub listing_pages: usize,
    pub posts: usize,
    pub videos: usize,
    pub assets: usize,
}

/// Static site generator using the built-in templates
pub struct Generator {
    site: Site,
    renderer: Arc<MarkdownRenderer>,
    templates: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        let renderer = Arc::new(MarkdownRenderer::from_config(&site.config.highlight));
        let templates = TemplateRenderer::new(&site.config)?;

        Ok(Self {
            site: site.clone(),
            renderer,
            templates,
        })
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<GenerateStats> {
        let pages = Pages::with_renderer(&self.site, Arc::clone(&self.renderer));
        let mut stats = GenerateStats::default();

        // Ensure public directory exists
        fs::create_dir_all(&self.site.public_dir)?;

        // Copy static assets (images, styles, etc.)
        stats.assets = self.copy_static_assets()?;

        // Listing pages
        let index = pages.blog_index()?;
        self.write_page("/blog", &self.templates.blog_index(&index)?)?;
        stats.listing_pages += 1;

        for page in pages.blog_page_entries()? {
            let data = pages.blog_page(&page.to_string())?;
            self.write_page(&page_url(page), &self.templates.blog_page(&data)?)?;
            stats.listing_pages += 1;
        }

        // Post pages
        for slug in pages.blog_post_entries()? {
            let data = pages
                .blog_post(&slug)
                .with_context(|| format!("Failed to render post {:?}", slug))?;
            self.write_page(&format!("/blog/{}", slug), &self.templates.blog_post(&data)?)?;
            stats.posts += 1;
        }

        // Videos
        let videos = pages.videos()?;
        stats.videos = videos.videos.len();
        self.write_page("/videos", &self.templates.videos(&videos)?)?;

        // Root redirects to the blog
        self.write_file(
            &self.site.public_dir.join("index.html"),
            r#"<!DOCTYPE html><meta http-equiv="refresh" content="0; url=/blog"><link rel="canonical" href="/blog">"#,
        )?;
        self.write_file(
            &self.site.public_dir.join("404.html"),
            &self.templates.not_found("/404")?,
        )?;

        Ok(stats)
    }

    /// Write `html` as the index file for a URL path
    fn write_page(&self, url_path: &str, html: &str) -> Result<()> {
        let output_path = self.output_path(url_path);
        self.write_file(&output_path, html)
    }

    fn write_file(&self, output_path: &Path, content: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Location of the `index.html` serving a URL path
    pub fn output_path(&self, url_path: &str) -> PathBuf {
        // Strip leading slash from path to avoid creating absolute paths
        let clean_path = url_path.trim_matches('/');
        self.site.public_dir.join(clean_path).join("index.html")
    }

    /// Copy everything under the static directory into the public directory
    fn copy_static_assets(&self) -> Result<usize> {
        let static_dir = &self.site.static_dir;
        if !static_dir.exists() {
            return Ok(0);
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = path.strip_prefix(static_dir).unwrap_or(path);
            let target = self.site.public_dir.join(relative);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &target)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, target))?;
            copied += 1;
        }

        tracing::debug!("Copied {} static assets", copied);
        Ok(copied)
    }
}
