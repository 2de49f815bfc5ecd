//! Page loaders
//!
//! Each loader gathers the data one page needs. The server calls them per
//! request and the generator calls them once per prerendered page, so both
//! produce identical output.

use serde::Serialize;
use std::sync::Arc;

use crate::content::{BasicPostData, ContentLoader, MarkdownRenderer, Post, Video};
use crate::error::{ContentError, Result};
use crate::Site;

/// Data for the first blog listing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogIndexData {
    pub posts: Vec<BasicPostData>,
    pub total_pages: usize,
}

/// Data for a numbered blog listing page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPageData {
    pub title: String,
    pub current_page: usize,
    pub posts: Vec<BasicPostData>,
    pub total_pages: usize,
}

/// Data for a single post page
#[derive(Debug, Clone, Serialize)]
pub struct BlogPostData {
    pub title: String,
    pub post: Post,
}

/// Data for the video listing page
#[derive(Debug, Clone, Serialize)]
pub struct VideosData {
    pub title: String,
    pub videos: Vec<Video>,
}

/// Loads page data for a site
pub struct Pages<'a> {
    loader: ContentLoader<'a>,
    production: bool,
}

impl<'a> Pages<'a> {
    pub fn new(site: &'a Site) -> Self {
        Self {
            loader: ContentLoader::new(site),
            production: site.config.production,
        }
    }

    pub fn with_renderer(site: &'a Site, renderer: Arc<MarkdownRenderer>) -> Self {
        Self {
            loader: ContentLoader::with_renderer(site, renderer),
            production: site.config.production,
        }
    }

    /// `/blog`
    pub fn blog_index(&self) -> Result<BlogIndexData> {
        let (posts, total_pages) = self.loader.paginate_posts(1, self.production)?;
        Ok(BlogIndexData { posts, total_pages })
    }

    /// `/blog/page/{page}`
    ///
    /// `page` is the raw route parameter. Anything other than a positive
    /// integer is an invalid page, and pages past the last one are not found.
    pub fn blog_page(&self, page: &str) -> Result<BlogPageData> {
        let current_page = parse_page(page)?;
        let (posts, total_pages) = self.loader.paginate_posts(current_page, self.production)?;
        if current_page > 1 && posts.is_empty() {
            return Err(ContentError::NotFound(format!("blog page {}", current_page)));
        }

        Ok(BlogPageData {
            title: "Blog".to_string(),
            current_page,
            posts,
            total_pages,
        })
    }

    /// Listing pages to prerender; page 1 lives at `/blog`
    pub fn blog_page_entries(&self) -> Result<Vec<usize>> {
        let (_, total_pages) = self.loader.paginate_posts(1, self.production)?;
        Ok((2..=total_pages).collect())
    }

    /// `/blog/{slug}`
    ///
    /// Drafts are hidden in production, matching the listings.
    pub fn blog_post(&self, slug: &str) -> Result<BlogPostData> {
        let post = self.loader.rendered_post(slug)?;
        if self.production && post.draft {
            return Err(ContentError::NotFound(format!("post {:?}", slug)));
        }

        Ok(BlogPostData {
            title: post.title.clone(),
            post,
        })
    }

    /// Post slugs to prerender
    pub fn blog_post_entries(&self) -> Result<Vec<String>> {
        Ok(self
            .loader
            .sorted_post_data(self.production)?
            .into_iter()
            .map(|post| post.slug)
            .collect())
    }

    /// `/videos`
    pub fn videos(&self) -> Result<VideosData> {
        Ok(VideosData {
            title: "Videos".to_string(),
            videos: self.loader.sorted_video_data()?,
        })
    }
}

/// Parse a 1-based page number from a route parameter
pub fn parse_page(page: &str) -> Result<usize> {
    match page.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ContentError::InvalidPage(page.to_string())),
    }
}
