//! Built-in site templates using the Tera template engine
//!
//! Templates are embedded in the binary. Rendered markdown is inserted with
//! the `safe` filter; everything else is escaped.

use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::error::Result;
use crate::pages::{BlogIndexData, BlogPageData, BlogPostData, VideosData};

/// Template renderer with embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
    site: SiteData,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("blog_index.html", include_str!("site/blog_index.html")),
            ("blog_post.html", include_str!("site/blog_post.html")),
            ("videos.html", include_str!("site/videos.html")),
            ("not_found.html", include_str!("site/not_found.html")),
            // Partials
            (
                "partials/post_list.html",
                include_str!("site/partials/post_list.html"),
            ),
            ("partials/pager.html", include_str!("site/partials/pager.html")),
        ])?;

        // Register custom filters
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self {
            tera,
            site: SiteData::from(config),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    fn base_context(&self, page_title: &str, current_path: &str) -> Context {
        let mut context = Context::new();
        context.insert("site", &self.site);
        context.insert("page_title", page_title);
        context.insert("current_path", current_path);
        context
    }

    /// `/blog`
    pub fn blog_index(&self, data: &BlogIndexData) -> Result<String> {
        let mut context = self.base_context("Blog", "/blog");
        context.insert("posts", &data.posts);
        context.insert("pagination", &PaginationData::new(1, data.total_pages));
        self.render("blog_index.html", &context)
    }

    /// `/blog/page/{n}`
    pub fn blog_page(&self, data: &BlogPageData) -> Result<String> {
        let pagination = PaginationData::new(data.current_page, data.total_pages);
        let mut context = self.base_context(&data.title, &pagination.current_url);
        context.insert("posts", &data.posts);
        context.insert("pagination", &pagination);
        self.render("blog_index.html", &context)
    }

    /// `/blog/{slug}`
    pub fn blog_post(&self, data: &BlogPostData) -> Result<String> {
        let mut context =
            self.base_context(&data.title, &format!("/blog/{}", data.post.slug));
        context.insert("post", &data.post);
        self.render("blog_post.html", &context)
    }

    /// `/videos`
    pub fn videos(&self, data: &VideosData) -> Result<String> {
        let mut context = self.base_context(&data.title, "/videos");
        context.insert("videos", &data.videos);
        self.render("videos.html", &context)
    }

    /// 404 page
    pub fn not_found(&self, path: &str) -> Result<String> {
        let context = self.base_context("Not found", path);
        self.render("not_found.html", &context)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result.trim().to_string()))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 160,
    };
    let omission = match args.get("omission") {
        Some(val) => tera::try_get_value!("truncate_chars", "omission", String, val),
        None => "\u{2026}".to_string(),
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!(
            "{}{}",
            truncated.trim_end(),
            omission
        )))
    }
}

/// Site-wide values available to every template
#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub url: String,
    pub language: String,
}

impl From<&SiteConfig> for SiteData {
    fn from(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            url: config.url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
        }
    }
}

/// Links between listing pages
#[derive(Debug, Clone, Serialize)]
pub struct PaginationData {
    pub current: usize,
    pub total: usize,
    pub current_url: String,
    pub prev_link: Option<String>,
    pub next_link: Option<String>,
}

impl PaginationData {
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current,
            total,
            current_url: page_url(current),
            prev_link: (current > 1).then(|| page_url(current - 1)),
            next_link: (current < total).then(|| page_url(current + 1)),
        }
    }
}

/// URL of a listing page; the first page is the blog root
pub fn page_url(page: usize) -> String {
    if page <= 1 {
        "/blog".to_string()
    } else {
        format!("/blog/page/{}", page)
    }
}
