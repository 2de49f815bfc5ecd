//! Content loader - reads posts and videos from the content directories
//!
//! Nothing is cached: every call walks the directories and reads the files
//! again, so a running server always reflects what is on disk.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use glob::Pattern;

use super::{build_metadata, BasicPostData, ContentEntry, FrontMatter, MarkdownRenderer, Post, Video};
use crate::error::{ContentError, Result};
use crate::helpers::{iso_date, pretty_date};
use crate::Site;

/// Loads content from the posts and videos directories
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: Arc<MarkdownRenderer>,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site) -> Self {
        let renderer = Arc::new(MarkdownRenderer::from_config(&site.config.highlight));
        Self::with_renderer(site, renderer)
    }

    /// Create a loader sharing an already built renderer
    pub fn with_renderer(site: &'a Site, renderer: Arc<MarkdownRenderer>) -> Self {
        Self { site, renderer }
    }

    /// Find every markdown file below `dir`
    ///
    /// Entries come back in path order. When two files share a slug the
    /// first one wins and the rest are skipped.
    pub fn all_slugs(&self, dir: &Path) -> Result<Vec<ContentEntry>> {
        let pattern = format!("{}/**/*.md", Pattern::escape(&dir.to_string_lossy()));
        let mut paths = Vec::new();
        for path in glob::glob(&pattern)? {
            match path {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => {
                    let path = e.path().to_path_buf();
                    return Err(ContentError::io(path, e.into()));
                }
            }
        }
        paths.sort();

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(paths.len());
        for filename in paths {
            let Some(slug) = file_slug(&filename) else {
                continue;
            };
            if !seen.insert(slug.clone()) {
                tracing::warn!("Duplicate slug {:?} at {:?}, skipping", slug, filename);
                continue;
            }
            entries.push(ContentEntry { slug, filename });
        }

        tracing::debug!("Found {} entries under {:?}", entries.len(), dir);
        Ok(entries)
    }

    /// All posts on disk
    pub fn all_post_slugs(&self) -> Result<Vec<ContentEntry>> {
        self.all_slugs(&self.site.posts_dir)
    }

    /// All videos on disk
    pub fn all_video_slugs(&self) -> Result<Vec<ContentEntry>> {
        self.all_slugs(&self.site.videos_dir)
    }

    /// Locate the file for a post slug
    pub fn find_post(&self, slug: &str) -> Result<ContentEntry> {
        if !is_valid_slug(slug) {
            return Err(ContentError::NotFound(format!("post {:?}", slug)));
        }

        let pattern = format!(
            "{}/**/{}.md",
            Pattern::escape(&self.site.posts_dir.to_string_lossy()),
            Pattern::escape(slug)
        );
        let mut matches: Vec<PathBuf> = glob::glob(&pattern)?
            .filter_map(|p| p.ok())
            .filter(|p| p.is_file())
            .collect();
        matches.sort();

        match matches.into_iter().next() {
            Some(filename) => Ok(ContentEntry {
                slug: slug.to_string(),
                filename,
            }),
            None => Err(ContentError::NotFound(format!("post {:?}", slug))),
        }
    }

    /// Load a post by slug, with its raw markdown body
    pub fn post_data_by_slug(&self, slug: &str) -> Result<Post> {
        let entry = self.find_post(slug)?;
        self.post_data(&entry)
    }

    /// Load a post by slug with its body rendered to HTML
    pub fn rendered_post(&self, slug: &str) -> Result<Post> {
        let mut post = self.post_data_by_slug(slug)?;
        post.content = self.renderer.render(&post.content)?;
        Ok(post)
    }

    /// Load a single post from a file
    pub fn post_data(&self, entry: &ContentEntry) -> Result<Post> {
        let raw = read_content_file(&entry.filename)?;
        let (fm, body) = FrontMatter::parse(&raw)?;
        let metadata = build_metadata(&fm, &entry.slug, &entry.filename, &self.renderer)?;
        Ok(Post::new(metadata, body.to_string(), entry.filename.clone()))
    }

    /// Load only the listing fields of a post
    pub fn basic_post_data(&self, entry: &ContentEntry) -> Result<BasicPostData> {
        let raw = read_content_file(&entry.filename)?;
        let (fm, _) = FrontMatter::parse(&raw)?;
        let metadata = build_metadata(&fm, &entry.slug, &entry.filename, &self.renderer)?;
        Ok(metadata.into())
    }

    /// Load a single video from a file
    pub fn video_data(&self, entry: &ContentEntry) -> Result<Video> {
        let raw = read_content_file(&entry.filename)?;
        let (fm, body) = FrontMatter::parse(&raw)?;

        let instant = fm.parse_date().ok_or_else(|| ContentError::InvalidDate {
            value: fm.date.clone().unwrap_or_default(),
            source_name: entry.filename.display().to_string(),
        })?;
        let youtube = fm.youtube.clone().ok_or_else(|| ContentError::MissingField {
            field: "youtube",
            path: entry.filename.clone(),
        })?;

        Ok(Video {
            slug: entry.slug.clone(),
            date: iso_date(&instant),
            date_pretty: pretty_date(&instant),
            title: fm.title.unwrap_or_else(|| entry.slug.clone()),
            content: body.to_string(),
            filename: entry.filename.clone(),
            youtube,
        })
    }

    /// Listing data for every post, drafts included
    pub fn all_post_data(&self) -> Result<Vec<BasicPostData>> {
        self.all_post_slugs()?
            .iter()
            .map(|entry| self.basic_post_data(entry))
            .collect()
    }

    /// Every video on disk, unsorted
    pub fn all_video_data(&self) -> Result<Vec<Video>> {
        self.all_video_slugs()?
            .iter()
            .map(|entry| self.video_data(entry))
            .collect()
    }

    /// Posts newest first; drafts are dropped when `production` is set
    pub fn sorted_post_data(&self, production: bool) -> Result<Vec<BasicPostData>> {
        let mut posts: Vec<_> = self
            .all_post_data()?
            .into_iter()
            .filter(|post| !production || !post.draft)
            .collect();
        sort_posts(&mut posts);
        Ok(posts)
    }

    /// Videos newest first
    pub fn sorted_video_data(&self) -> Result<Vec<Video>> {
        let mut videos = self.all_video_data()?;
        sort_videos(&mut videos);
        Ok(videos)
    }

    /// One page of posts plus the total number of pages
    pub fn paginate_posts(
        &self,
        page: usize,
        production: bool,
    ) -> Result<(Vec<BasicPostData>, usize)> {
        let per_page = self.site.config.per_page;
        let posts = self.sorted_post_data(production)?;
        let total = total_pages(posts.len(), per_page);
        let slice = paginate(&posts, page, per_page)?;
        Ok((slice.to_vec(), total))
    }
}

/// Order posts by date, newest first, then by slug descending
pub fn sort_posts(posts: &mut [BasicPostData]) {
    posts.sort_by(|a, b| compare_desc(&a.date, &b.date).then_with(|| compare_desc(&a.slug, &b.slug)));
}

/// Order videos by date, newest first
pub fn sort_videos(videos: &mut [Video]) {
    videos.sort_by(|a, b| compare_desc(&a.date, &b.date));
}

fn compare_desc(a: &str, b: &str) -> Ordering {
    b.cmp(a)
}

/// Number of pages needed for `count` items
pub fn total_pages(count: usize, per_page: usize) -> usize {
    count.div_ceil(per_page.max(1))
}

/// The 1-based `page` of `items`
///
/// Page 0 is rejected. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Result<&[T]> {
    if page == 0 {
        return Err(ContentError::InvalidPage(page.to_string()));
    }
    let per_page = per_page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(items.len());
    let end = start.saturating_add(per_page).min(items.len());
    Ok(&items[start..end])
}

/// Slug of a content file: its name without the `.md` extension
fn file_slug(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Whether a requested slug can name a file inside the content directory
fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug != "." && slug != ".." && !slug.contains(['/', '\\', '\0'])
}

fn read_content_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ContentError::NotFound(path.display().to_string()),
        _ => ContentError::io(path, e),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use std::fs;
    use tempfile::TempDir;

    fn test_site() -> (TempDir, Site) {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_config(dir.path(), SiteConfig::default());
        (dir, site)
    }

    fn write_post(site: &Site, rel: &str, frontmatter: &str, body: &str) {
        let path = site.posts_dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("---\n{}\n---\n{}", frontmatter, body)).unwrap();
    }

    fn write_video(site: &Site, rel: &str, frontmatter: &str) {
        let path = site.videos_dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, format!("---\n{}\n---\nNotes", frontmatter)).unwrap();
    }

    fn basic(slug: &str, date: &str) -> BasicPostData {
        BasicPostData {
            slug: slug.to_string(),
            title: slug.to_string(),
            lang: "en".to_string(),
            date: date.to_string(),
            date_pretty: String::new(),
            summary: None,
            draft: false,
        }
    }

    #[test]
    fn test_all_slugs_recursive() {
        let (_dir, site) = test_site();
        write_post(&site, "one.md", "date: 2024-01-01", "");
        write_post(&site, "2023/two.md", "date: 2023-01-01", "");
        fs::write(site.posts_dir.join("notes.txt"), "ignored").unwrap();

        let loader = ContentLoader::new(&site);
        let entries = loader.all_post_slugs().unwrap();
        let slugs: Vec<_> = entries.iter().map(|e| e.slug.as_str()).collect();
        assert_eq!(slugs, vec!["two", "one"]);
        assert!(entries[0].filename.ends_with("2023/two.md"));
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let (_dir, site) = test_site();
        let loader = ContentLoader::new(&site);
        assert!(loader.all_post_slugs().unwrap().is_empty());
        assert!(loader.sorted_video_data().unwrap().is_empty());
        let (posts, total) = loader.paginate_posts(1, false).unwrap();
        assert!(posts.is_empty());
        assert_eq!(total, 0);
    }

    #[test]
    fn test_duplicate_slug_first_wins() {
        let (_dir, site) = test_site();
        write_post(&site, "a/dup.md", "date: 2024-01-01\ntitle: First", "");
        write_post(&site, "b/dup.md", "date: 2024-01-02\ntitle: Second", "");

        let loader = ContentLoader::new(&site);
        let entries = loader.all_post_slugs().unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].filename.ends_with("a/dup.md"));

        let post = loader.post_data_by_slug("dup").unwrap();
        assert_eq!(post.title, "First");
    }

    #[test]
    fn test_post_data_by_slug() {
        let (_dir, site) = test_site();
        write_post(
            &site,
            "nested/hello.md",
            "title: Hello\ndate: 2024-03-01\nsummary: Short",
            "Body with \"quotes\"\n",
        );

        let loader = ContentLoader::new(&site);
        let post = loader.post_data_by_slug("hello").unwrap();
        assert_eq!(post.slug, "hello");
        assert_eq!(post.title, "Hello");
        assert_eq!(post.date, "2024-03-01T00:00:00.000Z");
        assert_eq!(post.date_pretty, "March 1, 2024");
        assert_eq!(post.content, "Body with \"quotes\"\n");
        assert_eq!(post.summary.as_deref(), Some("<p>Short</p>\n"));
        assert_eq!(post.summary_plain.as_deref(), Some("Short"));
        assert!(post.filename.ends_with("nested/hello.md"));
    }

    #[test]
    fn test_rendered_post() {
        let (_dir, site) = test_site();
        write_post(
            &site,
            "code.md",
            "title: Code\ndate: 2024-03-01",
            "Intro -- text\n\n```rust\nfn main() {}\n```\n",
        );

        let loader = ContentLoader::new(&site);
        let post = loader.rendered_post("code").unwrap();
        assert!(post.content.contains("<p>Intro \u{2013} text</p>"));
        assert!(post.content.contains(r#"<figure class="highlight rust">"#));
    }

    #[test]
    fn test_unknown_slug_is_not_found() {
        let (_dir, site) = test_site();
        write_post(&site, "exists.md", "date: 2024-01-01", "");
        let loader = ContentLoader::new(&site);

        for slug in ["missing", "", ".", "..", "../exists", "a/exists", "*", "exist?"] {
            let err = loader.post_data_by_slug(slug).unwrap_err();
            assert!(matches!(err, ContentError::NotFound(_)), "slug {slug:?}: {err}");
        }
    }

    #[test]
    fn test_dotted_slug_is_found() {
        let (_dir, site) = test_site();
        write_post(&site, "v1..2-notes.md", "title: Notes\ndate: 2024-01-01", "Body\n");
        let loader = ContentLoader::new(&site);

        let listed = loader.sorted_post_data(false).unwrap();
        assert_eq!(listed[0].slug, "v1..2-notes");
        let post = loader.post_data_by_slug(&listed[0].slug).unwrap();
        assert_eq!(post.title, "Notes");
    }

    #[test]
    fn test_invalid_date_fails_listing() {
        let (_dir, site) = test_site();
        write_post(&site, "good.md", "date: 2024-01-01", "");
        write_post(&site, "bad.md", "date: someday", "");

        let loader = ContentLoader::new(&site);
        let err = loader.sorted_post_data(false).unwrap_err();
        assert!(matches!(err, ContentError::InvalidDate { .. }));
    }

    #[test]
    fn test_draft_filter() {
        let (_dir, site) = test_site();
        write_post(&site, "public.md", "date: 2024-01-01", "");
        write_post(&site, "wip.md", "date: 2024-01-02\ndraft: true", "");

        let loader = ContentLoader::new(&site);

        let dev: Vec<_> = loader
            .sorted_post_data(false)
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(dev, vec!["wip", "public"]);

        let prod: Vec<_> = loader
            .sorted_post_data(true)
            .unwrap()
            .into_iter()
            .map(|p| p.slug)
            .collect();
        assert_eq!(prod, vec!["public"]);
    }

    #[test]
    fn test_sort_posts() {
        let mut posts = vec![
            basic("old", "2024-01-01T00:00:00.000Z"),
            basic("a", "2024-01-02T00:00:00.000Z"),
            basic("b", "2024-01-02T00:00:00.000Z"),
        ];
        sort_posts(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a", "old"]);
    }

    #[test]
    fn test_sorted_videos() {
        let (_dir, site) = test_site();
        write_video(&site, "first.md", "title: First\ndate: 2023-05-01\nyoutube: abc123");
        write_video(&site, "second.md", "title: Second\ndate: 2024-05-01\nyoutube: def456");

        let loader = ContentLoader::new(&site);
        let videos = loader.sorted_video_data().unwrap();
        let slugs: Vec<_> = videos.iter().map(|v| v.slug.as_str()).collect();
        assert_eq!(slugs, vec!["second", "first"]);
        assert_eq!(videos[0].youtube, "def456");
        assert_eq!(videos[0].date_pretty, "May 1, 2024");
        assert_eq!(videos[0].content, "Notes");
    }

    #[test]
    fn test_video_without_youtube_id() {
        let (_dir, site) = test_site();
        write_video(&site, "broken.md", "title: Broken\ndate: 2023-05-01");

        let loader = ContentLoader::new(&site);
        let err = loader.sorted_video_data().unwrap_err();
        assert!(matches!(err, ContentError::MissingField { field: "youtube", .. }));
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 20), 0);
        assert_eq!(total_pages(1, 20), 1);
        assert_eq!(total_pages(20, 20), 1);
        assert_eq!(total_pages(21, 20), 2);
        assert_eq!(total_pages(45, 20), 3);
    }

    #[test]
    fn test_pages_cover_every_item_once() {
        let items: Vec<usize> = (0..45).collect();
        let total = total_pages(items.len(), 20);
        let mut joined = Vec::new();
        for page in 1..=total {
            joined.extend_from_slice(paginate(&items, page, 20).unwrap());
        }
        assert_eq!(joined, items);
        assert_eq!(paginate(&items, 3, 20).unwrap().len(), 5);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let items = [1, 2, 3];
        assert!(matches!(
            paginate(&items, 0, 20),
            Err(ContentError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let items = [1, 2, 3];
        assert!(paginate(&items, 2, 20).unwrap().is_empty());
        assert!(paginate(&items, usize::MAX, 20).unwrap().is_empty());
    }

    #[test]
    fn test_paginate_posts() {
        let (_dir, site) = test_site();
        for day in 1..=25 {
            write_post(
                &site,
                &format!("post-{:02}.md", day),
                &format!("date: 2024-01-{:02}", day),
                "",
            );
        }

        let loader = ContentLoader::new(&site);
        let (first, total) = loader.paginate_posts(1, false).unwrap();
        assert_eq!(total, 2);
        assert_eq!(first.len(), 20);
        assert_eq!(first[0].slug, "post-25");

        let (second, _) = loader.paginate_posts(2, false).unwrap();
        assert_eq!(second.len(), 5);
        assert_eq!(second[4].slug, "post-01");
    }
}
