//! Create a new post or video

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a new post or video file and return its path
///
/// The file name is the slugified title unless `slug` is given.
pub fn create(site: &Site, title: &str, layout: &str, slug: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Utc::now();

    let target_dir = match layout {
        "post" | "draft" => &site.posts_dir,
        "video" => &site.videos_dir,
        _ => anyhow::bail!("Unknown layout: {}. Available: post, draft, video", layout),
    };
    fs::create_dir_all(target_dir)?;

    let slug = match slug {
        Some(s) => s.to_string(),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }
    let file_path = target_dir.join(format!("{}.md", slug));

    // Check if file already exists
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let title_yaml = serde_yaml::to_string(title)?;
    let mut content = format!(
        "---\ntitle: {}date: {}\n",
        title_yaml,
        now.format("%Y-%m-%d")
    );
    match layout {
        "draft" => content.push_str("draft: true\nsummary: \n"),
        "video" => content.push_str("youtube: \n"),
        _ => content.push_str("summary: \n"),
    }
    content.push_str("---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
