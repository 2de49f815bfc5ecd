//! List site content

use anyhow::Result;

use crate::content::ContentLoader;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let loader = ContentLoader::new(site);
    let production = site.config.production;

    match content_type {
        "post" | "posts" => {
            let posts = loader.sorted_post_data(production)?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                let draft = if post.draft { " (draft)" } else { "" };
                println!(
                    "  {} - {} [{}]{}",
                    &post.date[..10],
                    post.title,
                    post.slug,
                    draft
                );
            }
        }
        "video" | "videos" => {
            let videos = loader.sorted_video_data()?;
            println!("Videos ({}):", videos.len());
            for video in videos {
                println!(
                    "  {} - {} [{}] youtube:{}",
                    &video.date[..10],
                    video.title,
                    video.slug,
                    video.youtube
                );
            }
        }
        "page" | "pages" => {
            let (_, total_pages) = loader.paginate_posts(1, production)?;
            println!("Listing pages ({}):", total_pages);
            for page in 1..=total_pages {
                println!("  {}", crate::templates::page_url(page));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, video, page",
                content_type
            );
        }
    }

    Ok(())
}
