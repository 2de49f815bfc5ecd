//! Generate static files

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Prerender the whole site into the public directory
pub fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(site)?;
    let stats = generator.generate()?;

    tracing::info!(
        "Generated {} posts, {} listing pages and {} videos ({} assets)",
        stats.posts,
        stats.listing_pages,
        stats.videos,
        stats.assets
    );
    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
