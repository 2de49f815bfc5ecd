//! CLI entry point for markpress

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "markpress")]
#[command(version)]
#[command(about = "A markdown blog and video site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Hide drafts, overriding `production` in _config.yml
    #[arg(long, global = true)]
    production: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new site
    Init {
        /// Directory to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
    },

    /// Create a new post or video
    New {
        /// Layout to use (post, draft, video)
        #[arg(short, long, default_value = "post")]
        layout: String,

        /// Title of the new entry
        title: String,

        /// File name without extension (defaults to the slugified title)
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Prerender every page into the public directory
    #[command(alias = "g")]
    Generate,

    /// Serve the site, reading content on every request
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Remove the public directory
    Clean,

    /// List site content
    List {
        /// Type of content to list (post, video, page)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Convert `<Figure>` components in .mdx files to plain markdown
    ConvertFigures {
        /// Directory to search (defaults to the base directory)
        dir: Option<PathBuf>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "markpress=debug,tower_http=debug,info"
    } else {
        "markpress=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let load_site = || -> Result<markpress::Site> {
        let mut site = markpress::Site::new(&base_dir)?;
        if cli.production {
            site.config.production = true;
        }
        Ok(site)
    };

    match cli.command {
        Commands::Init { folder } => {
            let target_dir = if folder.is_absolute() {
                folder
            } else {
                base_dir.join(folder)
            };
            tracing::info!("Initializing site in {:?}", target_dir);
            markpress::commands::init::init_site(&target_dir)?;
            println!("Initialized site in {:?}", target_dir);
        }

        Commands::New {
            layout,
            title,
            slug,
        } => {
            let site = load_site()?;
            tracing::info!("Creating new {} with title: {}", layout, title);
            let path = markpress::commands::new::create(&site, &title, &layout, slug.as_deref())?;
            println!("Created: {:?}", path);
        }

        Commands::Generate => {
            let site = load_site()?;
            tracing::info!("Generating static files...");
            site.generate()?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let site = load_site()?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            markpress::server::start(&site, &ip, port).await?;
        }

        Commands::Clean => {
            let site = load_site()?;
            tracing::info!("Cleaning public folder...");
            site.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::List { r#type } => {
            let site = load_site()?;
            markpress::commands::list::run(&site, &r#type)?;
        }

        Commands::ConvertFigures { dir } => {
            let dir = match dir {
                Some(d) if d.is_absolute() => d,
                Some(d) => base_dir.join(d),
                None => base_dir.clone(),
            };
            markpress::commands::convert::run(&dir)?;
        }

        Commands::Version => {
            println!("markpress version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
