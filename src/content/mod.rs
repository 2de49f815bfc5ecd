//! Content module - handles posts, videos, and markdown processing

pub mod figures;
pub mod frontmatter;
pub mod loader;
mod markdown;
mod metadata;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use metadata::{build_metadata, Metadata};
pub use post::{BasicPostData, ContentEntry, Post, Video};
