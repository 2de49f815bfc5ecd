//! Error types for content loading and rendering

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading, parsing, or rendering site content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid date {value:?} in {source_name}")]
    InvalidDate { value: String, source_name: String },

    #[error("Invalid page number: {0}")]
    InvalidPage(String),

    #[error("Missing field `{field}` in {path:?}")]
    MissingField { field: &'static str, path: PathBuf },

    #[error("Failed to parse front-matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),

    #[error("Failed to render markdown: {0}")]
    Render(String),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ContentError {
    /// Wrap an IO error with the path that caused it
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error should surface as a missing page
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::InvalidPage(_))
    }
}

pub type Result<T, E = ContentError> = std::result::Result<T, E>;
