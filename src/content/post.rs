//! Post and Video models

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Metadata;

/// A content file found on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    /// File name without the `.md` extension
    pub slug: String,
    pub filename: PathBuf,
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub slug: String,

    /// Publication date, ISO 8601 with milliseconds
    pub date: String,

    /// Publication date for display ("March 1, 2024")
    pub date_pretty: String,

    pub title: String,

    /// Markdown body, or HTML once rendered for display
    pub content: String,

    /// Source file path
    pub filename: PathBuf,

    pub lang: String,

    /// Summary rendered to HTML
    pub summary: Option<String>,

    /// Summary as written in the front-matter
    pub summary_plain: Option<String>,

    pub draft: bool,
}

impl Post {
    /// Assemble a post from its metadata and body
    pub fn new(metadata: Metadata, content: String, filename: PathBuf) -> Self {
        Self {
            slug: metadata.slug,
            date: metadata.date,
            date_pretty: metadata.date_pretty,
            title: metadata.title,
            content,
            filename,
            lang: metadata.lang,
            summary: metadata.summary,
            summary_plain: metadata.summary_plain,
            draft: metadata.draft,
        }
    }
}

/// A post without its body, used by listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicPostData {
    pub slug: String,
    pub title: String,
    pub lang: String,
    pub date: String,
    pub date_pretty: String,
    pub summary: Option<String>,
    pub draft: bool,
}

impl From<Metadata> for BasicPostData {
    fn from(metadata: Metadata) -> Self {
        Self {
            slug: metadata.slug,
            title: metadata.title,
            lang: metadata.lang,
            date: metadata.date,
            date_pretty: metadata.date_pretty,
            summary: metadata.summary,
            draft: metadata.draft,
        }
    }
}

/// A video page backed by a YouTube upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub slug: String,
    pub date: String,
    pub date_pretty: String,
    pub title: String,

    /// Raw markdown body
    pub content: String,

    pub filename: PathBuf,

    /// YouTube video id
    pub youtube: String,
}
