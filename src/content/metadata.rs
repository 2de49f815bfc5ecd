//! Metadata normalization for front-matter

use serde::Serialize;
use std::path::Path;

use super::{FrontMatter, MarkdownRenderer};
use crate::error::{ContentError, Result};
use crate::helpers::{iso_date, pretty_date};

/// Normalized front-matter of a post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub date: String,
    pub date_pretty: String,
    pub summary: Option<String>,
    pub summary_plain: Option<String>,
    pub slug: String,
    pub title: String,
    pub lang: String,
    pub draft: bool,
}

/// Build the normalized metadata for a content file
///
/// `slug` comes from the file name. A missing or unparseable date is an
/// error; every other field has a default.
pub fn build_metadata(
    fm: &FrontMatter,
    slug: &str,
    source: &Path,
    renderer: &MarkdownRenderer,
) -> Result<Metadata> {
    let instant = fm.parse_date().ok_or_else(|| ContentError::InvalidDate {
        value: fm.date.clone().unwrap_or_default(),
        source_name: source.display().to_string(),
    })?;

    if let Some(declared) = fm.slug.as_deref() {
        if declared != slug {
            tracing::debug!(
                "Front-matter slug {:?} in {:?} ignored, using file name {:?}",
                declared,
                source,
                slug
            );
        }
    }

    let summary = fm
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| renderer.render_plain(s));

    Ok(Metadata {
        date: iso_date(&instant),
        date_pretty: pretty_date(&instant),
        summary,
        summary_plain: fm.summary.clone(),
        slug: slug.to_string(),
        title: fm.title.clone().unwrap_or_else(|| slug.to_string()),
        lang: fm.lang.clone().unwrap_or_else(|| "en".to_string()),
        draft: fm.draft.unwrap_or(false),
    })
}
