//! Conversion of `<Figure>` components in `.mdx` sources to plain HTML
//!
//! Older posts were written as MDX with a `Figure` component. The markdown
//! pipeline only understands raw HTML, so each component is expanded into a
//! `<figure>` with a `<picture>` that switches source on the color scheme.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;

use crate::error::{ContentError, Result};

lazy_static! {
    static ref FIGURE_REGEX: Regex =
        Regex::new(r#"(?s)<Figure\s*([^>]*)>(.+?)</Figure>"#).expect("valid figure regex");
    static ref ATTRIBUTE_REGEX: Regex =
        Regex::new(r#"([a-zA-Z_]+)="([^"]+)""#).expect("valid attribute regex");
    static ref IMPORT_REGEX: Regex =
        Regex::new(r#"import Figure from "[^"]+";?\n*"#).expect("valid import regex");
}

/// A parsed `<Figure>` component
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Figure<'a> {
    pub src: &'a str,
    pub dark_src: Option<&'a str>,
    pub alt: Option<&'a str>,
    pub caption: &'a str,
}

impl<'a> Figure<'a> {
    /// Build a figure from the component's attribute string and body
    pub fn parse(attrs: &'a str, caption: &'a str) -> Self {
        let mut figure = Self {
            caption,
            ..Default::default()
        };

        for cap in ATTRIBUTE_REGEX.captures_iter(attrs) {
            let (Some(name), Some(value)) = (cap.get(1), cap.get(2)) else {
                continue;
            };
            match name.as_str() {
                "src" => figure.src = value.as_str(),
                "darkSrc" => figure.dark_src = Some(value.as_str()),
                "alt" => figure.alt = Some(value.as_str()),
                _ => {}
            }
        }

        figure
    }
}

impl fmt::Display for Figure<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "<figure>")?;
        writeln!(
            f,
            r#"  <a href="{}" title="Click to enlarge" target="_blank">"#,
            self.src
        )?;
        writeln!(f, "    <picture>")?;

        if let Some(dark_src) = self.dark_src {
            writeln!(
                f,
                r#"      <source srcset="{}" media="(prefers-color-scheme: light)" />"#,
                self.src
            )?;
            writeln!(
                f,
                r#"      <source srcset="{}" media="(prefers-color-scheme: dark)" />"#,
                dark_src
            )?;
        }

        match self.alt {
            Some(alt) => writeln!(f, r#"      <img src="{}" alt="{}" />"#, self.src, alt)?,
            None => writeln!(f, r#"      <img src="{}" />"#, self.src)?,
        }

        writeln!(f, "    </picture>")?;
        writeln!(f, "  </a>")?;
        writeln!(f, "  <figcaption>{}</figcaption>", self.caption)?;
        write!(f, "</figure>")
    }
}

/// Expand every `<Figure>` component into HTML
pub fn replace_figures(source: &str) -> Cow<'_, str> {
    FIGURE_REGEX.replace_all(source, |caps: &Captures| {
        Figure::parse(&caps[1], &caps[2]).to_string()
    })
}

/// Drop the `import Figure from "...";` line
pub fn remove_figure_import(source: &str) -> Cow<'_, str> {
    IMPORT_REGEX.replace_all(source, "")
}

/// Convert one MDX document to markdown
pub fn convert_source(source: &str) -> String {
    let expanded = replace_figures(source);
    remove_figure_import(&expanded).into_owned()
}

/// All `.mdx` files below `dir`
pub fn find_mdx_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*.mdx", Pattern::escape(&dir.to_string_lossy()));
    let mut files: Vec<PathBuf> = glob::glob(&pattern)?.filter_map(|p| p.ok()).collect();
    files.sort();
    Ok(files)
}

/// Convert every `.mdx` file below `dir`, writing a `.md` file next to it
///
/// Returns the paths written. Existing `.md` files are overwritten.
pub fn convert_all(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for file in find_mdx_files(dir)? {
        let source = fs::read_to_string(&file).map_err(|e| ContentError::io(&file, e))?;
        let out = file.with_extension("md");
        fs::write(&out, convert_source(&source)).map_err(|e| ContentError::io(&out, e))?;
        tracing::info!("Converted {:?} -> {:?}", file, out);
        written.push(out);
    }
    Ok(written)
}
