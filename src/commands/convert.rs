//! Convert legacy `.mdx` posts to markdown

use anyhow::Result;
use std::path::Path;

use crate::content::figures;

/// Convert every `.mdx` file below `dir`
pub fn run(dir: &Path) -> Result<()> {
    let written = figures::convert_all(dir)?;
    if written.is_empty() {
        println!("No .mdx files found under {:?}", dir);
    } else {
        println!("Converted {} files", written.len());
    }
    Ok(())
}
