//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::config::SiteConfig;

const DEFAULT_CONFIG: &str = r#"# Site
title: Blog
description: ''
author: ''
language: en
url: http://localhost:4000

# Directory
posts_dir: src/content/blog
videos_dir: src/content/videos
public_dir: public
static_dir: static

# Listing
per_page: 20

# Hide drafts from listings and post pages
production: false

# Code highlighting
highlight:
  enable: true
  theme: base16-ocean.dark
  line_number: false
"#;

const HELLO_POST: &str = r#"---
title: Hello World
date: 2024-01-01
summary: The first post on this blog.
---

Welcome! This post lives in `src/content/blog/hello-world.md`.

```rust
fn main() {
    println!("Hello, world!");
}
```
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config = SiteConfig::default();

    // Create directory structure
    fs::create_dir_all(target_dir.join(&config.posts_dir))?;
    fs::create_dir_all(target_dir.join(&config.videos_dir))?;
    fs::create_dir_all(target_dir.join(&config.static_dir))?;

    let config_path = target_dir.join("_config.yml");
    if !config_path.exists() {
        fs::write(&config_path, DEFAULT_CONFIG)?;
    }

    let hello_path = target_dir.join(&config.posts_dir).join("hello-world.md");
    if !hello_path.exists() {
        fs::write(&hello_path, HELLO_POST)?;
    }

    tracing::debug!("Initialized site layout in {:?}", target_dir);
    Ok(())
}
