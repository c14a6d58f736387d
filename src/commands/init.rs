//! Initialize a new site

use anyhow::Result;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"# Site
title: My Portfolio
subtitle: ''
description: ''
author: John Doe
language: en

# URL
url: http://example.com
root: /
listing_page: blog.html
detail_page: blog-detail.html

# Data (a path relative to this directory, or an http(s) URL)
data_source: data/blog-posts.json

# Directory
public_dir: public
static_dir: static

# Rendering
related_posts: 2
conclusion_title: ✨ Conclusion
date_format: '%b %-d, %Y'
"#;

const SAMPLE_POSTS: &str = r#"{
  "posts": [
    {
      "id": 1,
      "slug": "hello-world",
      "title": "Hello World",
      "excerpt": "Your very first post, with every formatting rule in one place.",
      "category": "Web",
      "date": "2025-12-20",
      "readTime": "3 min read",
      "image": "👋",
      "views": 0,
      "content": {
        "intro": "Welcome! Posts live in data/blog-posts.json.",
        "sections": [
          {
            "title": "Formatting",
            "content": "Separate paragraphs with a blank line.\n\nUse **bold**, `inline code` and lists:\n• one\n• two"
          },
          {
            "title": "Code",
            "content": "```rust\nfn main() {\n    println!(\"<hello>\");\n}\n```"
          }
        ],
        "conclusion": "✅ Run `folio server` and open /blog.html."
      }
    },
    {
      "id": 2,
      "slug": "second-post",
      "title": "A Second Post",
      "excerpt": "Related posts come from the same category.",
      "category": "Web",
      "date": "2025-12-21",
      "readTime": "1 min read",
      "image": "📝",
      "views": 0,
      "content": {
        "sections": [{ "title": "Related posts", "content": "This post shows up under Hello World." }]
      }
    }
  ]
}
"#;

const STYLESHEET: &str = r#"body { font-family: system-ui, sans-serif; margin: 0 auto; max-width: 960px; padding: 1rem; }
.blog-grid, .related-posts-grid { display: grid; gap: 1.5rem; grid-template-columns: repeat(auto-fill, minmax(260px, 1fr)); }
.blog-card { border: 1px solid #e5e7eb; border-radius: 12px; overflow: hidden; }
.blog-card-image, .blog-detail-image { font-size: 3rem; text-align: center; padding: 1.5rem; background: #16a34a; color: white; }
.blog-card-content { padding: 1rem; }
.filter-btn { margin-right: .5rem; text-decoration: none; }
.filter-btn.active { font-weight: 700; }
.blog-empty, .blog-error { text-align: center; padding: 4rem 2rem; }
pre { background: #111827; color: #f9fafb; padding: 1rem; overflow-x: auto; }
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    fs::create_dir_all(target_dir.join("data"))?;
    fs::create_dir_all(target_dir.join("static/css"))?;

    write_if_missing(&target_dir.join("_config.yml"), CONFIG)?;
    write_if_missing(&target_dir.join("data/blog-posts.json"), SAMPLE_POSTS)?;
    write_if_missing(&target_dir.join("static/css/style.css"), STYLESHEET)?;

    Ok(())
}

fn write_if_missing(path: &Path, content: &str) -> Result<()> {
    if path.exists() {
        tracing::warn!("Keeping existing {:?}", path);
        return Ok(());
    }
    fs::write(path, content)?;
    tracing::debug!("Created {:?}", path);
    Ok(())
}
