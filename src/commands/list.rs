//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::{CategoryFilter, Post, PostFilter, PostRepository};
use crate::helpers::{display_date, truncate};
use crate::Folio;

/// List posts (optionally filtered) or categories
pub async fn run(
    folio: &Folio,
    content_type: &str,
    category: &str,
    query: &str,
) -> Result<()> {
    let repository = folio.load_posts().await?;
    let output = render(&repository, content_type, category, query, &folio.config.date_format)?;
    print!("{}", output);
    Ok(())
}

/// Build the listing text for one content type
pub fn render(
    repository: &PostRepository,
    content_type: &str,
    category: &str,
    query: &str,
    date_format: &str,
) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let filter = PostFilter::new(CategoryFilter::parse(category), query);
            let posts = filter.apply(repository.posts());
            if posts.is_empty() {
                writeln!(out, "No posts found (filter: {})", filter.category)?;
            } else {
                writeln!(out, "Posts ({}):", posts.len())?;
                for post in posts {
                    write_post_line(&mut out, post, date_format)?;
                }
            }
        }
        "category" | "categories" => {
            let categories = repository.categories();
            writeln!(out, "Categories ({}):", categories.len())?;
            for category in categories {
                writeln!(out, "  {} ({})", category.name, category.count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(out)
}

fn write_post_line(out: &mut String, post: &Post, date_format: &str) -> std::fmt::Result {
    writeln!(
        out,
        "  {} - {} [{}] ({})",
        display_date(&post.date, date_format),
        post.title,
        post.category,
        post.slug
    )?;
    if !post.excerpt.is_empty() {
        writeln!(out, "      {}", truncate(&post.excerpt, 80, Some("…")))?;
    }
    Ok(())
}
