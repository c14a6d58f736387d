//! Show one post: metadata, table of contents and related posts

use anyhow::Result;
use std::fmt::Write;

use crate::config::SiteConfig;
use crate::content::{table_of_contents, PostRepository};
use crate::helpers::{display_date, format_count, LinkStyle};
use crate::page::{DetailPage, SiteView};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Print a post summary, or its rendered detail page with `html`
pub async fn run(folio: &Folio, slug: &str, html: bool) -> Result<()> {
    let repository = folio.load_posts().await?;

    let output = if html {
        let renderer = TemplateRenderer::new()?;
        let site = SiteView::new(&folio.config, &renderer, LinkStyle::Query);
        DetailPage::open(&repository, Some(slug))?.render(&site)?
    } else {
        summary(&repository, slug, &folio.config)?
    };

    println!("{}", output);
    Ok(())
}

/// Plain-text summary of a post
pub fn summary(repository: &PostRepository, slug: &str, config: &SiteConfig) -> Result<String> {
    let page = DetailPage::open(repository, Some(slug))?;
    let post = page.post();
    let mut out = String::new();

    writeln!(out, "{}", post.title)?;
    writeln!(
        out,
        "{} | {} | {} | {} views",
        post.category,
        display_date(&post.date, &config.date_format),
        post.read_time,
        format_count(post.views)
    )?;

    let toc = table_of_contents(post, &config.conclusion_title);
    if !toc.is_empty() {
        writeln!(out, "\nContents:")?;
        for entry in toc {
            writeln!(out, "  #{} {}", entry.anchor_id, entry.label)?;
        }
    }

    let related = page.related(config.related_posts);
    if !related.is_empty() {
        writeln!(out, "\nRelated:")?;
        for other in related {
            writeln!(out, "  {} ({})", other.title, other.slug)?;
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> PostRepository {
        PostRepository::from_json(
            "test",
            r#"{"posts": [
                {"id": 1, "slug": "oop", "title": "OOP in Spring Boot", "category": "Backend",
                 "date": "2025-11-28", "readTime": "11 min read", "views": 3400,
                 "content": {"sections": [{"title": "SOLID"}, {"title": "Patterns"}], "conclusion": "Done"}},
                {"id": 2, "slug": "git", "title": "Git flow", "category": "Backend"}
            ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_summary() {
        let out = summary(&repository(), "oop", &SiteConfig::default()).unwrap();
        assert!(out.starts_with("OOP in Spring Boot\nBackend | Nov 28, 2025 | 11 min read | 3,400 views\n"));
        assert!(out.contains("  #solid SOLID\n  #patterns Patterns\n  #conclusion ✨ Conclusion\n"));
        assert!(out.contains("Related:\n  Git flow (git)\n"));
    }

    #[test]
    fn test_summary_unknown_slug() {
        let err = summary(&repository(), "nope", &SiteConfig::default()).unwrap_err();
        assert_eq!(err.to_string(), "Blog post not found");
    }
}
