//! Generator module - writes the static site using the built-in templates

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{CategoryFilter, PostRepository};
use crate::helpers::{post_page_path, CategoryPages, LinkStyle, ListingQuery};
use crate::page::{DetailPage, ListingPage, SiteView};
use crate::templates::TemplateRenderer;
use crate::Folio;

/// Entry of `search.json`, used for client-side search on static hosting
#[derive(Debug, Serialize)]
struct SearchEntry<'a> {
    id: u64,
    slug: &'a str,
    title: &'a str,
    excerpt: &'a str,
    category: &'a str,
    path: String,
}

/// Static site generator
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        Ok(Self {
            folio: folio.clone(),
            renderer: TemplateRenderer::new()?,
        })
    }

    /// Generate the entire site from one loaded repository
    pub fn generate(&self, repository: &PostRepository) -> Result<()> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.copy_static_assets()?;

        let categories = repository.categories();
        let pages = CategoryPages::new(categories.iter().map(|category| category.name.as_str()));
        let site = SiteView::new(&self.folio.config, &self.renderer, LinkStyle::Static)
            .with_category_pages(&pages);

        self.generate_listing_pages(repository, &site, &pages)?;
        self.generate_post_pages(repository, &site)?;
        self.generate_search_index(repository, &site)?;

        Ok(())
    }

    /// The full listing plus one page per category
    fn generate_listing_pages(
        &self,
        repository: &PostRepository,
        site: &SiteView,
        pages: &CategoryPages,
    ) -> Result<()> {
        let mut page = ListingPage::new(repository, ListingQuery::default());
        self.write_page(&self.folio.config.listing_page, &page.render(site)?)?;

        for category in repository.categories() {
            page.select_filter(CategoryFilter::Category(category.name.clone()));
            self.write_page(&pages.path(&category.name), &page.render(site)?)?;
        }

        Ok(())
    }

    /// One detail page per post
    fn generate_post_pages(&self, repository: &PostRepository, site: &SiteView) -> Result<()> {
        for post in repository.posts() {
            let page = DetailPage::open(repository, Some(&post.slug))?;
            self.write_page(&post_page_path(&post.slug), &page.render(site)?)?;
        }

        Ok(())
    }

    fn generate_search_index(&self, repository: &PostRepository, site: &SiteView) -> Result<()> {
        let entries: Vec<SearchEntry> = repository
            .posts()
            .iter()
            .map(|post| SearchEntry {
                id: post.id,
                slug: &post.slug,
                title: &post.title,
                excerpt: &post.excerpt,
                category: &post.category,
                path: site.links().detail(&post.slug),
            })
            .collect();

        let json = serde_json::to_string_pretty(&entries)?;
        self.write_page("search.json", &json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Write `content` to a path relative to the public directory
    fn write_page(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, content)?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Copy static assets (stylesheets, images) to the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() && !is_hidden(path) {
                let relative = path.strip_prefix(static_dir)?;
                let dest = self.folio.public_dir.join(relative);

                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }

                fs::copy(path, &dest)?;
            }
        }

        Ok(())
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use tempfile::tempdir;

    const DOCUMENT: &str = r#"{
        "posts": [
            {
                "id": 1, "slug": "git-flow", "title": "Master Git", "category": "Backend",
                "date": "2025-10-30", "excerpt": "Branches and pull requests",
                "content": {"sections": [{"title": "Branches", "content": "• main\n• develop"}]}
            },
            {
                "id": 2, "slug": "figma-react", "title": "Figma to React", "category": "Web Dev",
                "date": "2025-10-12", "excerpt": "Pixel perfect"
            }
        ]
    }"#;

    #[test]
    fn test_generate_site() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("static/css")).unwrap();
        fs::write(dir.path().join("static/css/style.css"), "body {}").unwrap();
        fs::write(dir.path().join("static/.DS_Store"), "").unwrap();

        let folio = Folio::with_config(dir.path().to_path_buf(), SiteConfig::default());
        let repository = PostRepository::from_json("test", DOCUMENT).unwrap();
        Generator::new(&folio)
            .unwrap()
            .generate(&repository)
            .unwrap();

        let public = dir.path().join("public");
        let listing = fs::read_to_string(public.join("blog.html")).unwrap();
        assert!(listing.contains("Master Git"));
        assert!(listing.contains(r#"href="/posts/git-flow.html""#));
        assert!(listing.contains(r#"href="/blog/web-dev.html""#));
        assert!(!listing.contains("blog-search"));

        let category = fs::read_to_string(public.join("blog/web-dev.html")).unwrap();
        assert!(category.contains("Figma to React"));
        assert!(!category.contains("Master Git"));

        let detail = fs::read_to_string(public.join("posts/git-flow.html")).unwrap();
        assert!(detail.contains(r#"<h2 id="branches">Branches</h2>"#));
        assert!(detail.contains("<ul><li>main</li>"));

        let index: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("search.json")).unwrap())
                .unwrap();
        assert_eq!(index[1]["path"], "/posts/figma-react.html");

        assert!(public.join("css/style.css").exists());
        assert!(!public.join(".DS_Store").exists());
    }

    #[test]
    fn test_colliding_categories_get_own_pages() {
        let dir = tempdir().unwrap();
        let folio = Folio::with_config(dir.path().to_path_buf(), SiteConfig::default());
        let repository = PostRepository::from_json(
            "test",
            r#"{"posts": [
                {"id": 1, "slug": "templates", "title": "Templates in depth", "category": "C++"},
                {"id": 2, "slug": "pointers", "title": "Pointer basics", "category": "C"}
            ]}"#,
        )
        .unwrap();
        Generator::new(&folio)
            .unwrap()
            .generate(&repository)
            .unwrap();

        let public = dir.path().join("public");
        let cpp = fs::read_to_string(public.join("blog/c.html")).unwrap();
        assert!(cpp.contains("Templates in depth"));
        assert!(!cpp.contains("Pointer basics"));

        let c = fs::read_to_string(public.join("blog/c-2.html")).unwrap();
        assert!(c.contains("Pointer basics"));
        assert!(!c.contains("Templates in depth"));

        let listing = fs::read_to_string(public.join("blog.html")).unwrap();
        assert!(listing.contains(r#"href="/blog/c.html""#));
        assert!(listing.contains(r#"href="/blog/c-2.html""#));
    }
}
